//! Planfinity core: the drawer grid planning engine.
//!
//! Pure, synchronous functions over caller-owned data: unit conversion,
//! placement validation, baseplate decomposition and print/pick
//! aggregation, plus the fit finder, the built-in catalog and the layout
//! persistence shapes used by the browser and CLI front ends.

pub mod baseplates;
pub mod catalog;
pub mod error;
pub mod fit;
pub mod persist;
pub mod planner;
pub mod summary;
pub mod types;

pub use baseplates::{DEFAULT_MAX_TILE_UNITS, decompose_footprint, slice_baseplates};
pub use catalog::{container_color, default_container_types};
pub use error::PlannerError;
pub use fit::{
    ContainerFitSuggestion, ContainerFitSummary, DEFAULT_CLEARANCE_MM, suggest_container_fits,
};
pub use persist::{
    ACTIVE_LAYOUT_STORAGE_KEY, LayoutStore, clear_active_layout, load_active_layout,
    save_active_layout,
};
pub use planner::{
    Rect, can_place_container, container_types_by_id, derive_drawer_units, do_rectangles_overlap,
    does_placement_collide, effective_footprint, is_placement_within_bounds,
};
pub use summary::{aggregate_container_counts, build_print_summary};
pub use types::{
    BaseplateSizeCount, BaseplateStrategy, BaseplateSummary, BaseplateTile, ContainerCountSummary,
    ContainerType, DrawerInput, DrawerUnits, Placement, PlannerLayout, PrintSummary,
};
