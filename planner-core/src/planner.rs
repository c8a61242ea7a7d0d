//! Unit conversion and placement validation.
//!
//! Everything here is a pure function of its arguments; the placement list
//! and catalog are caller-owned snapshots passed in per call.

use std::collections::HashMap;

use crate::types::{ContainerType, DrawerInput, DrawerUnits, Placement};

/// Axis-aligned rectangle in grid units, used uniformly for placements and
/// baseplate tiles when testing for overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Convert physical drawer dimensions into whole grid cells.
///
/// A non-positive pitch yields a zero grid instead of an error: the form is
/// responsible for rejecting it, but a transiently invalid value must not
/// divide by zero. Fractional remainders are floored away; the leftover
/// millimeters are unusable space that the rendering layer reports.
pub fn derive_drawer_units(input: &DrawerInput) -> DrawerUnits {
    if input.grid_pitch_mm <= 0.0 {
        return DrawerUnits::default();
    }
    DrawerUnits {
        width_units: (input.width_mm / input.grid_pitch_mm).floor() as u32,
        depth_units: (input.depth_mm / input.grid_pitch_mm).floor() as u32,
    }
}

/// Occupied width/height of a container footprint after resolving rotation.
/// Single source of truth for orientation, shared by the validator, the
/// aggregator and the renderers.
pub fn effective_footprint(container_type: &ContainerType, rotated: bool) -> (u32, u32) {
    if rotated {
        (container_type.depth_units, container_type.width_units)
    } else {
        (container_type.width_units, container_type.depth_units)
    }
}

/// Build the id -> type lookup used by the validators and aggregator.
/// Rebuilt per call from the externally supplied list; the core holds no
/// catalog state of its own.
pub fn container_types_by_id(types: &[ContainerType]) -> HashMap<&str, &ContainerType> {
    types.iter().map(|t| (t.id.as_str(), t)).collect()
}

/// True iff the footprint at (x, y) lies fully inside the drawer grid.
/// The boundary is inclusive: a candidate exactly filling the remaining
/// space is accepted. `footprint` must already reflect rotation.
pub fn is_placement_within_bounds(
    drawer: DrawerUnits,
    footprint: (u32, u32),
    x: i32,
    y: i32,
) -> bool {
    let (width, height) = footprint;
    x >= 0
        && y >= 0
        && x as i64 + width as i64 <= drawer.width_units as i64
        && y as i64 + height as i64 <= drawer.depth_units as i64
}

/// Half-open interval overlap test. Rectangles that only share an edge or a
/// corner do NOT overlap, which keeps adjacent placements legal.
pub fn do_rectangles_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.x + a.width <= b.x
        || b.x + b.width <= a.x
        || a.y + a.height <= b.y
        || b.y + b.height <= a.y)
}

/// True iff a candidate footprint at (x, y) overlaps any existing placement.
/// `footprint` must already reflect the candidate's rotation.
pub fn does_placement_collide(
    placements: &[Placement],
    types_by_id: &HashMap<&str, &ContainerType>,
    footprint: (u32, u32),
    x: i32,
    y: i32,
) -> bool {
    let candidate = Rect {
        x,
        y,
        width: footprint.0 as i32,
        height: footprint.1 as i32,
    };

    placements.iter().any(|placement| {
        // Unknown ids are skipped, not errors: the catalog may briefly lag
        // the placement list while a catalog swap is in flight.
        let Some(placed_type) = types_by_id.get(placement.container_type_id.as_str()) else {
            return false;
        };
        let (width, height) = effective_footprint(placed_type, placement.rotated());
        let existing = Rect {
            x: placement.x,
            y: placement.y,
            width: width as i32,
            height: height as i32,
        };
        do_rectangles_overlap(&existing, &candidate)
    })
}

/// The single accept/reject gate for a new placement. Bounds are checked
/// before collision, so callers can re-run the two sub-checks to tell
/// "out of bounds" from "overlap" when building an error message.
pub fn can_place_container(
    drawer: DrawerUnits,
    placements: &[Placement],
    types_by_id: &HashMap<&str, &ContainerType>,
    container_type: &ContainerType,
    rotated: bool,
    x: i32,
    y: i32,
) -> bool {
    let footprint = effective_footprint(container_type, rotated);
    if !is_placement_within_bounds(drawer, footprint, x, y) {
        return false;
    }
    !does_placement_collide(placements, types_by_id, footprint, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container_type(id: &str, width_units: u32, depth_units: u32) -> ContainerType {
        ContainerType {
            id: id.to_string(),
            label: id.to_string(),
            color: None,
            width_units,
            depth_units,
        }
    }

    fn placement(type_id: &str, x: i32, y: i32) -> Placement {
        Placement {
            id: None,
            container_type_id: type_id.to_string(),
            x,
            y,
            is_rotated: None,
        }
    }

    fn drawer(width_units: u32, depth_units: u32) -> DrawerUnits {
        DrawerUnits {
            width_units,
            depth_units,
        }
    }

    #[test]
    fn derives_floored_unit_counts() {
        let units = derive_drawer_units(&DrawerInput {
            width_mm: 103.0,
            depth_mm: 77.0,
            grid_pitch_mm: 20.0,
        });
        assert_eq!(units, drawer(5, 3));
    }

    #[test]
    fn exact_multiples_convert_without_remainder() {
        let units = derive_drawer_units(&DrawerInput {
            width_mm: 600.0,
            depth_mm: 400.0,
            grid_pitch_mm: 42.0,
        });
        assert_eq!(units, drawer(14, 9));
    }

    #[test]
    fn non_positive_pitch_yields_zero_grid() {
        for pitch in [0.0, -5.0] {
            let units = derive_drawer_units(&DrawerInput {
                width_mm: 100.0,
                depth_mm: 100.0,
                grid_pitch_mm: pitch,
            });
            assert_eq!(units, drawer(0, 0));
        }
    }

    #[test]
    fn effective_footprint_swaps_when_rotated() {
        let wide = container_type("wide", 3, 1);
        assert_eq!(effective_footprint(&wide, false), (3, 1));
        assert_eq!(effective_footprint(&wide, true), (1, 3));
    }

    #[test]
    fn bounds_accept_interior_and_exact_fit() {
        assert!(is_placement_within_bounds(drawer(6, 6), (2, 3), 4, 3));
        // Footprint reaching exactly to the far edge is accepted.
        assert!(is_placement_within_bounds(drawer(6, 6), (6, 6), 0, 0));
    }

    #[test]
    fn bounds_reject_overhang_and_negative_origin() {
        assert!(!is_placement_within_bounds(drawer(6, 6), (2, 3), 5, 3));
        assert!(!is_placement_within_bounds(drawer(6, 6), (2, 3), -1, 0));
        assert!(!is_placement_within_bounds(drawer(6, 6), (2, 3), 0, -1));
    }

    #[test]
    fn edge_touching_rectangles_do_not_overlap() {
        let a = Rect {
            x: 0,
            y: 0,
            width: 2,
            height: 2,
        };
        let b = Rect {
            x: 2,
            y: 0,
            width: 2,
            height: 2,
        };
        assert!(!do_rectangles_overlap(&a, &b));

        // Corner touch only.
        let c = Rect {
            x: 2,
            y: 2,
            width: 2,
            height: 2,
        };
        assert!(!do_rectangles_overlap(&a, &c));
    }

    #[test]
    fn shared_cells_overlap() {
        let a = Rect {
            x: 1,
            y: 1,
            width: 3,
            height: 2,
        };
        let b = Rect {
            x: 3,
            y: 2,
            width: 2,
            height: 2,
        };
        assert!(do_rectangles_overlap(&a, &b));
        assert!(do_rectangles_overlap(&b, &a));
    }

    #[test]
    fn collision_respects_existing_rotation() {
        let types = vec![container_type("wide", 3, 1)];
        let by_id = container_types_by_id(&types);
        let mut rotated = placement("wide", 0, 0);
        rotated.is_rotated = Some(true);
        let placements = vec![rotated];

        // Rotated 3x1 occupies 1x3 at the origin: (1, 0) is free,
        // (0, 2) is covered.
        assert!(!does_placement_collide(&placements, &by_id, (1, 1), 1, 0));
        assert!(does_placement_collide(&placements, &by_id, (1, 1), 0, 2));
    }

    #[test]
    fn collision_skips_unknown_catalog_ids() {
        let types = vec![container_type("small", 2, 2)];
        let by_id = container_types_by_id(&types);
        let placements = vec![placement("missing", 0, 0), placement("small", 4, 4)];

        // The stale placement at the origin is ignored entirely.
        assert!(!does_placement_collide(&placements, &by_id, (2, 2), 0, 0));
        assert!(does_placement_collide(&placements, &by_id, (2, 2), 3, 3));
    }

    #[test]
    fn can_place_distinguishes_overlap_from_bounds() {
        let types = vec![container_type("wide", 3, 1)];
        let by_id = container_types_by_id(&types);
        let existing = vec![placement("wide", 1, 1)];
        let wide = &types[0];
        let grid = drawer(8, 6);

        // Overlapping column range on the same row.
        assert!(!can_place_container(grid, &existing, &by_id, wide, false, 2, 1));
        // One row up only touches the existing edge.
        assert!(can_place_container(grid, &existing, &by_id, wide, false, 2, 0));
        // Out of bounds regardless of other placements.
        assert!(!can_place_container(grid, &[], &by_id, wide, false, 6, 0));
    }

    #[test]
    fn can_place_resolves_candidate_rotation() {
        let types = vec![container_type("wide", 3, 1)];
        let by_id = container_types_by_id(&types);
        let wide = &types[0];
        let grid = drawer(4, 4);

        // Unrotated 3x1 fits at x=1; rotated it becomes 1x3 and overhangs
        // the bottom edge from y=2.
        assert!(can_place_container(grid, &[], &by_id, wide, false, 1, 3));
        assert!(!can_place_container(grid, &[], &by_id, wide, true, 1, 2));
        assert!(can_place_container(grid, &[], &by_id, wide, true, 1, 1));
    }
}
