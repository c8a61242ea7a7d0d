use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use planner_core::{BaseplateStrategy, ContainerType, DrawerInput, DrawerUnits, Placement};

/// Application state stored behind an `Rc<RefCell<_>>` so it can be shared
/// across the WASM callbacks.
pub struct State {
    pub window: Window,
    pub document: Document,
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub drawer_input: DrawerInput,
    pub drawer_units: DrawerUnits,
    pub container_types: Vec<ContainerType>,
    pub selected_type_id: String,
    pub placements: Vec<Placement>,
    pub strategy: BaseplateStrategy,
    // hovered grid cell, if the pointer is over the grid
    pub hover_cell: Option<(i32, i32)>,
    // true while R is held: the next placement is rotated
    pub rotate_held: bool,
    // monotonic counter for caller-assigned placement ids
    pub placement_seq: u64,
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<State>>>> = const { RefCell::new(None) };
}
