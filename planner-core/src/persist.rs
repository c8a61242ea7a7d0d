//! Layout persistence over an abstract key-value store.
//!
//! The browser front end backs this with `localStorage`; tests use an
//! in-memory map. Corrupt or invalid stored data reads back as "nothing
//! saved" rather than an error.

use crate::types::PlannerLayout;

pub const ACTIVE_LAYOUT_STORAGE_KEY: &str = "planfinity.activeLayout";

/// Minimal key-value surface of the browser `Storage` object.
pub trait LayoutStore {
    fn get_item(&self, key: &str) -> Option<String>;
    /// Implementations swallow write failures (quota, private mode) to keep
    /// the app usable.
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
}

pub fn save_active_layout(layout: &PlannerLayout, store: &mut dyn LayoutStore) {
    if let Ok(json) = serde_json::to_string(layout) {
        store.set_item(ACTIVE_LAYOUT_STORAGE_KEY, &json);
    }
}

/// Load the saved layout, or `None` when nothing usable is stored.
pub fn load_active_layout(store: &dyn LayoutStore) -> Option<PlannerLayout> {
    let raw = store.get_item(ACTIVE_LAYOUT_STORAGE_KEY)?;
    let layout: PlannerLayout = serde_json::from_str(&raw).ok()?;
    if !is_valid_layout(&layout) {
        return None;
    }
    Some(layout)
}

pub fn clear_active_layout(store: &mut dyn LayoutStore) {
    store.remove_item(ACTIVE_LAYOUT_STORAGE_KEY);
}

fn is_valid_layout(layout: &PlannerLayout) -> bool {
    is_positive_number(layout.drawer.width_mm)
        && is_positive_number(layout.drawer.depth_mm)
        && is_positive_number(layout.drawer.grid_pitch_mm)
}

fn is_positive_number(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
