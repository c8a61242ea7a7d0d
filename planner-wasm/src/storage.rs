//! `LayoutStore` backed by the browser's localStorage.

use web_sys::{Storage, Window};

use planner_core::{
    LayoutStore, PlannerLayout, clear_active_layout, load_active_layout, save_active_layout,
};

pub struct BrowserStore(Storage);

impl BrowserStore {
    pub fn from_window(window: &Window) -> Option<Self> {
        window.local_storage().ok().flatten().map(BrowserStore)
    }
}

impl LayoutStore for BrowserStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.0.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        // Quota and private-mode failures are ignored to keep the app usable.
        let _ = self.0.set_item(key, value);
    }

    fn remove_item(&mut self, key: &str) {
        let _ = self.0.remove_item(key);
    }
}

pub fn save_layout(window: &Window, layout: &PlannerLayout) {
    if let Some(mut store) = BrowserStore::from_window(window) {
        save_active_layout(layout, &mut store);
    }
}

pub fn load_layout(window: &Window) -> Option<PlannerLayout> {
    let store = BrowserStore::from_window(window)?;
    load_active_layout(&store)
}

pub fn clear_layout(window: &Window) {
    if let Some(mut store) = BrowserStore::from_window(window) {
        clear_active_layout(&mut store);
    }
}
