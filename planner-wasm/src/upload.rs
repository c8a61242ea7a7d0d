use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, FileReader, HtmlInputElement};

use planner_core::PlannerLayout;

use crate::state::State;
use crate::utils::log;
use crate::{apply_layout, draw, persist_current, sync_form_inputs, update_summary_dom};

// Wires up the file input handler for importing a saved layout JSON.
pub fn attach_file_input(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();
    let Some(input) = doc.get_element_by_id("layoutFile") else {
        return Ok(());
    };
    let input: HtmlInputElement = input.dyn_into()?;
    let st = state.clone();
    let input_for_closure = input.clone();
    let onchange = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        let Some(files) = input_for_closure.files() else {
            log("No file list on input");
            return;
        };
        if files.length() == 0 {
            return;
        }
        let file = files.item(0).unwrap();
        let reader = match FileReader::new() {
            Ok(r) => r,
            Err(_) => return,
        };
        let st2 = st.clone();
        // Clone the FileReader for use inside the onload closure
        let reader_for_closure = reader.clone();
        let onload = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_ev: Event| {
            let text = reader_for_closure
                .result()
                .ok()
                .and_then(|v| v.as_string())
                .unwrap_or_default();
            if text.is_empty() {
                log("Selected file is empty or unreadable");
                return;
            }
            match serde_json::from_str::<PlannerLayout>(&text) {
                Ok(layout) if layout.drawer.grid_pitch_mm > 0.0 => {
                    let mut s = st2.borrow_mut();
                    apply_layout(&mut s, layout);
                    persist_current(&s);
                    sync_form_inputs(&s);
                    draw(&s);
                    update_summary_dom(&s);
                }
                Ok(_) => {
                    log("Layout file has no usable drawer dimensions");
                    let _ = st2
                        .borrow()
                        .window
                        .alert_with_message("The layout file has no usable drawer dimensions.");
                }
                Err(e) => {
                    log(&format!("Failed to parse layout: {e}"));
                    let _ = st2
                        .borrow()
                        .window
                        .alert_with_message("Unrecognized layout JSON file.");
                }
            }
        }));
        reader.set_onload(Some(onload.as_ref().unchecked_ref()));
        if let Err(e) = reader.read_as_text(&file) {
            log(&format!("Failed to read file: {:?}", e));
        }
        onload.forget();
    }));
    input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
    onchange.forget();
    Ok(())
}
