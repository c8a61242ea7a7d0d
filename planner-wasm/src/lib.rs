//! Browser boundary for the Planfinity drawer planner.
//!
//! Renders the drawer grid on a canvas, handles placement interaction
//! (hover preview, held-R rotation, right-click rotated placement,
//! click-to-remove), and wires the drawer form, fit finder, print sheet,
//! exports and localStorage persistence to the pure core.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Blob, BlobPropertyBag, CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement,
    HtmlInputElement, HtmlSelectElement, KeyboardEvent, MouseEvent, Url,
};

use planner_core::{
    BaseplateStrategy, ContainerType, DEFAULT_CLEARANCE_MM, DEFAULT_MAX_TILE_UNITS, DrawerInput,
    DrawerUnits, Placement, PlannerLayout, build_print_summary, can_place_container,
    container_color, container_types_by_id, default_container_types, derive_drawer_units,
    does_placement_collide, effective_footprint, is_placement_within_bounds,
    suggest_container_fits,
};
use printsheet_core::{build_print_sheet_svg, encode_rgba_to_png_bytes, fmt_mm, svg_escape};

mod state;
mod storage;
mod upload;
mod utils;

use state::{STATE, State};
use utils::{
    event_canvas_coords, fetch_text_with_fallbacks, get_query_param, log, save_text_as_file,
    set_fill_style, set_stroke_style,
};

const CELL_PX: f64 = 30.0;
const PRINT_SHEET_PX_PER_UNIT: f64 = 24.0;

const DEFAULT_DRAWER_INPUT: DrawerInput = DrawerInput {
    width_mm: 600.0,
    depth_mm: 400.0,
    grid_pitch_mm: 42.0,
};

fn html_escape(s: &str) -> String {
    svg_escape(s).replace('"', "&quot;")
}

fn selected_type(state: &State) -> Option<ContainerType> {
    state
        .container_types
        .iter()
        .find(|t| t.id == state.selected_type_id)
        .or_else(|| state.container_types.first())
        .cloned()
}

/// Millimeters of drawer beyond the last full grid cell on each axis.
fn leftover_mm(state: &State) -> (f64, f64) {
    let pitch = state.drawer_input.grid_pitch_mm;
    if pitch <= 0.0 {
        return (0.0, 0.0);
    }
    let used_w = state.drawer_units.width_units as f64 * pitch;
    let used_d = state.drawer_units.depth_units as f64 * pitch;
    (
        (state.drawer_input.width_mm - used_w).max(0.0),
        (state.drawer_input.depth_mm - used_d).max(0.0),
    )
}

/// Shift a candidate cell so the footprint stays inside the grid near edges.
fn adjusted_position(units: DrawerUnits, footprint: (u32, u32), x: i32, y: i32) -> (i32, i32) {
    let max_x = units.width_units.saturating_sub(footprint.0) as i32;
    let max_y = units.depth_units.saturating_sub(footprint.1) as i32;
    (x.min(max_x), y.min(max_y))
}

pub(crate) fn current_layout(state: &State) -> PlannerLayout {
    PlannerLayout {
        drawer: state.drawer_input,
        container_types: state.container_types.clone(),
        placements: state.placements.clone(),
    }
}

pub(crate) fn persist_current(state: &State) {
    storage::save_layout(&state.window, &current_layout(state));
}

pub(crate) fn apply_layout(state: &mut State, layout: PlannerLayout) {
    state.drawer_input = layout.drawer;
    if !layout.container_types.is_empty() {
        state.container_types = layout.container_types;
    }
    state.placements = layout.placements;
    state.drawer_units = derive_drawer_units(&state.drawer_input);
    if !state
        .container_types
        .iter()
        .any(|t| t.id == state.selected_type_id)
    {
        state.selected_type_id = state
            .container_types
            .first()
            .map(|t| t.id.clone())
            .unwrap_or_default();
    }
}

pub(crate) fn draw(state: &State) {
    let units = state.drawer_units;
    let grid_w = units.width_units as f64 * CELL_PX;
    let grid_h = units.depth_units as f64 * CELL_PX;
    let (extra_w_mm, extra_d_mm) = leftover_mm(state);
    let pitch = state.drawer_input.grid_pitch_mm;
    let extra_w_px = if pitch > 0.0 {
        extra_w_mm / pitch * CELL_PX
    } else {
        0.0
    };
    let extra_d_px = if pitch > 0.0 {
        extra_d_mm / pitch * CELL_PX
    } else {
        0.0
    };
    let total_w = (grid_w + extra_w_px).max(1.0);
    let total_h = (grid_h + extra_d_px).max(1.0);
    state.canvas.set_width(total_w.ceil() as u32);
    state.canvas.set_height(total_h.ceil() as u32);

    let ctx = &state.ctx;
    set_fill_style(ctx, "#ffffff");
    ctx.fill_rect(0.0, 0.0, total_w, total_h);

    // Unusable remainder strips outside the last full cell.
    if extra_w_px > 0.5 || extra_d_px > 0.5 {
        set_fill_style(ctx, "#fde68a");
        if extra_w_px > 0.5 {
            ctx.fill_rect(grid_w, 0.0, extra_w_px, total_h);
        }
        if extra_d_px > 0.5 {
            ctx.fill_rect(0.0, grid_h, grid_w, extra_d_px);
        }
        set_fill_style(ctx, "#92400e");
        ctx.set_font("11px sans-serif");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        if extra_w_px > 14.0 {
            let _ = ctx.fill_text(
                &format!("+{}mm", fmt_mm(extra_w_mm)),
                grid_w + extra_w_px / 2.0,
                10.0,
            );
        }
        if extra_d_px > 14.0 {
            let _ = ctx.fill_text(
                &format!("+{}mm", fmt_mm(extra_d_mm)),
                grid_w / 2.0,
                grid_h + extra_d_px / 2.0,
            );
        }
    }

    // Cell grid.
    set_stroke_style(ctx, "#e5e7eb");
    ctx.set_line_width(1.0);
    ctx.begin_path();
    for x in 0..=units.width_units {
        let px = x as f64 * CELL_PX;
        ctx.move_to(px, 0.0);
        ctx.line_to(px, grid_h);
    }
    for y in 0..=units.depth_units {
        let py = y as f64 * CELL_PX;
        ctx.move_to(0.0, py);
        ctx.line_to(grid_w, py);
    }
    ctx.stroke();

    // Placements, topmost last.
    let by_id = container_types_by_id(&state.container_types);
    ctx.set_font("12px sans-serif");
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for placement in &state.placements {
        let Some(container_type) = by_id.get(placement.container_type_id.as_str()) else {
            continue;
        };
        let (w, h) = effective_footprint(container_type, placement.rotated());
        let x = placement.x as f64 * CELL_PX;
        let y = placement.y as f64 * CELL_PX;
        let w_px = w as f64 * CELL_PX;
        let h_px = h as f64 * CELL_PX;
        let color = container_type
            .color
            .clone()
            .unwrap_or_else(|| container_color(0));
        set_fill_style(ctx, &color);
        ctx.fill_rect(x, y, w_px, h_px);
        set_stroke_style(ctx, "#374151");
        ctx.set_line_width(2.0);
        ctx.stroke_rect(x, y, w_px, h_px);
        set_fill_style(ctx, "#111827");
        let _ = ctx.fill_text(&container_type.label, x + w_px / 2.0, y + h_px / 2.0);
    }

    // Ghost preview for the hovered cell.
    if let Some((hx, hy)) = state.hover_cell
        && let Some(selected) = selected_type(state)
    {
        let footprint = effective_footprint(&selected, state.rotate_held);
        let (ax, ay) = adjusted_position(units, footprint, hx, hy);
        let in_bounds = is_placement_within_bounds(units, footprint, ax, ay);
        let collides =
            in_bounds && does_placement_collide(&state.placements, &by_id, footprint, ax, ay);
        let (fill, stroke) = if in_bounds && !collides {
            ("rgba(37, 99, 235, 0.25)", "#2563eb")
        } else {
            ("rgba(239, 68, 68, 0.25)", "#ef4444")
        };
        let x = ax as f64 * CELL_PX;
        let y = ay as f64 * CELL_PX;
        let w_px = footprint.0 as f64 * CELL_PX;
        let h_px = footprint.1 as f64 * CELL_PX;
        set_fill_style(ctx, fill);
        ctx.fill_rect(x, y, w_px, h_px);
        set_stroke_style(ctx, stroke);
        ctx.set_line_width(2.0);
        ctx.stroke_rect(x, y, w_px, h_px);
    }
}

fn set_placement_error(state: &State, message: Option<&str>) {
    if let Some(el) = state.document.get_element_by_id("placementError")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(message.unwrap_or(""));
    }
}

pub(crate) fn update_summary_dom(state: &State) {
    if let Some(el) = state.document.get_element_by_id("gridBadge")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        el.set_inner_text(&format!(
            "{} x {} units",
            state.drawer_units.width_units, state.drawer_units.depth_units
        ));
    }

    if let Some(el) = state.document.get_element_by_id("coverage")
        && let Ok(el) = el.dyn_into::<HtmlElement>()
    {
        let pitch = state.drawer_input.grid_pitch_mm;
        let (extra_w, extra_d) = leftover_mm(state);
        let used_w = state.drawer_units.width_units as f64 * pitch.max(0.0);
        let used_d = state.drawer_units.depth_units as f64 * pitch.max(0.0);
        let mut text = format!(
            "Grid coverage: {}mm x {}mm",
            fmt_mm(used_w),
            fmt_mm(used_d)
        );
        if extra_w > 0.0 || extra_d > 0.0 {
            text.push_str(&format!(
                " (extra: +{}mm width, +{}mm depth)",
                fmt_mm(extra_w),
                fmt_mm(extra_d)
            ));
        }
        el.set_inner_text(&text);
    }

    let Some(el) = state.document.get_element_by_id("summaryContent") else {
        return;
    };
    let Ok(el) = el.dyn_into::<HtmlElement>() else {
        return;
    };

    let summary = match build_print_summary(
        state.drawer_units,
        &state.placements,
        &state.container_types,
        DEFAULT_MAX_TILE_UNITS,
        state.strategy,
    ) {
        Ok(summary) => summary,
        Err(e) => {
            // Strict-path failure: surface it instead of rendering a stale list.
            log(&format!("print summary failed: {e}"));
            el.set_inner_text(&format!("Summary unavailable: {e}"));
            return;
        }
    };

    let mut html = String::new();
    html.push_str(&format!(
        "<p>Placed containers: {}</p>",
        state.placements.len()
    ));
    if summary.container_counts.is_empty() {
        html.push_str("<p>No containers placed.</p>");
    } else {
        html.push_str("<ul style=\"margin:0;padding-left:18px\">");
        for c in &summary.container_counts {
            html.push_str(&format!(
                "<li>{} ({}x{}): {}</li>",
                html_escape(&c.label),
                c.width_units,
                c.depth_units,
                c.count
            ));
        }
        html.push_str("</ul>");
    }
    html.push_str(&format!(
        "<p>Baseplates (&le;{0}x{0}): {1} tiles</p>",
        summary.baseplates.max_tile_units, summary.baseplates.total_tiles
    ));
    if !summary.baseplates.size_counts.is_empty() {
        html.push_str("<ul style=\"margin:0;padding-left:18px\">");
        for size in &summary.baseplates.size_counts {
            html.push_str(&format!(
                "<li>{}x{}: {}</li>",
                size.width_units, size.depth_units, size.count
            ));
        }
        html.push_str("</ul>");
    }
    let container_total: u32 = summary.container_counts.iter().map(|c| c.count).sum();
    html.push_str(&format!(
        "<p>Totals: {} containers, {} baseplates</p>",
        container_total, summary.baseplates.total_tiles
    ));
    el.set_inner_html(&html);
}

pub(crate) fn sync_form_inputs(state: &State) {
    let doc = &state.document;
    let set_input = |id: &str, value: String| {
        if let Some(el) = doc.get_element_by_id(id)
            && let Ok(input) = el.dyn_into::<HtmlInputElement>()
        {
            input.set_value(&value);
        }
    };
    set_input("drawerWidth", fmt_mm(state.drawer_input.width_mm));
    set_input("drawerDepth", fmt_mm(state.drawer_input.depth_mm));
    set_input("drawerPitch", fmt_mm(state.drawer_input.grid_pitch_mm));

    if let Some(el) = doc.get_element_by_id("strategySel")
        && let Ok(sel) = el.dyn_into::<HtmlSelectElement>()
    {
        sel.set_value(state.strategy.as_str());
    }
    populate_type_select(state);
}

pub(crate) fn populate_type_select(state: &State) {
    if let Some(el) = state.document.get_element_by_id("typeSel")
        && let Ok(sel) = el.dyn_into::<HtmlSelectElement>()
    {
        let mut html = String::new();
        for t in &state.container_types {
            html.push_str(&format!(
                "<option value=\"{}\">{} ({}x{} units)</option>",
                html_escape(&t.id),
                html_escape(&t.label),
                t.width_units,
                t.depth_units
            ));
        }
        sel.set_inner_html(&html);
        sel.set_value(&state.selected_type_id);
    }
}

fn placement_index_at(state: &State, x: i32, y: i32) -> Option<usize> {
    let by_id = container_types_by_id(&state.container_types);
    state.placements.iter().rposition(|p| {
        let Some(container_type) = by_id.get(p.container_type_id.as_str()) else {
            return false;
        };
        let (w, h) = effective_footprint(container_type, p.rotated());
        x >= p.x && x < p.x + w as i32 && y >= p.y && y < p.y + h as i32
    })
}

fn place_at_cell(state: &mut State, x: i32, y: i32, rotated: bool) {
    let Some(selected) = selected_type(state) else {
        return;
    };
    let footprint = effective_footprint(&selected, rotated);
    let (ax, ay) = adjusted_position(state.drawer_units, footprint, x, y);
    let by_id = container_types_by_id(&state.container_types);

    if !can_place_container(
        state.drawer_units,
        &state.placements,
        &by_id,
        &selected,
        rotated,
        ax,
        ay,
    ) {
        // Re-run the sub-checks so the message names the failed rule.
        let message = if !is_placement_within_bounds(state.drawer_units, footprint, ax, ay) {
            "Placement is outside the grid bounds."
        } else if does_placement_collide(&state.placements, &by_id, footprint, ax, ay) {
            "Placement overlaps an existing container."
        } else {
            "Placement is invalid."
        };
        set_placement_error(state, Some(message));
        return;
    }

    state.placement_seq += 1;
    let id = format!("{}-{}-{}-{}", selected.id, ax, ay, state.placement_seq);
    state.placements.push(Placement {
        id: Some(id),
        container_type_id: selected.id.clone(),
        x: ax,
        y: ay,
        is_rotated: if rotated { Some(true) } else { None },
    });
    set_placement_error(state, None);
    persist_current(state);
    draw(state);
    update_summary_dom(state);
}

fn remove_placement_at(state: &mut State, index: usize) {
    state.placements.remove(index);
    set_placement_error(state, None);
    persist_current(state);
    draw(state);
    update_summary_dom(state);
}

fn update_fit_dom(state: &State) {
    let doc = &state.document;
    let Some(el) = doc.get_element_by_id("fitResults") else {
        return;
    };
    let Ok(el) = el.dyn_into::<HtmlElement>() else {
        return;
    };

    let read_number = |id: &str| -> Option<f64> {
        doc.get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.value().trim().parse::<f64>().ok())
    };
    let Some(object_w) = read_number("fitWidth") else {
        el.set_inner_text("Enter the object width and depth in mm.");
        return;
    };
    let Some(object_d) = read_number("fitDepth") else {
        el.set_inner_text("Enter the object width and depth in mm.");
        return;
    };
    let clearance = read_number("fitClearance").unwrap_or(DEFAULT_CLEARANCE_MM);

    match suggest_container_fits(
        &state.container_types,
        state.drawer_input.grid_pitch_mm,
        object_w,
        object_d,
        clearance,
    ) {
        Ok(result) => {
            let mut html = format!(
                "<p>Needs {} x {} units ({}mm x {}mm with clearance)</p>",
                result.required_width_units,
                result.required_depth_units,
                fmt_mm(result.required_width_mm),
                fmt_mm(result.required_depth_mm)
            );
            if result.suggestions.is_empty() {
                html.push_str("<p>No catalog container fits this object.</p>");
            } else {
                html.push_str("<ul style=\"margin:0;padding-left:18px\">");
                for s in &result.suggestions {
                    let rotated = if s.uses_rotated_fit { ", rotated" } else { "" };
                    html.push_str(&format!(
                        "<li>{} ({}x{} units, slack {}mm x {}mm{})</li>",
                        html_escape(&s.label),
                        s.width_units,
                        s.depth_units,
                        fmt_mm(s.slack_width_mm),
                        fmt_mm(s.slack_depth_mm),
                        rotated
                    ));
                }
                html.push_str("</ul>");
            }
            el.set_inner_html(&html);
        }
        Err(e) => {
            el.set_inner_text(&e.to_string());
        }
    }
}

fn open_print_sheet(state: &State) -> Result<(), JsValue> {
    let summary = build_print_summary(
        state.drawer_units,
        &state.placements,
        &state.container_types,
        DEFAULT_MAX_TILE_UNITS,
        state.strategy,
    )
    .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let (svg, _w_px, _h_px) = build_print_sheet_svg(
        &state.drawer_input,
        state.drawer_units,
        state.strategy,
        &summary,
        PRINT_SHEET_PX_PER_UNIT,
    );

    let array = Array::new();
    array.push(&JsValue::from_str(&svg));
    let options = BlobPropertyBag::new();
    options.set_type("image/svg+xml");
    let blob = Blob::new_with_str_sequence_and_options(&array, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    // The object URL stays alive for the new tab; revoking here would
    // cancel the load.
    if state
        .window
        .open_with_url_and_target(&url, "_blank")?
        .is_none()
    {
        log("Popup blocked; downloading the print sheet instead");
        save_text_as_file(&state.document, "planfinity_printsheet.svg", &svg)?;
    }
    Ok(())
}

/// Export the current plan canvas as a deterministic PNG download.
fn export_plan_png(state: &State) -> Result<(), JsValue> {
    let w = state.canvas.width();
    let h = state.canvas.height();
    let image = state
        .ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)?;
    let rgba = image.data().0;
    let bytes = encode_rgba_to_png_bytes(w, h, &rgba)
        .map_err(|e| JsValue::from_str(&format!("encode: {e}")))?;

    let array = Array::new();
    let u8 = js_sys::Uint8Array::from(bytes.as_slice());
    array.push(&u8);
    let blob = Blob::new_with_u8_array_sequence(&array)?;
    let url = Url::create_object_url_with_blob(&blob)?;
    let a = state
        .document
        .create_element("a")?
        .dyn_into::<HtmlElement>()?;
    a.set_attribute("href", &url)?;
    a.set_attribute("download", "planfinity_plan.png")?;
    a.click();
    Url::revoke_object_url(&url)?;
    Ok(())
}

fn cell_from_event(e: &MouseEvent, canvas: &HtmlCanvasElement) -> (i32, i32) {
    let (px, py) = event_canvas_coords(e, canvas);
    ((px / CELL_PX).floor() as i32, (py / CELL_PX).floor() as i32)
}

fn attach_ui(state: Rc<RefCell<State>>) -> Result<(), JsValue> {
    let doc = state.borrow().document.clone();

    upload::attach_file_input(state.clone())?;

    // Drawer form: applying new dimensions clears placements.
    if let Some(btn) = doc.get_element_by_id("applyDrawer") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            let read = |id: &str| -> Option<f64> {
                s.document
                    .get_element_by_id(id)
                    .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
                    .and_then(|input| input.value().trim().parse::<f64>().ok())
                    .filter(|v| v.is_finite() && *v > 0.0)
            };
            let (Some(width), Some(depth), Some(pitch)) = (
                read("drawerWidth"),
                read("drawerDepth"),
                read("drawerPitch"),
            ) else {
                set_placement_error(&s, Some("Enter positive drawer dimensions in mm."));
                return;
            };
            s.drawer_input = DrawerInput {
                width_mm: width,
                depth_mm: depth,
                grid_pitch_mm: pitch,
            };
            s.drawer_units = derive_drawer_units(&s.drawer_input);
            s.placements.clear();
            s.hover_cell = None;
            set_placement_error(&s, None);
            persist_current(&s);
            draw(&s);
            update_summary_dom(&s);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Container type palette.
    if let Some(sel) = doc.get_element_by_id("typeSel") {
        let sel: HtmlSelectElement = sel.dyn_into()?;
        let st = state.clone();
        let sel_read = sel.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.selected_type_id = sel_read.value();
            draw(&s);
        }));
        sel.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    // Baseplate strategy toggle.
    if let Some(sel) = doc.get_element_by_id("strategySel") {
        let sel: HtmlSelectElement = sel.dyn_into()?;
        let st = state.clone();
        let sel_read = sel.clone();
        let onchange = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            if let Some(strategy) = BaseplateStrategy::from_name(&sel_read.value()) {
                s.strategy = strategy;
                update_summary_dom(&s);
            }
        }));
        sel.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
    }

    // Reset: drop placements and the saved layout.
    if let Some(btn) = doc.get_element_by_id("resetLayout") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            s.placements.clear();
            s.hover_cell = None;
            s.placement_seq = 0;
            storage::clear_layout(&s.window);
            set_placement_error(&s, None);
            draw(&s);
            update_summary_dom(&s);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Download the current layout as JSON.
    if let Some(btn) = doc.get_element_by_id("downloadLayout") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let s = st.borrow();
            let json = serde_json::to_string_pretty(&current_layout(&s))
                .unwrap_or_else(|_| "{}".to_string());
            let _ = save_text_as_file(&s.document, "planfinity_layout.json", &json);
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Print sheet in a new tab.
    if let Some(btn) = doc.get_element_by_id("printSheet") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(e) = open_print_sheet(&st.borrow()) {
                log(&format!("print sheet failed: {e:?}"));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // PNG export of the plan canvas.
    if let Some(btn) = doc.get_element_by_id("exportPng") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            if let Err(e) = export_plan_png(&st.borrow()) {
                log(&format!("png export failed: {e:?}"));
            }
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Fit finder.
    if let Some(btn) = doc.get_element_by_id("runFit") {
        let btn: HtmlElement = btn.dyn_into()?;
        let st = state.clone();
        let onclick = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            update_fit_dom(&st.borrow());
        }));
        btn.set_onclick(Some(onclick.as_ref().unchecked_ref()));
        onclick.forget();
    }

    // Canvas interaction.
    {
        let st = state.clone();
        let mousemove = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let cell = cell_from_event(&e, &s.canvas);
            let in_grid = cell.0 >= 0
                && cell.1 >= 0
                && (cell.0 as u32) < s.drawer_units.width_units
                && (cell.1 as u32) < s.drawer_units.depth_units;
            let next = in_grid.then_some(cell);
            if next != s.hover_cell {
                s.hover_cell = next;
                draw(&s);
            }
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;
        mousemove.forget();
    }
    {
        let st = state.clone();
        let mouseleave = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |_e: MouseEvent| {
            let mut s = st.borrow_mut();
            if s.hover_cell.is_some() {
                s.hover_cell = None;
                draw(&s);
            }
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("mouseleave", mouseleave.as_ref().unchecked_ref())?;
        mouseleave.forget();
    }
    {
        let st = state.clone();
        let onclick = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            let mut s = st.borrow_mut();
            let (x, y) = cell_from_event(&e, &s.canvas);
            if let Some(index) = placement_index_at(&s, x, y) {
                remove_placement_at(&mut s, index);
            } else {
                let rotated = s.rotate_held;
                place_at_cell(&mut s, x, y, rotated);
            }
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
        onclick.forget();
    }
    {
        // Right-click places rotated directly.
        let st = state.clone();
        let oncontext = Closure::<dyn FnMut(MouseEvent)>::wrap(Box::new(move |e: MouseEvent| {
            e.prevent_default();
            let mut s = st.borrow_mut();
            let (x, y) = cell_from_event(&e, &s.canvas);
            if placement_index_at(&s, x, y).is_none() {
                place_at_cell(&mut s, x, y, true);
            }
        }));
        state
            .borrow()
            .canvas
            .add_event_listener_with_callback("contextmenu", oncontext.as_ref().unchecked_ref())?;
        oncontext.forget();
    }

    // Held R rotates the placement preview.
    let window = state.borrow().window.clone();
    {
        let st = state.clone();
        let keydown = Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |e: KeyboardEvent| {
            if e.key().eq_ignore_ascii_case("r") && !e.repeat() {
                let mut s = st.borrow_mut();
                s.rotate_held = true;
                draw(&s);
            }
        }));
        window.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref())?;
        keydown.forget();
    }
    {
        let st = state.clone();
        let keyup = Closure::<dyn FnMut(KeyboardEvent)>::wrap(Box::new(move |e: KeyboardEvent| {
            if e.key().eq_ignore_ascii_case("r") {
                let mut s = st.borrow_mut();
                s.rotate_held = false;
                draw(&s);
            }
        }));
        window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;
        keyup.forget();
    }
    {
        let st = state.clone();
        let onblur = Closure::<dyn FnMut()>::wrap(Box::new(move || {
            let mut s = st.borrow_mut();
            if s.rotate_held {
                s.rotate_held = false;
                draw(&s);
            }
        }));
        window.add_event_listener_with_callback("blur", onblur.as_ref().unchecked_ref())?;
        onblur.forget();
    }

    Ok(())
}

fn init_canvas(
    document: &Document,
) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let cv = document
        .get_element_by_id("cv")
        .ok_or_else(|| JsValue::from_str("canvas #cv not found"))?
        .dyn_into::<HtmlCanvasElement>()?;
    let ctx = cv
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2D context not available"))?
        .dyn_into::<CanvasRenderingContext2d>()?;
    Ok((cv, ctx))
}

// Accept either a bare container list or a {"containerTypes": [...]} wrapper.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    container_types: Vec<ContainerType>,
}

fn parse_catalog_json(text: &str) -> Result<Vec<ContainerType>, String> {
    if let Ok(list) = serde_json::from_str::<Vec<ContainerType>>(text) {
        return Ok(list);
    }
    serde_json::from_str::<CatalogFile>(text)
        .map(|f| f.container_types)
        .map_err(|e| e.to_string())
}

async fn fetch_and_apply_catalog(name: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let text = fetch_text_with_fallbacks(
        &window,
        &[
            &format!("catalogs/{name}.json"),
            &format!("/catalogs/{name}.json"),
        ],
    )
    .await
    .ok_or_else(|| JsValue::from_str("catalog fetch failed"))?;
    let types = parse_catalog_json(&text).map_err(|e| JsValue::from_str(&e))?;
    if types.is_empty() {
        return Err(JsValue::from_str("catalog is empty"));
    }

    STATE.with(|st| {
        if let Some(st_rc) = st.borrow().as_ref() {
            let mut s = st_rc.borrow_mut();
            s.container_types = types;
            s.selected_type_id = s
                .container_types
                .first()
                .map(|t| t.id.clone())
                .unwrap_or_default();
            populate_type_select(&s);
            draw(&s);
            update_summary_dom(&s);
        }
    });
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let (canvas, ctx) = init_canvas(&document)?;

    // Restore the previous session if one was saved.
    let (drawer_input, container_types, placements) = match storage::load_layout(&window) {
        Some(layout) => {
            let types = if layout.container_types.is_empty() {
                default_container_types()
            } else {
                layout.container_types
            };
            (layout.drawer, types, layout.placements)
        }
        None => (DEFAULT_DRAWER_INPUT, default_container_types(), Vec::new()),
    };
    let drawer_units = derive_drawer_units(&drawer_input);
    let selected_type_id = container_types
        .first()
        .map(|t| t.id.clone())
        .unwrap_or_default();

    let state = Rc::new(RefCell::new(State {
        window: window.clone(),
        document,
        canvas,
        ctx,
        drawer_input,
        drawer_units,
        container_types,
        selected_type_id,
        placements,
        strategy: BaseplateStrategy::default(),
        hover_cell: None,
        rotate_held: false,
        placement_seq: 0,
    }));
    STATE.with(|st| st.replace(Some(state.clone())));

    // Optional catalog override via ?catalog=<name>; fire-and-forget with
    // the built-in catalog already loaded as fallback.
    if let Ok(search) = window.location().search()
        && let Some(name) = get_query_param(&search, "catalog")
    {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = fetch_and_apply_catalog(&name).await {
                log(&format!("Failed to load catalog '{}': {:?}", name, err));
            }
        });
    }

    attach_ui(state.clone())?;
    {
        let s = state.borrow();
        sync_form_inputs(&s);
        draw(&s);
        update_summary_dom(&s);
    }
    Ok(())
}
