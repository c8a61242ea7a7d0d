//! Print sheet builder: renders a `PrintSummary` into a printable SVG
//! document (drawer diagram, container counts, baseplate counts, totals),
//! shared by the CLI and the browser front end.

use png::{BitDepth, ColorType, Encoder};

use planner_core::{BaseplateStrategy, DrawerInput, DrawerUnits, PrintSummary};

const TITLE_PX: f64 = 26.0;
const TEXT_PX: f64 = 16.0;
const LINE_H_PX: f64 = 22.0;
const PAD_PX: f64 = 20.0;
const GAP_PX: f64 = 14.0;

/// Build the print sheet SVG for one layout. Returns the document and its
/// pixel dimensions. Output is deterministic for identical inputs.
pub fn build_print_sheet_svg(
    drawer: &DrawerInput,
    units: DrawerUnits,
    strategy: BaseplateStrategy,
    summary: &PrintSummary,
    px_per_unit: f64,
) -> (String, u32, u32) {
    let ppu = if px_per_unit > 0.0 { px_per_unit } else { 24.0 };

    let meta_lines = [
        format!(
            "Drawer input: {} mm x {} mm @ {} mm pitch",
            fmt_mm(drawer.width_mm),
            fmt_mm(drawer.depth_mm),
            fmt_mm(drawer.grid_pitch_mm)
        ),
        format!(
            "Computed grid: {} x {} units",
            units.width_units, units.depth_units
        ),
        format!("Baseplate strategy: {}", strategy.as_str()),
        format!(
            "Baseplate limit: {0}x{0} units",
            summary.baseplates.max_tile_units
        ),
    ];

    // Column widths for the [label | qty | graphic] table rows.
    let mut max_label_chars = "Drawer".len();
    for c in &summary.container_counts {
        max_label_chars = max_label_chars.max(c.label.chars().count());
    }
    let label_w = (max_label_chars as f64 * TEXT_PX * 0.62).max(120.0) + 16.0;
    let count_w = 56.0;
    let grid_w = units.width_units as f64 * ppu;
    let grid_h = units.depth_units as f64 * ppu;
    let mut graphics_w = grid_w.max(160.0);
    for c in &summary.container_counts {
        graphics_w = graphics_w.max(c.width_units as f64 * ppu);
    }
    let total_w = PAD_PX * 2.0 + label_w + count_w + graphics_w;

    // Pre-measure total height: title, meta, diagram, section rows, totals.
    let mut total_h = PAD_PX + TITLE_PX + GAP_PX + meta_lines.len() as f64 * LINE_H_PX + GAP_PX;
    let has_grid = units.width_units > 0 && units.depth_units > 0;
    if has_grid {
        total_h += grid_h + GAP_PX;
    }
    total_h += LINE_H_PX + GAP_PX; // "Containers to Print" header
    for c in &summary.container_counts {
        total_h += (c.depth_units as f64 * ppu).max(LINE_H_PX) + GAP_PX;
    }
    if summary.container_counts.is_empty() {
        total_h += LINE_H_PX + GAP_PX;
    }
    total_h += LINE_H_PX + GAP_PX; // "Baseplates to Print" header
    for s in &summary.baseplates.size_counts {
        total_h += (s.depth_units as f64 * ppu).max(LINE_H_PX) + GAP_PX;
    }
    if summary.baseplates.size_counts.is_empty() {
        total_h += LINE_H_PX + GAP_PX;
    }
    total_h += LINE_H_PX + PAD_PX; // totals

    let w_px = total_w.ceil() as u32;
    let h_px = total_h.ceil() as u32;

    let x_label = PAD_PX;
    let x_count = PAD_PX + label_w;
    let x_gfx = x_count + count_w;

    let mut s = String::new();
    s.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    s.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w_px}\" height=\"{h_px}\" viewBox=\"0 0 {w_px} {h_px}\" fill=\"none\" stroke-linejoin=\"round\" font-family=\"sans-serif\" font-size=\"{TEXT_PX}\">\n"
    ));
    s.push_str("<rect x=\"0\" y=\"0\" width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

    let text = |s: &mut String, x: f64, y: f64, size: f64, bold: bool, value: &str| {
        let weight = if bold { " font-weight=\"bold\"" } else { "" };
        s.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" fill=\"#333\" font-size=\"{size}\"{weight}>{}</text>\n",
            svg_escape(value)
        ));
    };
    let rect = |s: &mut String, x: f64, y: f64, w: f64, h: f64, stroke: &str, sw: f64| {
        s.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" stroke=\"{stroke}\" stroke-width=\"{sw}\"/>\n"
        ));
    };
    let hline = |s: &mut String, y: f64| {
        s.push_str(&format!(
            "<path d=\"M {:.2} {y:.2} L {:.2} {y:.2}\" stroke=\"#ddd\" stroke-width=\"1\"/>\n",
            PAD_PX,
            total_w - PAD_PX
        ));
    };

    let mut cursor = PAD_PX + TITLE_PX;
    text(&mut s, x_label, cursor, TITLE_PX, true, "Planfinity Print List");
    cursor += GAP_PX;
    for line in &meta_lines {
        cursor += LINE_H_PX;
        text(&mut s, x_label, cursor, TEXT_PX, false, line);
    }
    cursor += GAP_PX;
    hline(&mut s, cursor);

    // Drawer diagram with the baseplate tiling drawn to scale.
    if has_grid {
        let top = cursor;
        text(
            &mut s,
            x_label,
            top + grid_h / 2.0 + TEXT_PX / 2.0,
            TEXT_PX,
            false,
            "Drawer",
        );
        for tile in &summary.baseplates.tiles {
            rect(
                &mut s,
                x_gfx + tile.x as f64 * ppu,
                top + tile.y as f64 * ppu,
                tile.width_units as f64 * ppu,
                tile.depth_units as f64 * ppu,
                "#999",
                1.0,
            );
        }
        rect(&mut s, x_gfx, top, grid_w, grid_h, "#222", 2.0);
        cursor += grid_h + GAP_PX;
        hline(&mut s, cursor);
    }

    // Container rows.
    cursor += LINE_H_PX;
    text(&mut s, x_label, cursor, TEXT_PX, true, "Containers to Print");
    cursor += GAP_PX;
    if summary.container_counts.is_empty() {
        cursor += LINE_H_PX;
        text(&mut s, x_label, cursor, TEXT_PX, false, "No containers placed.");
        cursor += GAP_PX;
    }
    for c in &summary.container_counts {
        let row_h = (c.depth_units as f64 * ppu).max(LINE_H_PX);
        let mid = cursor + row_h / 2.0 + TEXT_PX / 2.0;
        text(
            &mut s,
            x_label,
            mid,
            TEXT_PX,
            false,
            &format!("{} ({}x{})", c.label, c.width_units, c.depth_units),
        );
        text(&mut s, x_count, mid, TEXT_PX, false, &c.count.to_string());
        rect(
            &mut s,
            x_gfx,
            cursor,
            c.width_units as f64 * ppu,
            c.depth_units as f64 * ppu,
            "#333",
            1.6,
        );
        cursor += row_h + GAP_PX;
    }
    hline(&mut s, cursor);

    // Baseplate rows.
    cursor += LINE_H_PX;
    text(&mut s, x_label, cursor, TEXT_PX, true, "Baseplates to Print");
    cursor += GAP_PX;
    if summary.baseplates.size_counts.is_empty() {
        cursor += LINE_H_PX;
        text(&mut s, x_label, cursor, TEXT_PX, false, "No baseplates required.");
        cursor += GAP_PX;
    }
    for size in &summary.baseplates.size_counts {
        let row_h = (size.depth_units as f64 * ppu).max(LINE_H_PX);
        let mid = cursor + row_h / 2.0 + TEXT_PX / 2.0;
        text(
            &mut s,
            x_label,
            mid,
            TEXT_PX,
            false,
            &format!("{}x{}", size.width_units, size.depth_units),
        );
        text(&mut s, x_count, mid, TEXT_PX, false, &size.count.to_string());
        rect(
            &mut s,
            x_gfx,
            cursor,
            size.width_units as f64 * ppu,
            size.depth_units as f64 * ppu,
            "#333",
            1.6,
        );
        cursor += row_h + GAP_PX;
    }
    hline(&mut s, cursor);

    let container_total: u32 = summary.container_counts.iter().map(|c| c.count).sum();
    cursor += LINE_H_PX;
    text(
        &mut s,
        x_label,
        cursor,
        TEXT_PX,
        true,
        &format!(
            "Totals: {} containers, {} baseplates",
            container_total, summary.baseplates.total_tiles
        ),
    );

    s.push_str("</svg>\n");
    (s, w_px, h_px)
}

// Format millimeters:
// - Near-integers (1e-6) as integers
// - Else up to 3 decimals, trim trailing zeros
pub fn fmt_mm(v: f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{:.0}", v)
    } else {
        format!("{:.3}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

pub fn svg_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// Shared PNG encoder: RGBA -> PNG bytes (deterministic for same input).
// Used by the browser canvas export.
pub fn encode_rgba_to_png_bytes(
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<Vec<u8>, png::EncodingError> {
    let mut buf = Vec::new();
    {
        let mut enc = Encoder::new(&mut buf, width, height);
        enc.set_color(ColorType::Rgba);
        enc.set_depth(BitDepth::Eight);
        {
            let mut writer = enc.write_header()?;
            writer.write_image_data(rgba)?;
        }
        // enc drops here, releasing the &mut buf borrow
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use planner_core::{
        BaseplateStrategy, DrawerInput, Placement, build_print_summary, default_container_types,
        derive_drawer_units,
    };

    use super::*;

    fn sample_sheet() -> (String, u32, u32) {
        let drawer = DrawerInput {
            width_mm: 504.0,
            depth_mm: 378.0,
            grid_pitch_mm: 42.0,
        };
        let units = derive_drawer_units(&drawer);
        let types = default_container_types();
        let placements = vec![
            Placement {
                id: Some("a".to_string()),
                container_type_id: "1x1".to_string(),
                x: 0,
                y: 0,
                is_rotated: None,
            },
            Placement {
                id: Some("b".to_string()),
                container_type_id: "2x3".to_string(),
                x: 2,
                y: 0,
                is_rotated: Some(true),
            },
        ];
        let summary =
            build_print_summary(units, &placements, &types, 5, BaseplateStrategy::MaxFirst)
                .unwrap();
        build_print_sheet_svg(&drawer, units, BaseplateStrategy::MaxFirst, &summary, 24.0)
    }

    #[test]
    fn sheet_lists_counts_and_totals() {
        let (svg, w_px, h_px) = sample_sheet();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("Planfinity Print List"));
        assert!(svg.contains("Drawer input: 504 mm x 378 mm @ 42 mm pitch"));
        assert!(svg.contains("Computed grid: 12 x 9 units"));
        assert!(svg.contains("Baseplate strategy: max-first"));
        assert!(svg.contains("1x1 (1x1)"));
        assert!(svg.contains("2x3 (2x3)"));
        assert!(svg.contains("Totals: 2 containers, 6 baseplates"));
        assert!(w_px > 0 && h_px > 0);
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn sheet_is_deterministic() {
        assert_eq!(sample_sheet(), sample_sheet());
    }

    #[test]
    fn empty_grid_sheet_reports_nothing_to_print() {
        let drawer = DrawerInput {
            width_mm: 10.0,
            depth_mm: 10.0,
            grid_pitch_mm: 42.0,
        };
        let units = derive_drawer_units(&drawer);
        let summary = build_print_summary(
            units,
            &[],
            &default_container_types(),
            5,
            BaseplateStrategy::Balanced,
        )
        .unwrap();
        let (svg, _, _) =
            build_print_sheet_svg(&drawer, units, BaseplateStrategy::Balanced, &summary, 24.0);
        assert!(svg.contains("No containers placed."));
        assert!(svg.contains("No baseplates required."));
    }

    #[test]
    fn labels_are_escaped() {
        assert_eq!(svg_escape("3 < 5 & co"), "3 &lt; 5 &amp; co");
    }

    #[test]
    fn fmt_mm_trims_trailing_zeros() {
        assert_eq!(fmt_mm(42.0), "42");
        assert_eq!(fmt_mm(42.5), "42.5");
        assert_eq!(fmt_mm(41.999999999), "42");
        assert_eq!(fmt_mm(12.125), "12.125");
    }

    #[test]
    fn png_encoder_emits_valid_signature() {
        let rgba = vec![255u8; 2 * 2 * 4];
        let bytes = encode_rgba_to_png_bytes(2, 2, &rgba).expect("encode");
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }
}
