use std::env;
use std::fs;

use planner_core::{
    BaseplateStrategy, DEFAULT_MAX_TILE_UNITS, PlannerLayout, build_print_summary,
    derive_drawer_units,
};
use printsheet_core::build_print_sheet_svg;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: printsheet <layout.json> <output.svg> [px_per_unit] [max-first|balanced]");
        std::process::exit(2);
    }
    let input = &args[1];
    let output = &args[2];
    let px_per_unit: f64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(24.0);
    let strategy = args
        .get(4)
        .and_then(|s| BaseplateStrategy::from_name(s))
        .unwrap_or_default();

    let txt = fs::read_to_string(input)?;
    let layout: PlannerLayout = serde_json::from_str(&txt)?;
    let units = derive_drawer_units(&layout.drawer);
    if units.width_units == 0 || units.depth_units == 0 {
        eprintln!("warning: drawer dimensions do not produce a usable grid");
    }

    let summary = build_print_summary(
        units,
        &layout.placements,
        &layout.container_types,
        DEFAULT_MAX_TILE_UNITS,
        strategy,
    )?;
    let (svg, _w_px, _h_px) =
        build_print_sheet_svg(&layout.drawer, units, strategy, &summary, px_per_unit);
    fs::write(output, svg)?;
    Ok(())
}
