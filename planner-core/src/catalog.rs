use crate::types::ContainerType;

// Fixed 8-color pastel palette. Colors are stable and cycle by index.
const CONTAINER_COLORS: [&str; 8] = [
    "#cfe8ff", // blue
    "#d9f7be", // green
    "#ffd9b3", // orange
    "#f4d3ff", // violet
    "#ffe7ba", // amber
    "#ffd6e7", // pink
    "#d6f5f5", // cyan
    "#e8e8ff", // lavender
];

pub fn container_color(i: usize) -> String {
    CONTAINER_COLORS[i % CONTAINER_COLORS.len()].to_string()
}

/// The built-in catalog: every width x depth combination with
/// width <= depth, up to 5x5, labelled "1x1" through "5x5".
pub fn default_container_types() -> Vec<ContainerType> {
    let mut types = Vec::new();
    for depth_units in 1..=5u32 {
        for width_units in 1..=depth_units {
            let index_within_depth = (width_units - 1) as usize;
            let label = format!("{width_units}x{depth_units}");
            types.push(ContainerType {
                id: label.clone(),
                label,
                color: Some(container_color(depth_units as usize + index_within_depth)),
                width_units,
                depth_units,
            });
        }
    }
    types
}
