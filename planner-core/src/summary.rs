//! Print/pick aggregation: group placements into per-type counts and
//! combine them with a baseplate decomposition into one summary.

use std::collections::HashMap;

use crate::baseplates::slice_baseplates;
use crate::error::PlannerError;
use crate::planner::container_types_by_id;
use crate::types::{
    BaseplateStrategy, ContainerCountSummary, ContainerType, DrawerUnits, Placement, PrintSummary,
};

/// Group placements by container type for the pick list, sorted by
/// descending count and then ascending label. Rotation is irrelevant to the
/// count.
///
/// Unlike collision checking, a dangling catalog reference here is a
/// data-integrity bug in the print list and fails loudly instead of being
/// skipped.
pub fn aggregate_container_counts(
    placements: &[Placement],
    container_types: &[ContainerType],
) -> Result<Vec<ContainerCountSummary>, PlannerError> {
    let types_by_id = container_types_by_id(container_types);

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for placement in placements {
        let id = placement.container_type_id.as_str();
        if !types_by_id.contains_key(id) {
            return Err(PlannerError::UnknownContainerType(id.to_string()));
        }
        let entry = counts.entry(id).or_insert(0);
        if *entry == 0 {
            first_seen.push(id);
        }
        *entry += 1;
    }

    let mut summary: Vec<ContainerCountSummary> = first_seen
        .into_iter()
        .map(|id| {
            let container_type = types_by_id[id];
            ContainerCountSummary {
                container_type_id: container_type.id.clone(),
                label: container_type.label.clone(),
                width_units: container_type.width_units,
                depth_units: container_type.depth_units,
                count: counts[id],
            }
        })
        .collect();

    summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    Ok(summary)
}

/// Pure composition of the count aggregation and the baseplate slicer.
pub fn build_print_summary(
    drawer: DrawerUnits,
    placements: &[Placement],
    container_types: &[ContainerType],
    max_tile_units: u32,
    strategy: BaseplateStrategy,
) -> Result<PrintSummary, PlannerError> {
    Ok(PrintSummary {
        container_counts: aggregate_container_counts(placements, container_types)?,
        baseplates: slice_baseplates(drawer, max_tile_units, strategy)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<ContainerType> {
        [("ct-1x1", 1, 1), ("ct-2x2", 2, 2), ("ct-2x3", 2, 3)]
            .into_iter()
            .map(|(id, w, d)| ContainerType {
                id: id.to_string(),
                label: id.trim_start_matches("ct-").to_string(),
                color: None,
                width_units: w,
                depth_units: d,
            })
            .collect()
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

    #[test]
    fn aggregates_and_sorts_by_count_then_label() {
        let placements = vec![
            placement("ct-1x1", 0, 0),
            placement("ct-2x2", 1, 0),
            placement("ct-1x1", 2, 0),
            placement("ct-2x3", 3, 0),
            placement("ct-1x1", 4, 0),
            placement("ct-2x2", 0, 2),
        ];

        let result = aggregate_container_counts(&placements, &catalog()).unwrap();
        let counted: Vec<(&str, u32)> = result
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(counted, vec![("1x1", 3), ("2x2", 2), ("2x3", 1)]);
        assert_eq!(result[0].container_type_id, "ct-1x1");
        assert_eq!(result[0].width_units, 1);
        assert_eq!(result[0].depth_units, 1);
    }

    #[test]
    fn rotated_instances_count_with_unrotated_ones() {
        let mut rotated = placement("ct-2x3", 0, 0);
        rotated.is_rotated = Some(true);
        let placements = vec![rotated, placement("ct-2x3", 3, 0)];

        let result = aggregate_container_counts(&placements, &catalog()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].count, 2);
    }

    #[test]
    fn unknown_type_id_fails_with_the_offending_id() {
        let placements = vec![placement("missing", 0, 0)];
        let err = aggregate_container_counts(&placements, &catalog()).unwrap_err();
        assert_eq!(err, PlannerError::UnknownContainerType("missing".to_string()));
    }

    #[test]
    fn empty_placements_aggregate_to_empty_summary() {
        let result = aggregate_container_counts(&[], &catalog()).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn print_summary_combines_counts_and_baseplates() {
        let placements = vec![
            placement("ct-1x1", 0, 0),
            placement("ct-1x1", 1, 0),
            placement("ct-2x2", 2, 0),
        ];
        let drawer = DrawerUnits {
            width_units: 6,
            depth_units: 6,
        };

        let result =
            build_print_summary(drawer, &placements, &catalog(), 5, BaseplateStrategy::MaxFirst)
                .unwrap();

        let counted: Vec<(&str, u32)> = result
            .container_counts
            .iter()
            .map(|c| (c.label.as_str(), c.count))
            .collect();
        assert_eq!(counted, vec![("1x1", 2), ("2x2", 1)]);
        assert_eq!(result.baseplates.total_tiles, 4);
        assert_eq!(result.baseplates.covered_area_units, 36);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let placements = vec![placement("ct-2x2", 0, 0), placement("ct-1x1", 2, 0)];
        let a = aggregate_container_counts(&placements, &catalog()).unwrap();
        let b = aggregate_container_counts(&placements, &catalog()).unwrap();
        assert_eq!(a, b);
    }
}
