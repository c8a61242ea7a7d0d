//! Fit finder: suggest catalog containers whose interior can hold an
//! external object of known millimeter dimensions, with clearance.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::types::ContainerType;

/// Clearance added on every side of the object when none is specified.
pub const DEFAULT_CLEARANCE_MM: f64 = 2.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerFitSuggestion {
    pub container_type_id: String,
    pub label: String,
    pub width_units: u32,
    pub depth_units: u32,
    pub width_mm: f64,
    pub depth_mm: f64,
    pub slack_width_mm: f64,
    pub slack_depth_mm: f64,
    pub uses_rotated_fit: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerFitSummary {
    pub required_width_units: u32,
    pub required_depth_units: u32,
    pub required_width_mm: f64,
    pub required_depth_mm: f64,
    pub suggestions: Vec<ContainerFitSuggestion>,
}

struct FitOrientation {
    uses_rotated_fit: bool,
    slack_width_mm: f64,
    slack_depth_mm: f64,
}

fn require_finite_positive(value: f64, name: &str) -> Result<(), PlannerError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PlannerError::InvalidArgument(format!(
            "{name} must be greater than 0"
        )));
    }
    Ok(())
}

fn require_finite_non_negative(value: f64, name: &str) -> Result<(), PlannerError> {
    if !value.is_finite() || value < 0.0 {
        return Err(PlannerError::InvalidArgument(format!(
            "{name} must be greater than or equal to 0"
        )));
    }
    Ok(())
}

fn pick_fit_orientation(
    required_width_mm: f64,
    required_depth_mm: f64,
    container_width_mm: f64,
    container_depth_mm: f64,
) -> Option<FitOrientation> {
    let normal_fit =
        container_width_mm >= required_width_mm && container_depth_mm >= required_depth_mm;
    let rotated_fit =
        container_width_mm >= required_depth_mm && container_depth_mm >= required_width_mm;

    if !normal_fit && !rotated_fit {
        return None;
    }

    let normal = FitOrientation {
        uses_rotated_fit: false,
        slack_width_mm: container_width_mm - required_width_mm,
        slack_depth_mm: container_depth_mm - required_depth_mm,
    };
    let rotated = FitOrientation {
        uses_rotated_fit: true,
        slack_width_mm: container_width_mm - required_depth_mm,
        slack_depth_mm: container_depth_mm - required_width_mm,
    };

    match (normal_fit, rotated_fit) {
        (true, false) => Some(normal),
        (false, true) => Some(rotated),
        _ => {
            // Both orientations fit: prefer the one wasting less space,
            // keeping the unrotated orientation on a tie.
            let normal_max_slack = normal.slack_width_mm.max(normal.slack_depth_mm);
            let rotated_max_slack = rotated.slack_width_mm.max(rotated.slack_depth_mm);
            if rotated_max_slack < normal_max_slack {
                Some(rotated)
            } else {
                Some(normal)
            }
        }
    }
}

/// Suggest every catalog container that can hold an object of
/// `object_width_mm` x `object_depth_mm` once `clearance_mm` is added on
/// each side, sorted smallest-first (unit area, then maximum slack, then
/// label).
pub fn suggest_container_fits(
    container_types: &[ContainerType],
    grid_pitch_mm: f64,
    object_width_mm: f64,
    object_depth_mm: f64,
    clearance_mm: f64,
) -> Result<ContainerFitSummary, PlannerError> {
    require_finite_positive(grid_pitch_mm, "gridPitchMm")?;
    require_finite_positive(object_width_mm, "objectWidthMm")?;
    require_finite_positive(object_depth_mm, "objectDepthMm")?;
    require_finite_non_negative(clearance_mm, "clearanceMm")?;

    let required_width_mm = object_width_mm + clearance_mm * 2.0;
    let required_depth_mm = object_depth_mm + clearance_mm * 2.0;
    let required_width_units = (required_width_mm / grid_pitch_mm).ceil() as u32;
    let required_depth_units = (required_depth_mm / grid_pitch_mm).ceil() as u32;

    let mut suggestions: Vec<ContainerFitSuggestion> = container_types
        .iter()
        .filter_map(|container_type| {
            let container_width_mm = container_type.width_units as f64 * grid_pitch_mm;
            let container_depth_mm = container_type.depth_units as f64 * grid_pitch_mm;
            let orientation = pick_fit_orientation(
                required_width_mm,
                required_depth_mm,
                container_width_mm,
                container_depth_mm,
            )?;

            Some(ContainerFitSuggestion {
                container_type_id: container_type.id.clone(),
                label: container_type.label.clone(),
                width_units: container_type.width_units,
                depth_units: container_type.depth_units,
                width_mm: container_width_mm,
                depth_mm: container_depth_mm,
                slack_width_mm: orientation.slack_width_mm,
                slack_depth_mm: orientation.slack_depth_mm,
                uses_rotated_fit: orientation.uses_rotated_fit,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        let area_a = a.width_units * a.depth_units;
        let area_b = b.width_units * b.depth_units;
        area_a
            .cmp(&area_b)
            .then_with(|| {
                let slack_a = a.slack_width_mm.max(a.slack_depth_mm);
                let slack_b = b.slack_width_mm.max(b.slack_depth_mm);
                slack_a.total_cmp(&slack_b)
            })
            .then_with(|| a.label.cmp(&b.label))
    });

    Ok(ContainerFitSummary {
        required_width_units,
        required_depth_units,
        required_width_mm,
        required_depth_mm,
        suggestions,
    })
}
