use serde::{Deserialize, Serialize};

/// Physical drawer dimensions as entered in the form, in millimeters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerInput {
    pub width_mm: f64,
    pub depth_mm: f64,
    pub grid_pitch_mm: f64,
}

/// Drawer size in whole grid cells. Zero is valid and signals "no grid".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerUnits {
    pub width_units: u32,
    pub depth_units: u32,
}

/// Catalog entry describing one printable container size. The catalog is
/// supplied externally and treated as read-only.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerType {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub width_units: u32,
    pub depth_units: u32,
}

/// One placed container instance on the grid, owned by the caller. The core
/// only validates candidates and aggregates lists passed in per call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub container_type_id: String,
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_rotated: Option<bool>,
}

impl Placement {
    pub fn rotated(&self) -> bool {
        self.is_rotated.unwrap_or(false)
    }
}

/// Everything needed to restore a session: drawer input, catalog, placements.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerLayout {
    pub drawer: DrawerInput,
    #[serde(default)]
    pub container_types: Vec<ContainerType>,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

/// Per-type count entry of the pick list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerCountSummary {
    pub container_type_id: String,
    pub label: String,
    pub width_units: u32,
    pub depth_units: u32,
    pub count: u32,
}

/// One physical baseplate covering a sub-rectangle of the drawer grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseplateTile {
    pub x: u32,
    pub y: u32,
    pub width_units: u32,
    pub depth_units: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseplateSizeCount {
    pub width_units: u32,
    pub depth_units: u32,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseplateSummary {
    pub max_tile_units: u32,
    pub tiles: Vec<BaseplateTile>,
    pub size_counts: Vec<BaseplateSizeCount>,
    pub total_tiles: u32,
    pub covered_area_units: u64,
}

/// How an axis is split into baseplate pieces: as many full-size pieces as
/// possible, or pieces of near-equal length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaseplateStrategy {
    #[default]
    MaxFirst,
    Balanced,
}

impl BaseplateStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            BaseplateStrategy::MaxFirst => "max-first",
            BaseplateStrategy::Balanced => "balanced",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "max-first" => Some(BaseplateStrategy::MaxFirst),
            "balanced" => Some(BaseplateStrategy::Balanced),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSummary {
    pub container_counts: Vec<ContainerCountSummary>,
    pub baseplates: BaseplateSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_round_trips_as_camel_case_json() {
        let layout = PlannerLayout {
            drawer: DrawerInput {
                width_mm: 600.0,
                depth_mm: 400.0,
                grid_pitch_mm: 42.0,
            },
            container_types: vec![ContainerType {
                id: "2x2".to_string(),
                label: "2x2".to_string(),
                color: Some("#cfe8ff".to_string()),
                width_units: 2,
                depth_units: 2,
            }],
            placements: vec![Placement {
                id: Some("p1".to_string()),
                container_type_id: "2x2".to_string(),
                x: 0,
                y: 0,
                is_rotated: None,
            }],
        };

        let json = serde_json::to_string(&layout).expect("serialize");
        assert!(json.contains("\"widthMm\":600.0"));
        assert!(json.contains("\"containerTypeId\":\"2x2\""));
        assert!(!json.contains("isRotated"));

        let back: PlannerLayout = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, layout);
    }

    #[test]
    fn missing_optional_fields_deserialize() {
        let json = r#"{
            "drawer": {"widthMm": 100, "depthMm": 100, "gridPitchMm": 10}
        }"#;
        let layout: PlannerLayout = serde_json::from_str(json).expect("deserialize");
        assert!(layout.container_types.is_empty());
        assert!(layout.placements.is_empty());
    }

    #[test]
    fn strategy_names_round_trip() {
        assert_eq!(
            serde_json::to_string(&BaseplateStrategy::MaxFirst).unwrap(),
            "\"max-first\""
        );
        assert_eq!(
            BaseplateStrategy::from_name("balanced"),
            Some(BaseplateStrategy::Balanced)
        );
        assert_eq!(BaseplateStrategy::from_name("spiral"), None);
        assert_eq!(BaseplateStrategy::Balanced.as_str(), "balanced");
    }
}
