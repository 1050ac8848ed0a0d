use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Fallback stroke color for records without styling metadata.
pub const FALLBACK_COLOR: &str = "#999";
/// Sentinel dash pattern meaning "solid stroke".
pub const SOLID_DASH: &str = "none";
/// Display order given to categories that have no metadata entry.
pub const FALLBACK_CATEGORY_ORDER: i32 = 99;

/// A format as it appears in the catalog document, before styling is merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFormat {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub diagonal: f64,
    pub category: String,
    #[serde(default)]
    pub medium: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatStyle {
    pub color: String,
    pub dasharray: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMeta {
    pub label: String,
    pub order: i32,
    /// Per-format styling keyed by format id.
    #[serde(default)]
    pub formats: HashMap<String, FormatStyle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCircle {
    pub id: String,
    pub name: String,
    pub diameter: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleMeta {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePreset {
    pub key: String,
    pub label: String,
    pub url: String,
}

/// The whole catalog document as shipped in `catalog.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCatalog {
    #[serde(default)]
    pub formats: Vec<RawFormat>,
    #[serde(default)]
    pub categories: HashMap<String, CategoryMeta>,
    #[serde(default)]
    pub circles: Vec<RawCircle>,
    #[serde(default)]
    pub circle_meta: HashMap<String, CircleMeta>,
    #[serde(default)]
    pub reference_presets: Vec<ReferencePreset>,
}

/// A format after landscape normalization and styling merge. Never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRecord {
    pub id: String,
    pub name: String,
    /// Long edge in mm.
    pub width: f64,
    /// Short edge in mm.
    pub height: f64,
    /// Taken verbatim from the catalog, never re-derived.
    pub diagonal: f64,
    pub category: String,
    pub medium: String,
    pub color: String,
    pub dasharray: String,
    pub category_label: String,
    pub category_order: i32,
}

impl FormatRecord {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Aspect ratio rendered as "X.XX:1".
    pub fn aspect_label(&self) -> String {
        format!("{:.2}:1", self.width / self.height)
    }

    /// Whether a lens with this image circle illuminates the full format.
    pub fn covered_by(&self, circle: &CircleRecord) -> bool {
        self.diagonal <= circle.diameter
    }

    /// Dash pattern for SVG output; `None` when the stroke is solid.
    pub fn dash_pattern(&self) -> Option<&str> {
        if self.dasharray == SOLID_DASH || self.dasharray.is_empty() {
            None
        } else {
            Some(&self.dasharray)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleRecord {
    pub id: String,
    pub name: String,
    pub diameter: f64,
    pub notes: String,
    pub color: String,
}

impl CircleRecord {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

/// A category as shown in the control panel, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInfo {
    pub key: String,
    pub label: String,
    pub order: i32,
}

/// Identifies one drawable entity of either kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum EntityRef {
    Format(String),
    Circle(String),
}

impl EntityRef {
    /// Value of the `data-entity` attribute that hosts use for hit-testing.
    pub fn to_attr(&self) -> String {
        match self {
            EntityRef::Format(id) => format!("format:{id}"),
            EntityRef::Circle(id) => format!("circle:{id}"),
        }
    }

    pub fn parse_attr(attr: &str) -> Option<Self> {
        let (kind, id) = attr.split_once(':')?;
        if id.is_empty() {
            return None;
        }
        match kind {
            "format" => Some(EntityRef::Format(id.to_string())),
            "circle" => Some(EntityRef::Circle(id.to_string())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(width: f64, height: f64, diagonal: f64) -> FormatRecord {
        FormatRecord {
            id: "f".into(),
            name: "F".into(),
            width,
            height,
            diagonal,
            category: "c".into(),
            medium: String::new(),
            color: FALLBACK_COLOR.into(),
            dasharray: SOLID_DASH.into(),
            category_label: "c".into(),
            category_order: FALLBACK_CATEGORY_ORDER,
        }
    }

    fn circle(diameter: f64) -> CircleRecord {
        CircleRecord {
            id: "c".into(),
            name: "C".into(),
            diameter,
            notes: String::new(),
            color: FALLBACK_COLOR.into(),
        }
    }

    #[test]
    fn test_aspect_label_two_decimals() {
        assert_eq!(format(36.0, 24.0, 43.27).aspect_label(), "1.50:1");
        assert_eq!(format(70.0, 56.0, 89.65).aspect_label(), "1.25:1");
        assert_eq!(format(56.0, 56.0, 79.2).aspect_label(), "1.00:1");
    }

    #[test]
    fn test_coverage_is_inclusive() {
        let ff = format(36.0, 24.0, 43.27);
        assert!(!ff.covered_by(&circle(33.0)));
        assert!(ff.covered_by(&circle(55.0)));
        assert!(ff.covered_by(&circle(43.27)));
    }

    #[test]
    fn test_dash_pattern_solid_sentinel() {
        let mut f = format(1.0, 1.0, 1.4);
        assert_eq!(f.dash_pattern(), None);
        f.dasharray = "6 3".into();
        assert_eq!(f.dash_pattern(), Some("6 3"));
    }

    #[test]
    fn test_entity_attr_roundtrip() {
        let e = EntityRef::Format("ff-35mm".into());
        assert_eq!(e.to_attr(), "format:ff-35mm");
        assert_eq!(EntityRef::parse_attr("format:ff-35mm"), Some(e));
        assert_eq!(
            EntityRef::parse_attr("circle:pl-s35"),
            Some(EntityRef::Circle("pl-s35".into()))
        );
    }

    #[test]
    fn test_entity_attr_rejects_garbage() {
        assert_eq!(EntityRef::parse_attr("ff-35mm"), None);
        assert_eq!(EntityRef::parse_attr("format:"), None);
        assert_eq!(EntityRef::parse_attr("lens:gfx"), None);
    }

    #[test]
    fn test_raw_catalog_camel_case() {
        let json = r##"{"formats":[],"circleMeta":{"gfx":{"color":"#3AAA55"}},"referencePresets":[{"key":"k","label":"L","url":"/x.jpg"}]}"##;
        let raw: RawCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(raw.circle_meta["gfx"].color, "#3AAA55");
        assert_eq!(raw.reference_presets[0].key, "k");
        assert!(raw.categories.is_empty());
    }
}
