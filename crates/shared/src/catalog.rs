use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::models::{
    CategoryInfo, CategoryMeta, CircleMeta, CircleRecord, FormatRecord, RawCatalog, RawCircle,
    RawFormat, ReferencePreset, FALLBACK_CATEGORY_ORDER, FALLBACK_COLOR, SOLID_DASH,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogTable {
    Formats,
    Circles,
}

/// A raw record that was dropped during load, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub table: CatalogTable,
    pub id: String,
    pub reason: String,
}

/// Enriched, immutable format and circle records indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    formats: Vec<FormatRecord>,
    circles: Vec<CircleRecord>,
    format_index: HashMap<String, usize>,
    circle_index: HashMap<String, usize>,
    categories: Vec<CategoryInfo>,
    presets: Vec<ReferencePreset>,
    skipped: Vec<SkippedRecord>,
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn format_defect(raw: &RawFormat) -> Option<&'static str> {
    if raw.id.trim().is_empty() {
        Some("empty id")
    } else if !positive(raw.width) || !positive(raw.height) {
        Some("width and height must be positive")
    } else if !positive(raw.diagonal) {
        Some("diagonal must be positive")
    } else {
        None
    }
}

fn circle_defect(raw: &RawCircle) -> Option<&'static str> {
    if raw.id.trim().is_empty() {
        Some("empty id")
    } else if !positive(raw.diameter) {
        Some("diameter must be positive")
    } else {
        None
    }
}

/// Merge one raw format with its category styling, normalizing to landscape.
pub fn enrich_format(raw: &RawFormat, categories: &HashMap<String, CategoryMeta>) -> FormatRecord {
    // Diagonal is rotation-invariant, so only the edges swap.
    let (width, height) = if raw.height > raw.width {
        (raw.height, raw.width)
    } else {
        (raw.width, raw.height)
    };

    let meta = categories.get(&raw.category);
    let style = meta.and_then(|m| m.formats.get(&raw.id));
    let (color, dasharray, category_label, category_order) = match (meta, style) {
        (Some(m), Some(s)) => (s.color.clone(), s.dasharray.clone(), m.label.clone(), m.order),
        _ => (
            FALLBACK_COLOR.to_string(),
            SOLID_DASH.to_string(),
            raw.category.clone(),
            FALLBACK_CATEGORY_ORDER,
        ),
    };

    FormatRecord {
        id: raw.id.clone(),
        name: raw.name.clone(),
        width,
        height,
        diagonal: raw.diagonal,
        category: raw.category.clone(),
        medium: raw.medium.clone(),
        color,
        dasharray,
        category_label,
        category_order,
    }
}

pub fn enrich_circle(raw: &RawCircle, meta: &HashMap<String, CircleMeta>) -> CircleRecord {
    CircleRecord {
        id: raw.id.clone(),
        name: raw.name.clone(),
        diameter: raw.diameter,
        notes: raw.notes.clone(),
        color: meta
            .get(&raw.id)
            .map(|m| m.color.clone())
            .unwrap_or_else(|| FALLBACK_COLOR.to_string()),
    }
}

impl Catalog {
    /// Build the catalog from the four raw tables. Never fails: invalid
    /// records are skipped and listed in [`Catalog::skipped`].
    pub fn load(
        raw_formats: &[RawFormat],
        category_meta: &HashMap<String, CategoryMeta>,
        raw_circles: &[RawCircle],
        circle_meta: &HashMap<String, CircleMeta>,
    ) -> Self {
        let mut catalog = Catalog::default();

        for raw in raw_formats {
            let defect = format_defect(raw).or_else(|| {
                catalog
                    .format_index
                    .contains_key(&raw.id)
                    .then_some("duplicate id")
            });
            if let Some(reason) = defect {
                catalog.skip(CatalogTable::Formats, &raw.id, reason);
                continue;
            }
            let record = enrich_format(raw, category_meta);
            catalog
                .format_index
                .insert(record.id.clone(), catalog.formats.len());
            catalog.formats.push(record);
        }

        for raw in raw_circles {
            let defect = circle_defect(raw).or_else(|| {
                catalog
                    .circle_index
                    .contains_key(&raw.id)
                    .then_some("duplicate id")
            });
            if let Some(reason) = defect {
                catalog.skip(CatalogTable::Circles, &raw.id, reason);
                continue;
            }
            let record = enrich_circle(raw, circle_meta);
            catalog
                .circle_index
                .insert(record.id.clone(), catalog.circles.len());
            catalog.circles.push(record);
        }

        catalog.categories = collect_categories(&catalog.formats);

        tracing::debug!(
            formats = catalog.formats.len(),
            circles = catalog.circles.len(),
            skipped = catalog.skipped.len(),
            "Catalog loaded"
        );
        catalog
    }

    pub fn from_raw(raw: &RawCatalog) -> Self {
        let mut catalog = Self::load(&raw.formats, &raw.categories, &raw.circles, &raw.circle_meta);
        catalog.presets = raw.reference_presets.clone();
        catalog
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Ok(Self::from_raw(&raw))
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    fn skip(&mut self, table: CatalogTable, id: &str, reason: &str) {
        tracing::warn!(?table, id, reason, "Skipping catalog record");
        self.skipped.push(SkippedRecord {
            table,
            id: id.to_string(),
            reason: reason.to_string(),
        });
    }

    /// All formats in catalog order.
    pub fn formats(&self) -> &[FormatRecord] {
        &self.formats
    }

    pub fn circles(&self) -> &[CircleRecord] {
        &self.circles
    }

    pub fn format(&self, id: &str) -> Option<&FormatRecord> {
        self.format_index.get(id).map(|&i| &self.formats[i])
    }

    pub fn circle(&self, id: &str) -> Option<&CircleRecord> {
        self.circle_index.get(id).map(|&i| &self.circles[i])
    }

    pub fn has_format(&self, id: &str) -> bool {
        self.format_index.contains_key(id)
    }

    pub fn has_circle(&self, id: &str) -> bool {
        self.circle_index.contains_key(id)
    }

    /// Categories in display order (ascending `order`, ties by first appearance).
    pub fn categories(&self) -> &[CategoryInfo] {
        &self.categories
    }

    pub fn formats_in_category<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = &'a FormatRecord> + 'a {
        self.formats.iter().filter(move |f| f.category == key)
    }

    pub fn presets(&self) -> &[ReferencePreset] {
        &self.presets
    }

    pub fn preset(&self, key: &str) -> Option<&ReferencePreset> {
        self.presets.iter().find(|p| p.key == key)
    }

    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }
}

fn collect_categories(formats: &[FormatRecord]) -> Vec<CategoryInfo> {
    let mut seen = HashSet::new();
    let mut categories: Vec<CategoryInfo> = formats
        .iter()
        .filter(|f| seen.insert(f.category.as_str()))
        .map(|f| CategoryInfo {
            key: f.category.clone(),
            label: f.category_label.clone(),
            order: f.category_order,
        })
        .collect();
    categories.sort_by_key(|c| c.order);
    categories
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Catalog;

    pub const CATALOG_JSON: &str = include_str!("../../../assets/catalog.json");

    pub fn catalog() -> Catalog {
        Catalog::from_json(CATALOG_JSON).unwrap()
    }
}
