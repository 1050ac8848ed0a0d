//! Detail table projection with the format × circle coverage matrix.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::geometry::ActiveShapes;
use crate::selection::{Emphasis, SelectionState};

pub const EMPTY_MEDIUM: &str = "\u{2014}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageHeader {
    pub circle_id: String,
    pub name: String,
    pub diameter: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageCell {
    pub circle_id: String,
    pub covered: bool,
}

impl CoverageCell {
    pub fn glyph(&self) -> &'static str {
        if self.covered {
            "\u{2713}"
        } else {
            "\u{2717}"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub id: String,
    pub name: String,
    pub color: String,
    pub width: String,
    pub height: String,
    pub diagonal: String,
    pub aspect: String,
    pub medium: String,
    pub category: String,
    pub emphasis: Emphasis,
    /// Empty when no circle is active.
    pub coverage: Vec<CoverageCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailTable {
    /// `None` hides the coverage column entirely.
    pub coverage_headers: Option<Vec<CoverageHeader>>,
    pub rows: Vec<TableRow>,
}

impl DetailTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_coverage(&self) -> bool {
        self.coverage_headers.is_some()
    }

    pub fn row(&self, id: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.id == id)
    }
}

pub fn render_table(catalog: &Catalog, state: &SelectionState) -> DetailTable {
    let active = ActiveShapes::collect(catalog, state);
    let circles = active.circles_smallest_first();
    let highlight = state.highlight();

    let coverage_headers = if circles.is_empty() {
        None
    } else {
        Some(
            circles
                .iter()
                .map(|c| CoverageHeader {
                    circle_id: c.id.clone(),
                    name: c.name.clone(),
                    diameter: c.diameter,
                    color: c.color.clone(),
                })
                .collect(),
        )
    };

    let rows = active
        .formats_by_diagonal()
        .into_iter()
        .map(|f| TableRow {
            id: f.id.clone(),
            name: f.name.clone(),
            color: f.color.clone(),
            width: format!("{:.2}", f.width),
            height: format!("{:.2}", f.height),
            diagonal: format!("{:.2}", f.diagonal),
            aspect: f.aspect_label(),
            medium: if f.medium.is_empty() {
                EMPTY_MEDIUM.to_string()
            } else {
                f.medium.clone()
            },
            category: f.category_label.clone(),
            emphasis: highlight.emphasis_of_format(&f.id),
            coverage: circles
                .iter()
                .map(|c| CoverageCell {
                    circle_id: c.id.clone(),
                    covered: f.covered_by(c),
                })
                .collect(),
        })
        .collect();

    DetailTable {
        coverage_headers,
        rows,
    }
}
