//! Floating tooltip content and placement.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::geometry::ActiveShapes;
use crate::models::{CircleRecord, EntityRef, FormatRecord};
use crate::selection::SelectionState;
use crate::table::EMPTY_MEDIUM;

pub const POINTER_OFFSET: f64 = 14.0;
pub const FLIP_GAP: f64 = 10.0;
pub const VIEWPORT_MARGIN: f64 = 8.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageLine {
    pub format_id: String,
    pub format_name: String,
    pub diagonal: f64,
    pub covered: bool,
}

impl CoverageLine {
    pub fn verdict(&self) -> &'static str {
        if self.covered {
            "covered"
        } else {
            "not covered"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub entity: EntityRef,
    pub title: String,
    pub color: String,
    pub lines: Vec<TooltipLine>,
    /// Circles only: one line per selected format.
    pub coverage: Vec<CoverageLine>,
}

fn line(label: &str, value: String) -> TooltipLine {
    TooltipLine {
        label: label.to_string(),
        value,
    }
}

fn format_content(f: &FormatRecord) -> TooltipContent {
    let medium = if f.medium.is_empty() {
        EMPTY_MEDIUM.to_string()
    } else {
        f.medium.clone()
    };
    TooltipContent {
        entity: EntityRef::Format(f.id.clone()),
        title: f.name.clone(),
        color: f.color.clone(),
        lines: vec![
            line("Width", format!("{} mm", f.width)),
            line("Height", format!("{} mm", f.height)),
            line("Diagonal", format!("{} mm", f.diagonal)),
            line("Aspect", f.aspect_label()),
            line("Medium", medium),
            line("Category", f.category_label.clone()),
        ],
        coverage: Vec::new(),
    }
}

fn circle_content(c: &CircleRecord, active: &ActiveShapes<'_>) -> TooltipContent {
    let mut lines = vec![line("Diameter", format!("{} mm", c.diameter))];
    if !c.notes.is_empty() {
        lines.push(line("Notes", c.notes.clone()));
    }
    TooltipContent {
        entity: EntityRef::Circle(c.id.clone()),
        title: c.name.clone(),
        color: c.color.clone(),
        lines,
        coverage: active
            .formats_by_diagonal()
            .into_iter()
            .map(|f| CoverageLine {
                format_id: f.id.clone(),
                format_name: f.name.clone(),
                diagonal: f.diagonal,
                covered: f.covered_by(c),
            })
            .collect(),
    }
}

/// Content for a hovered entity, or `None` if it is not currently drawn.
pub fn tooltip_content(
    catalog: &Catalog,
    state: &SelectionState,
    entity: &EntityRef,
) -> Option<TooltipContent> {
    if !state.is_selected(entity) {
        return None;
    }
    match entity {
        EntityRef::Format(id) => catalog.format(id).map(format_content),
        EntityRef::Circle(id) => {
            let circle = catalog.circle(id)?;
            let active = ActiveShapes::collect(catalog, state);
            Some(circle_content(circle, &active))
        }
    }
}

/// Top-left corner for a tooltip of `size` next to `pointer`, flipped to the
/// other side on any axis where it would overflow `viewport`.
pub fn place(pointer: Point, size: Size, viewport: Size) -> Point {
    let mut x = pointer.x + POINTER_OFFSET;
    let mut y = pointer.y + POINTER_OFFSET;
    if x + size.width > viewport.width - VIEWPORT_MARGIN {
        x = pointer.x - size.width - FLIP_GAP;
    }
    if y + size.height > viewport.height - VIEWPORT_MARGIN {
        y = pointer.y - size.height - FLIP_GAP;
    }
    Point { x, y }
}
