//! Scene graph for the comparison diagram.
//!
//! Everything is positioned relative to the shared optical center at the
//! origin. Back-to-front order: crosshair, reference photo, circles
//! (largest first), formats (largest area first).

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::geometry::{label_placement, ActiveShapes, Frame, LabelPlacement};
use crate::models::EntityRef;
use crate::selection::{Emphasis, ReferenceSource, SelectionState};

pub const DIMMED_OPACITY: f64 = 0.25;
pub const CIRCLE_FILL_OPACITY: f64 = 0.04;
pub const SUBLABEL_OPACITY: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crosshair {
    pub arm: f64,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ClipShape {
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
}

impl ClipShape {
    /// Width and height of the box the clip is inscribed in.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            ClipShape::Circle { radius } => (radius * 2.0, radius * 2.0),
            ClipShape::Rect { width, height } => (width, height),
        }
    }
}

/// The reference photo, scaled to cover the clip bounds and centered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLayer {
    pub href: String,
    pub opacity: f64,
    pub clip: ClipShape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleShape {
    pub id: String,
    pub name: String,
    pub radius: f64,
    pub color: String,
    pub stroke_width: f64,
    pub dasharray: String,
    pub emphasis: Emphasis,
    pub label_y: f64,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatShape {
    pub id: String,
    pub name: String,
    pub width: f64,
    pub height: f64,
    pub color: String,
    pub dasharray: Option<String>,
    pub stroke_width: f64,
    pub emphasis: Emphasis,
    pub label: LabelPlacement,
    pub font_size: f64,
    pub small_font_size: f64,
    pub dimensions: String,
}

impl FormatShape {
    pub fn font_weight(&self) -> u16 {
        if self.emphasis == Emphasis::Highlighted {
            700
        } else {
            500
        }
    }
}

pub fn emphasis_opacity(emphasis: Emphasis) -> f64 {
    match emphasis {
        Emphasis::Dimmed => DIMMED_OPACITY,
        Emphasis::Normal | Emphasis::Highlighted => 1.0,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub frame: Frame,
    pub crosshair: Crosshair,
    pub reference: Option<ReferenceLayer>,
    pub circles: Vec<CircleShape>,
    pub formats: Vec<FormatShape>,
}

impl Scene {
    /// Every entity drawn, in paint order.
    pub fn entities(&self) -> Vec<EntityRef> {
        self.circles
            .iter()
            .map(|c| EntityRef::Circle(c.id.clone()))
            .chain(self.formats.iter().map(|f| EntityRef::Format(f.id.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagram {
    /// Nothing selected: the host shows its placeholder instead of an SVG.
    Empty,
    Scene(Scene),
}

impl Diagram {
    pub fn is_empty(&self) -> bool {
        matches!(self, Diagram::Empty)
    }

    pub fn scene(&self) -> Option<&Scene> {
        match self {
            Diagram::Empty => None,
            Diagram::Scene(s) => Some(s),
        }
    }
}

/// Resolve the overlay source to something an `<image href>` can load.
pub fn reference_href(catalog: &Catalog, source: &ReferenceSource) -> Option<String> {
    match source {
        ReferenceSource::None => None,
        ReferenceSource::Preset(key) => catalog.preset(key).map(|p| p.url.clone()),
        ReferenceSource::Inline { data_url, .. } => Some(data_url.clone()),
    }
}

pub fn render_diagram(catalog: &Catalog, state: &SelectionState) -> Diagram {
    let active = ActiveShapes::collect(catalog, state);
    let Some(frame) = active.frame() else {
        return Diagram::Empty;
    };
    let highlight = state.highlight();

    let reference = build_reference(catalog, state, &active, &frame);

    let circles = active
        .circles_largest_first()
        .into_iter()
        .map(|c| {
            let emphasis = highlight.emphasis_of_circle(&c.id);
            CircleShape {
                id: c.id.clone(),
                name: c.name.clone(),
                radius: c.radius(),
                color: c.color.clone(),
                stroke_width: stroke_for(&frame, emphasis),
                dasharray: format!("{} {}", frame.stroke_width * 4.0, frame.stroke_width * 2.0),
                emphasis,
                label_y: -c.radius() - frame.small_font_size * 0.4,
                font_size: frame.small_font_size,
            }
        })
        .collect();

    let formats = active
        .formats_by_area()
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            let emphasis = highlight.emphasis_of_format(&f.id);
            FormatShape {
                id: f.id.clone(),
                name: f.name.clone(),
                width: f.width,
                height: f.height,
                color: f.color.clone(),
                dasharray: f.dash_pattern().map(str::to_string),
                stroke_width: stroke_for(&frame, emphasis),
                emphasis,
                label: label_placement(&frame, f, i),
                font_size: frame.font_size,
                small_font_size: frame.small_font_size,
                dimensions: format!("{} \u{00D7} {} mm", f.width, f.height),
            }
        })
        .collect();

    Diagram::Scene(Scene {
        crosshair: Crosshair {
            arm: frame.crosshair_arm(),
            stroke_width: frame.crosshair_stroke(),
        },
        frame,
        reference,
        circles,
        formats,
    })
}

fn stroke_for(frame: &Frame, emphasis: Emphasis) -> f64 {
    if emphasis == Emphasis::Highlighted {
        frame.highlight_stroke_width
    } else {
        frame.stroke_width
    }
}

fn build_reference(
    catalog: &Catalog,
    state: &SelectionState,
    active: &ActiveShapes<'_>,
    frame: &Frame,
) -> Option<ReferenceLayer> {
    let overlay = state.reference();
    if overlay.broken {
        return None;
    }
    let href = reference_href(catalog, &overlay.source)?;
    let clip = match active.largest_circle() {
        Some(c) => ClipShape::Circle { radius: c.radius() },
        None => ClipShape::Rect {
            width: frame.max_width,
            height: frame.max_height,
        },
    };
    Some(ReferenceLayer {
        href,
        opacity: overlay.opacity,
        clip,
    })
}
