//! Shared coordinate frame for one render pass.
//!
//! All shapes are centered on the origin (the common optical axis), so the
//! frame only depends on the largest extents among the active shapes.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::{CircleRecord, FormatRecord};
use crate::selection::SelectionState;

pub const PADDING_RATIO: f64 = 0.18;
pub const STROKE_RATIO: f64 = 0.003;
pub const HIGHLIGHT_STROKE_FACTOR: f64 = 2.5;
pub const FONT_RATIO: f64 = 0.022;
pub const SMALL_FONT_FACTOR: f64 = 0.75;
pub const CROSSHAIR_RATIO: f64 = 0.015;
/// Vertical distance between staggered labels, in font sizes.
pub const LABEL_STAGGER: f64 = 1.4;
/// Gap between the primary label and the dimension sub-label, in small font sizes.
pub const SUBLABEL_GAP: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub min_x: f64,
    pub min_y: f64,
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.min_x, self.min_y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub max_width: f64,
    pub max_height: f64,
    pub padding: f64,
    pub view_box: ViewBox,
    pub stroke_width: f64,
    pub highlight_stroke_width: f64,
    pub font_size: f64,
    pub small_font_size: f64,
}

impl Frame {
    /// `None` when nothing is active; the diagram then shows its empty state.
    pub fn compute(formats: &[&FormatRecord], circles: &[&CircleRecord]) -> Option<Frame> {
        if formats.is_empty() && circles.is_empty() {
            return None;
        }
        let extents = formats
            .iter()
            .map(|f| (f.width, f.height))
            .chain(circles.iter().map(|c| (c.diameter, c.diameter)));
        let (max_width, max_height) =
            extents.fold((0.0_f64, 0.0_f64), |(mw, mh), (w, h)| (mw.max(w), mh.max(h)));
        Some(Self::from_extents(max_width, max_height))
    }

    pub fn from_extents(max_width: f64, max_height: f64) -> Frame {
        let extent = max_width.max(max_height);
        let padding = extent * PADDING_RATIO;
        let vb_w = max_width + padding * 2.0;
        let vb_h = max_height + padding * 2.0;
        let stroke_width = extent * STROKE_RATIO;
        let font_size = extent * FONT_RATIO;
        Frame {
            max_width,
            max_height,
            padding,
            view_box: ViewBox {
                min_x: -vb_w / 2.0,
                min_y: -vb_h / 2.0,
                width: vb_w,
                height: vb_h,
            },
            stroke_width,
            highlight_stroke_width: stroke_width * HIGHLIGHT_STROKE_FACTOR,
            font_size,
            small_font_size: font_size * SMALL_FONT_FACTOR,
        }
    }

    pub fn max_extent(&self) -> f64 {
        self.max_width.max(self.max_height)
    }

    pub fn crosshair_arm(&self) -> f64 {
        self.max_extent() * CROSSHAIR_RATIO
    }

    pub fn crosshair_stroke(&self) -> f64 {
        self.stroke_width * 0.5
    }
}

/// Where a format's name and dimension labels go.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub x: f64,
    pub y: f64,
    pub sub_y: f64,
}

/// Stagger labels down from the top edge by draw index. A label that would
/// fall below the bottom edge snaps back just inside the top edge; any
/// overlap that causes is accepted.
pub fn label_placement(frame: &Frame, format: &FormatRecord, index: usize) -> LabelPlacement {
    let top = -format.height / 2.0;
    let mut y = top + frame.font_size + LABEL_STAGGER * frame.font_size * index as f64;
    if y > format.height / 2.0 {
        y = top + frame.font_size;
    }
    LabelPlacement {
        x: format.width / 2.0 + frame.stroke_width * 2.0,
        y,
        sub_y: y + frame.small_font_size * SUBLABEL_GAP,
    }
}

/// Formats and circles that are currently selected, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct ActiveShapes<'a> {
    pub formats: Vec<&'a FormatRecord>,
    pub circles: Vec<&'a CircleRecord>,
}

impl<'a> ActiveShapes<'a> {
    pub fn collect(catalog: &'a Catalog, state: &SelectionState) -> Self {
        ActiveShapes {
            formats: catalog
                .formats()
                .iter()
                .filter(|f| state.is_format_selected(&f.id))
                .collect(),
            circles: catalog
                .circles()
                .iter()
                .filter(|c| state.is_circle_selected(&c.id))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty() && self.circles.is_empty()
    }

    pub fn frame(&self) -> Option<Frame> {
        Frame::compute(&self.formats, &self.circles)
    }

    /// Largest area first, so smaller formats are drawn on top.
    pub fn formats_by_area(&self) -> Vec<&'a FormatRecord> {
        let mut v = self.formats.clone();
        v.sort_by(|a, b| desc(a.area(), b.area()));
        v
    }

    pub fn formats_by_diagonal(&self) -> Vec<&'a FormatRecord> {
        let mut v = self.formats.clone();
        v.sort_by(|a, b| desc(a.diagonal, b.diagonal));
        v
    }

    pub fn circles_largest_first(&self) -> Vec<&'a CircleRecord> {
        let mut v = self.circles.clone();
        v.sort_by(|a, b| desc(a.diameter, b.diameter));
        v
    }

    pub fn circles_smallest_first(&self) -> Vec<&'a CircleRecord> {
        let mut v = self.circles.clone();
        v.sort_by(|a, b| a.diameter.partial_cmp(&b.diameter).unwrap_or(Ordering::Equal));
        v
    }

    pub fn largest_circle(&self) -> Option<&'a CircleRecord> {
        self.circles_largest_first().first().copied()
    }
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
