use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::EntityRef;

pub const DEFAULT_REFERENCE_OPACITY: f64 = 0.5;

/// The single hover-driven emphasis. One variant per entity kind makes a
/// simultaneous format and circle highlight unrepresentable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    #[default]
    None,
    Format(String),
    Circle(String),
}

/// How a single entity is drawn relative to the current highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Emphasis {
    Normal,
    Highlighted,
    Dimmed,
}

impl Emphasis {
    pub fn css_class(self) -> &'static str {
        match self {
            Emphasis::Normal => "",
            Emphasis::Highlighted => "highlighted",
            Emphasis::Dimmed => "dimmed",
        }
    }
}

impl Highlight {
    pub fn is_active(&self) -> bool {
        !matches!(self, Highlight::None)
    }

    pub fn entity(&self) -> Option<EntityRef> {
        match self {
            Highlight::None => None,
            Highlight::Format(id) => Some(EntityRef::Format(id.clone())),
            Highlight::Circle(id) => Some(EntityRef::Circle(id.clone())),
        }
    }

    pub fn emphasis_of_format(&self, id: &str) -> Emphasis {
        match self {
            Highlight::None => Emphasis::Normal,
            Highlight::Format(h) if h == id => Emphasis::Highlighted,
            _ => Emphasis::Dimmed,
        }
    }

    pub fn emphasis_of_circle(&self, id: &str) -> Emphasis {
        match self {
            Highlight::None => Emphasis::Normal,
            Highlight::Circle(h) if h == id => Emphasis::Highlighted,
            _ => Emphasis::Dimmed,
        }
    }

    pub fn emphasis_of(&self, entity: &EntityRef) -> Emphasis {
        match entity {
            EntityRef::Format(id) => self.emphasis_of_format(id),
            EntityRef::Circle(id) => self.emphasis_of_circle(id),
        }
    }
}

/// Where the reference photo comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceSource {
    #[default]
    None,
    Preset(String),
    /// A user-supplied file, already encoded as a `data:` URL.
    Inline { name: String, data_url: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceOverlay {
    pub source: ReferenceSource,
    pub opacity: f64,
    /// Set when the host failed to decode or fetch `source`.
    pub broken: bool,
    /// Local file reads that have started but not yet delivered a result.
    pub loads_in_flight: u32,
}

impl Default for ReferenceOverlay {
    fn default() -> Self {
        Self {
            source: ReferenceSource::None,
            opacity: DEFAULT_REFERENCE_OPACITY,
            broken: false,
            loads_in_flight: 0,
        }
    }
}

/// Session-wide selection, highlight and reference overlay state.
///
/// Mutations referencing ids unknown to the catalog are no-ops. Every
/// mutation returns whether anything changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    selected_formats: BTreeSet<String>,
    selected_circles: BTreeSet<String>,
    highlight: Highlight,
    reference: ReferenceOverlay,
}

fn set_membership(set: &mut BTreeSet<String>, id: &str, on: bool) -> bool {
    if on {
        set.insert(id.to_string())
    } else {
        set.remove(id)
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_formats(&self) -> &BTreeSet<String> {
        &self.selected_formats
    }

    pub fn selected_circles(&self) -> &BTreeSet<String> {
        &self.selected_circles
    }

    pub fn is_format_selected(&self, id: &str) -> bool {
        self.selected_formats.contains(id)
    }

    pub fn is_circle_selected(&self, id: &str) -> bool {
        self.selected_circles.contains(id)
    }

    pub fn is_selected(&self, entity: &EntityRef) -> bool {
        match entity {
            EntityRef::Format(id) => self.is_format_selected(id),
            EntityRef::Circle(id) => self.is_circle_selected(id),
        }
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn reference(&self) -> &ReferenceOverlay {
        &self.reference
    }

    pub fn toggle_format(&mut self, catalog: &Catalog, id: &str, on: bool) -> bool {
        if !catalog.has_format(id) {
            tracing::debug!(id, "Ignoring toggle of unknown format");
            return false;
        }
        set_membership(&mut self.selected_formats, id, on)
    }

    pub fn toggle_circle(&mut self, catalog: &Catalog, id: &str, on: bool) -> bool {
        if !catalog.has_circle(id) {
            tracing::debug!(id, "Ignoring toggle of unknown circle");
            return false;
        }
        set_membership(&mut self.selected_circles, id, on)
    }

    /// Add or remove every format whose category equals `key`.
    pub fn select_category(&mut self, catalog: &Catalog, key: &str, on: bool) -> bool {
        let mut changed = false;
        for f in catalog.formats_in_category(key) {
            changed |= set_membership(&mut self.selected_formats, &f.id, on);
        }
        changed
    }

    pub fn select_all_formats(&mut self, catalog: &Catalog) -> bool {
        let mut changed = false;
        for f in catalog.formats() {
            changed |= self.selected_formats.insert(f.id.clone());
        }
        changed
    }

    pub fn deselect_all_formats(&mut self) -> bool {
        let changed = !self.selected_formats.is_empty();
        self.selected_formats.clear();
        changed
    }

    pub fn select_all_circles(&mut self, catalog: &Catalog) -> bool {
        let mut changed = false;
        for c in catalog.circles() {
            changed |= self.selected_circles.insert(c.id.clone());
        }
        changed
    }

    pub fn deselect_all_circles(&mut self) -> bool {
        let changed = !self.selected_circles.is_empty();
        self.selected_circles.clear();
        changed
    }

    /// Highlight a format, or clear the highlight with `None`.
    pub fn set_highlight_format(&mut self, catalog: &Catalog, id: Option<&str>) -> bool {
        let next = match id {
            Some(id) if catalog.has_format(id) => Highlight::Format(id.to_string()),
            Some(id) => {
                tracing::debug!(id, "Ignoring highlight of unknown format");
                return false;
            }
            None => Highlight::None,
        };
        self.replace_highlight(next)
    }

    /// Highlight a circle, or clear the highlight with `None`.
    pub fn set_highlight_circle(&mut self, catalog: &Catalog, id: Option<&str>) -> bool {
        let next = match id {
            Some(id) if catalog.has_circle(id) => Highlight::Circle(id.to_string()),
            Some(id) => {
                tracing::debug!(id, "Ignoring highlight of unknown circle");
                return false;
            }
            None => Highlight::None,
        };
        self.replace_highlight(next)
    }

    pub fn set_highlight(&mut self, catalog: &Catalog, entity: Option<&EntityRef>) -> bool {
        match entity {
            Some(EntityRef::Format(id)) => self.set_highlight_format(catalog, Some(id)),
            Some(EntityRef::Circle(id)) => self.set_highlight_circle(catalog, Some(id)),
            None => self.replace_highlight(Highlight::None),
        }
    }

    fn replace_highlight(&mut self, next: Highlight) -> bool {
        if self.highlight == next {
            return false;
        }
        self.highlight = next;
        true
    }

    /// Switch the overlay source. Unknown preset keys are ignored.
    pub fn set_reference_image(&mut self, catalog: &Catalog, source: ReferenceSource) -> bool {
        if let ReferenceSource::Preset(key) = &source {
            if catalog.preset(key).is_none() {
                tracing::debug!(key = key.as_str(), "Ignoring unknown reference preset");
                return false;
            }
        }
        if self.reference.source == source && !self.reference.broken {
            return false;
        }
        self.reference.source = source;
        self.reference.broken = false;
        true
    }

    /// Clamp into [0, 1]; NaN resets to the default opacity.
    pub fn set_reference_opacity(&mut self, opacity: f64) -> bool {
        let opacity = if opacity.is_nan() {
            DEFAULT_REFERENCE_OPACITY
        } else {
            opacity.clamp(0.0, 1.0)
        };
        if self.reference.opacity == opacity {
            return false;
        }
        self.reference.opacity = opacity;
        true
    }

    /// Flag the overlay as unrenderable, but only if `source` is still current.
    pub fn mark_reference_broken(&mut self, source: &ReferenceSource) -> bool {
        if self.reference.source != *source || self.reference.broken {
            return false;
        }
        self.reference.broken = true;
        true
    }

    pub fn begin_reference_load(&mut self) {
        self.reference.loads_in_flight += 1;
    }

    /// Deliver the outcome of a local file read. Only the overlay source is
    /// touched, so selections made while the read was pending survive.
    pub fn finish_reference_load(&mut self, result: Result<(String, String), String>) -> bool {
        self.reference.loads_in_flight = self.reference.loads_in_flight.saturating_sub(1);
        match result {
            Ok((name, data_url)) => {
                self.reference.source = ReferenceSource::Inline { name, data_url };
                self.reference.broken = false;
                true
            }
            Err(reason) => {
                tracing::warn!(reason = reason.as_str(), "Reference image read failed");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    #[test]
    fn test_toggle_format_on_off() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        assert!(s.toggle_format(&cat, "ff-35mm", true));
        assert!(s.is_format_selected("ff-35mm"));
        assert!(s.toggle_format(&cat, "ff-35mm", false));
        assert!(!s.is_format_selected("ff-35mm"));
    }

    #[test]
    fn test_toggle_off_twice_is_idempotent() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        s.toggle_format(&cat, "ff-35mm", true);
        s.toggle_format(&cat, "6x7", true);
        s.toggle_format(&cat, "ff-35mm", false);
        let once = s.clone();
        assert!(!s.toggle_format(&cat, "ff-35mm", false));
        assert_eq!(s, once);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        assert!(!s.toggle_format(&cat, "nope", true));
        assert!(!s.toggle_circle(&cat, "nope", true));
        assert!(!s.set_highlight_format(&cat, Some("nope")));
        assert!(!s.set_highlight_circle(&cat, Some("ff-35mm")));
        assert!(!s.select_category(&cat, "nope", true));
        assert_eq!(s, SelectionState::new());
    }

    #[test]
    fn test_highlight_exclusive_across_hover_sequence() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        s.set_highlight_format(&cat, Some("imax"));
        assert_eq!(s.highlight(), &Highlight::Format("imax".into()));
        s.set_highlight_circle(&cat, Some("gfx"));
        assert_eq!(s.highlight(), &Highlight::Circle("gfx".into()));
        s.set_highlight_format(&cat, Some("6x7"));
        assert_eq!(s.highlight(), &Highlight::Format("6x7".into()));
        s.set_highlight_circle(&cat, None);
        assert_eq!(s.highlight(), &Highlight::None);
    }

    #[test]
    fn test_emphasis_projection() {
        let h = Highlight::Format("ff-35mm".into());
        assert_eq!(h.emphasis_of_format("ff-35mm"), Emphasis::Highlighted);
        assert_eq!(h.emphasis_of_format("6x7"), Emphasis::Dimmed);
        assert_eq!(h.emphasis_of_circle("ff-35mm"), Emphasis::Dimmed);
        assert_eq!(Highlight::None.emphasis_of_circle("gfx"), Emphasis::Normal);
    }

    #[test]
    fn test_select_category_bulk() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        s.toggle_format(&cat, "ff-35mm", true);
        s.select_category(&cat, "medium-format", true);
        let ids: Vec<&str> = s.selected_formats().iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["645", "6x6", "6x7", "6x8", "ff-35mm"]);
        s.select_category(&cat, "medium-format", false);
        let ids: Vec<&str> = s.selected_formats().iter().map(String::as_str).collect();
        assert_eq!(ids, vec!["ff-35mm"]);
    }

    #[test]
    fn test_select_and_deselect_all() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        assert!(s.select_all_formats(&cat));
        assert!(!s.select_all_formats(&cat));
        assert_eq!(s.selected_formats().len(), cat.formats().len());
        assert!(s.select_all_circles(&cat));
        assert_eq!(s.selected_circles().len(), cat.circles().len());
        assert!(s.deselect_all_formats());
        assert!(s.deselect_all_circles());
        assert!(!s.deselect_all_circles());
        assert!(s.selected_formats().is_empty());
    }

    #[test]
    fn test_opacity_clamped() {
        let mut s = SelectionState::new();
        s.set_reference_opacity(1.7);
        assert_eq!(s.reference().opacity, 1.0);
        s.set_reference_opacity(-0.2);
        assert_eq!(s.reference().opacity, 0.0);
        s.set_reference_opacity(f64::NAN);
        assert_eq!(s.reference().opacity, DEFAULT_REFERENCE_OPACITY);
    }

    #[test]
    fn test_unknown_preset_ignored() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        assert!(!s.set_reference_image(&cat, ReferenceSource::Preset("nope".into())));
        assert_eq!(s.reference().source, ReferenceSource::None);
    }

    #[test]
    fn test_stale_failure_does_not_break_new_source() {
        let cat = fixtures::catalog();
        let key = cat.presets()[0].key.clone();
        let mut s = SelectionState::new();
        let old = ReferenceSource::Inline {
            name: "a.png".into(),
            data_url: "data:image/png;base64,AA==".into(),
        };
        s.finish_reference_load(Ok(("a.png".into(), "data:image/png;base64,AA==".into())));
        s.set_reference_image(&cat, ReferenceSource::Preset(key.clone()));
        assert!(!s.mark_reference_broken(&old));
        assert!(!s.reference().broken);
        assert!(s.mark_reference_broken(&ReferenceSource::Preset(key.clone())));
        assert!(s.reference().broken);
        // Re-selecting the same source retries it.
        assert!(s.set_reference_image(&cat, ReferenceSource::Preset(key)));
        assert!(!s.reference().broken);
    }

    #[test]
    fn test_late_load_keeps_selection_changes() {
        let cat = fixtures::catalog();
        let mut s = SelectionState::new();
        s.toggle_format(&cat, "ff-35mm", true);
        s.begin_reference_load();
        assert_eq!(s.reference().loads_in_flight, 1);

        // User keeps working while the read is pending.
        s.toggle_format(&cat, "6x7", true);
        s.toggle_circle(&cat, "gfx", true);
        s.set_reference_opacity(0.8);
        s.set_highlight_circle(&cat, Some("gfx"));

        s.finish_reference_load(Ok(("shot.jpg".into(), "data:image/jpeg;base64,/9j/".into())));
        assert_eq!(s.reference().loads_in_flight, 0);
        assert!(s.is_format_selected("6x7"));
        assert!(s.is_circle_selected("gfx"));
        assert_eq!(s.reference().opacity, 0.8);
        assert_eq!(s.highlight(), &Highlight::Circle("gfx".into()));
        assert!(matches!(s.reference().source, ReferenceSource::Inline { .. }));
    }

    #[test]
    fn test_failed_load_keeps_previous_source() {
        let cat = fixtures::catalog();
        let key = cat.presets()[0].key.clone();
        let mut s = SelectionState::new();
        s.set_reference_image(&cat, ReferenceSource::Preset(key.clone()));
        s.begin_reference_load();
        s.finish_reference_load(Err("unreadable".into()));
        assert_eq!(s.reference().source, ReferenceSource::Preset(key));
        assert_eq!(s.reference().loads_in_flight, 0);
    }
}
