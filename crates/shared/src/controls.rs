//! Checkbox panel projection: formats grouped by category with a tri-state
//! group checkbox, plus a flat list of image circles.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::selection::{Emphasis, SelectionState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriState {
    Unchecked,
    Indeterminate,
    Checked,
}

impl TriState {
    pub fn from_counts(selected: usize, total: usize) -> Self {
        if total > 0 && selected == total {
            TriState::Checked
        } else if selected > 0 {
            TriState::Indeterminate
        } else {
            TriState::Unchecked
        }
    }

    /// Value for the native `checked` property.
    pub fn checked(self) -> bool {
        self == TriState::Checked
    }

    /// Value for the native `indeterminate` property.
    pub fn indeterminate(self) -> bool {
        self == TriState::Indeterminate
    }

    /// What toggling the group checkbox should do: select all unless already full.
    pub fn toggle_target(self) -> bool {
        self != TriState::Checked
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatRow {
    pub id: String,
    pub name: String,
    pub color: String,
    pub dimensions: String,
    pub checked: bool,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub key: String,
    pub label: String,
    pub state: TriState,
    pub rows: Vec<FormatRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircleRow {
    pub id: String,
    pub name: String,
    pub color: String,
    pub diameter: String,
    pub notes: String,
    pub checked: bool,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlPanelView {
    pub groups: Vec<CategoryGroup>,
    pub circles: Vec<CircleRow>,
}

impl ControlPanelView {
    pub fn group(&self, key: &str) -> Option<&CategoryGroup> {
        self.groups.iter().find(|g| g.key == key)
    }

    pub fn checked_format_ids(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.rows.iter())
            .filter(|r| r.checked)
            .map(|r| r.id.as_str())
            .collect()
    }

    pub fn checked_circle_ids(&self) -> Vec<&str> {
        self.circles
            .iter()
            .filter(|r| r.checked)
            .map(|r| r.id.as_str())
            .collect()
    }
}

pub fn render_controls(catalog: &Catalog, state: &SelectionState) -> ControlPanelView {
    let highlight = state.highlight();

    let groups = catalog
        .categories()
        .iter()
        .map(|cat| {
            let rows: Vec<FormatRow> = catalog
                .formats_in_category(&cat.key)
                .map(|f| FormatRow {
                    id: f.id.clone(),
                    name: f.name.clone(),
                    color: f.color.clone(),
                    dimensions: format!("{}\u{00D7}{}", f.width, f.height),
                    checked: state.is_format_selected(&f.id),
                    emphasis: highlight.emphasis_of_format(&f.id),
                })
                .collect();
            let selected = rows.iter().filter(|r| r.checked).count();
            CategoryGroup {
                key: cat.key.clone(),
                label: cat.label.clone(),
                state: TriState::from_counts(selected, rows.len()),
                rows,
            }
        })
        .collect();

    let circles = catalog
        .circles()
        .iter()
        .map(|c| CircleRow {
            id: c.id.clone(),
            name: c.name.clone(),
            color: c.color.clone(),
            diameter: format!("\u{2300}{}", c.diameter),
            notes: c.notes.clone(),
            checked: state.is_circle_selected(&c.id),
            emphasis: highlight.emphasis_of_circle(&c.id),
        })
        .collect();

    ControlPanelView { groups, circles }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    #[test]
    fn test_tri_state_from_counts() {
        assert_eq!(TriState::from_counts(0, 4), TriState::Unchecked);
        assert_eq!(TriState::from_counts(2, 4), TriState::Indeterminate);
        assert_eq!(TriState::from_counts(4, 4), TriState::Checked);
        assert_eq!(TriState::from_counts(0, 0), TriState::Unchecked);
    }

    #[test]
    fn test_tri_state_native_properties() {
        assert!(TriState::Checked.checked());
        assert!(!TriState::Checked.indeterminate());
        assert!(!TriState::Indeterminate.checked());
        assert!(TriState::Indeterminate.indeterminate());
        assert!(TriState::Indeterminate.toggle_target());
        assert!(!TriState::Checked.toggle_target());
    }

    #[test]
    fn test_groups_follow_category_order() {
        let cat = fixtures::catalog();
        let view = render_controls(&cat, &SelectionState::new());
        let labels: Vec<&str> = view.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels[0], "35mm Cine");
        assert_eq!(labels[6], "Large Format");
        assert_eq!(view.circles.len(), cat.circles().len());
    }

    #[test]
    fn test_tri_state_consistent_for_every_category() {
        let cat = fixtures::catalog();
        let mut state = SelectionState::new();
        state.toggle_format(&cat, "6x7", true);
        state.select_category(&cat, "large-format", true);
        state.toggle_format(&cat, "ff-35mm", true);
        let view = render_controls(&cat, &state);
        for group in &view.groups {
            let members: Vec<_> = cat.formats_in_category(&group.key).collect();
            let selected = members.iter().filter(|f| state.is_format_selected(&f.id)).count();
            let expected = if selected == members.len() {
                TriState::Checked
            } else if selected > 0 {
                TriState::Indeterminate
            } else {
                TriState::Unchecked
            };
            assert_eq!(group.state, expected, "category {}", group.key);
        }
        assert_eq!(view.group("medium-format").unwrap().state, TriState::Indeterminate);
        assert_eq!(view.group("large-format").unwrap().state, TriState::Checked);
        assert_eq!(view.group("35mm-still").unwrap().state, TriState::Checked);
        assert_eq!(view.group("imax").unwrap().state, TriState::Unchecked);
    }

    #[test]
    fn test_checkboxes_mirror_selection() {
        let cat = fixtures::catalog();
        let mut state = SelectionState::new();
        state.toggle_format(&cat, "imax", true);
        state.toggle_circle(&cat, "gfx", true);
        let view = render_controls(&cat, &state);
        assert_eq!(view.checked_format_ids(), vec!["imax"]);
        assert_eq!(view.checked_circle_ids(), vec!["gfx"]);
    }

    #[test]
    fn test_row_labels() {
        let cat = fixtures::catalog();
        let view = render_controls(&cat, &SelectionState::new());
        let six = view
            .group("medium-format")
            .unwrap()
            .rows
            .iter()
            .find(|r| r.id == "6x7")
            .unwrap();
        assert_eq!(six.dimensions, "70\u{00D7}56");
        let gfx = view.circles.iter().find(|c| c.id == "gfx").unwrap();
        assert_eq!(gfx.diameter, "\u{2300}55");
    }

    #[test]
    fn test_hovered_row_emphasis() {
        let cat = fixtures::catalog();
        let mut state = SelectionState::new();
        state.set_highlight_circle(&cat, Some("pl-s35"));
        let view = render_controls(&cat, &state);
        let pl = view.circles.iter().find(|c| c.id == "pl-s35").unwrap();
        assert_eq!(pl.emphasis, Emphasis::Highlighted);
        assert!(view.groups[0].rows.iter().all(|r| r.emphasis == Emphasis::Dimmed));
    }
}
