//! Routes discrete UI events into store mutations and re-projects every view.
//!
//! There is no incremental path: [`Coordinator::render`] rebuilds the
//! diagram, control panel, table and tooltip from scratch each time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::controls::{render_controls, ControlPanelView};
use crate::diagram::{render_diagram, Diagram};
use crate::models::EntityRef;
use crate::selection::{ReferenceSource, SelectionState};
use crate::svg::render_scene;
use crate::table::{render_table, DetailTable};
use crate::tooltip::{tooltip_content, Point, TooltipContent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UiEvent {
    ToggleFormat { id: String, on: bool },
    ToggleCircle { id: String, on: bool },
    SelectCategory { key: String, on: bool },
    SelectAllFormats,
    DeselectAllFormats,
    SelectAllCircles,
    DeselectAllCircles,
    /// Pointer entered a diagram shape.
    HoverShape { entity: EntityRef, pointer: Point },
    /// Pointer entered a control-panel or table row.
    HoverRow(EntityRef),
    PointerMove(Point),
    Unhover,
    ClickShape(EntityRef),
    SetReference(ReferenceSource),
    ReferenceLoadStarted,
    ReferenceLoaded(Result<(String, String), String>),
    ReferenceBroken(ReferenceSource),
    SetReferenceOpacity(f64),
}

impl UiEvent {
    /// Short name for logs; payloads can hold whole data URLs.
    pub fn kind(&self) -> &'static str {
        match self {
            UiEvent::ToggleFormat { .. } => "toggle_format",
            UiEvent::ToggleCircle { .. } => "toggle_circle",
            UiEvent::SelectCategory { .. } => "select_category",
            UiEvent::SelectAllFormats => "select_all_formats",
            UiEvent::DeselectAllFormats => "deselect_all_formats",
            UiEvent::SelectAllCircles => "select_all_circles",
            UiEvent::DeselectAllCircles => "deselect_all_circles",
            UiEvent::HoverShape { .. } => "hover_shape",
            UiEvent::HoverRow(_) => "hover_row",
            UiEvent::PointerMove(_) => "pointer_move",
            UiEvent::Unhover => "unhover",
            UiEvent::ClickShape(_) => "click_shape",
            UiEvent::SetReference(_) => "set_reference",
            UiEvent::ReferenceLoadStarted => "reference_load_started",
            UiEvent::ReferenceLoaded(_) => "reference_loaded",
            UiEvent::ReferenceBroken(_) => "reference_broken",
            UiEvent::SetReferenceOpacity(_) => "set_reference_opacity",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipView {
    pub content: TooltipContent,
    pub pointer: Point,
}

/// One full projection of the current state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPass {
    pub diagram: Diagram,
    /// Serialized diagram; `None` in the empty state.
    pub svg: Option<String>,
    pub controls: ControlPanelView,
    pub table: DetailTable,
    pub tooltip: Option<TooltipView>,
}

#[derive(Debug, Clone, PartialEq)]
struct Hover {
    entity: EntityRef,
    pointer: Point,
}

#[derive(Debug, Clone)]
pub struct Coordinator {
    catalog: Arc<Catalog>,
    state: SelectionState,
    hover: Option<Hover>,
}

impl Coordinator {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: SelectionState::new(),
            hover: None,
        }
    }

    /// Start with the given ids selected; ids missing from the catalog are skipped.
    pub fn with_selection(catalog: Arc<Catalog>, formats: &[&str], circles: &[&str]) -> Self {
        let mut coordinator = Self::new(catalog);
        for id in formats {
            coordinator.state.toggle_format(&coordinator.catalog, id, true);
        }
        for id in circles {
            coordinator.state.toggle_circle(&coordinator.catalog, id, true);
        }
        coordinator
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Apply one event. Returns whether a re-render is needed.
    pub fn dispatch(&mut self, event: UiEvent) -> bool {
        let kind = event.kind();
        let changed = self.apply(event);
        tracing::debug!(event = kind, changed, "Dispatched UI event");
        changed
    }

    fn apply(&mut self, event: UiEvent) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let state = &mut self.state;
        match event {
            UiEvent::ToggleFormat { id, on } => state.toggle_format(&catalog, &id, on),
            UiEvent::ToggleCircle { id, on } => state.toggle_circle(&catalog, &id, on),
            UiEvent::SelectCategory { key, on } => state.select_category(&catalog, &key, on),
            UiEvent::SelectAllFormats => state.select_all_formats(&catalog),
            UiEvent::DeselectAllFormats => state.deselect_all_formats(),
            UiEvent::SelectAllCircles => state.select_all_circles(&catalog),
            UiEvent::DeselectAllCircles => state.deselect_all_circles(),
            UiEvent::HoverShape { entity, pointer } => {
                let changed = state.set_highlight(&catalog, Some(&entity));
                let next = Some(Hover { entity, pointer });
                let moved = self.hover != next;
                self.hover = next;
                changed || moved
            }
            UiEvent::HoverRow(entity) => {
                let had_tooltip = self.hover.take().is_some();
                state.set_highlight(&catalog, Some(&entity)) || had_tooltip
            }
            UiEvent::PointerMove(pointer) => match &mut self.hover {
                Some(hover) if hover.pointer != pointer => {
                    hover.pointer = pointer;
                    true
                }
                _ => false,
            },
            UiEvent::Unhover => {
                let had_tooltip = self.hover.take().is_some();
                state.set_highlight(&catalog, None) || had_tooltip
            }
            UiEvent::ClickShape(entity) => self.click_shape(entity),
            UiEvent::SetReference(source) => state.set_reference_image(&catalog, source),
            UiEvent::ReferenceLoadStarted => {
                state.begin_reference_load();
                true
            }
            UiEvent::ReferenceLoaded(result) => state.finish_reference_load(result),
            UiEvent::ReferenceBroken(source) => state.mark_reference_broken(&source),
            UiEvent::SetReferenceOpacity(opacity) => state.set_reference_opacity(opacity),
        }
    }

    /// Clicking a drawn shape toggles its membership. A shape that disappears
    /// takes its highlight and tooltip with it.
    fn click_shape(&mut self, entity: EntityRef) -> bool {
        let on = !self.state.is_selected(&entity);
        let changed = match &entity {
            EntityRef::Format(id) => self.state.toggle_format(&self.catalog, id, on),
            EntityRef::Circle(id) => self.state.toggle_circle(&self.catalog, id, on),
        };
        if changed && !on {
            if self.state.highlight().entity().as_ref() == Some(&entity) {
                self.state.set_highlight(&self.catalog, None);
            }
            if self.hover.as_ref().is_some_and(|h| h.entity == entity) {
                self.hover = None;
            }
        }
        changed
    }

    pub fn render(&self) -> RenderPass {
        let diagram = render_diagram(&self.catalog, &self.state);
        let svg = diagram.scene().map(render_scene);
        let tooltip = self.hover.as_ref().and_then(|hover| {
            tooltip_content(&self.catalog, &self.state, &hover.entity).map(|content| {
                TooltipView {
                    content,
                    pointer: hover.pointer,
                }
            })
        });
        RenderPass {
            diagram,
            svg,
            controls: render_controls(&self.catalog, &self.state),
            table: render_table(&self.catalog, &self.state),
            tooltip,
        }
    }
}
