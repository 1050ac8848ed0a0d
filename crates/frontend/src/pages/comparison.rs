use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use framecompare_shared::catalog::Catalog;
use framecompare_shared::controls::render_controls;
use framecompare_shared::coordinator::{Coordinator, RenderPass, UiEvent};
use framecompare_shared::diagram::reference_href;

use crate::api;
use crate::components::control_panel::ControlPanel;
use crate::components::detail_table::DetailTableView;
use crate::components::diagram_view::DiagramView;
use crate::components::reference_panel::ReferencePanel;
use crate::components::tooltip::Tooltip;
use crate::config::{DEFAULT_CIRCLES, DEFAULT_FORMATS};
use crate::dom;

/// Catalog handle compared by identity so it can travel as a prop.
#[derive(Clone)]
pub struct CatalogHandle(pub Arc<Catalog>);

impl PartialEq for CatalogHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
pub fn Comparison() -> Element {
    let catalog_resource = use_resource(|| async {
        let result = api::fetch_catalog().await;
        if let Err(e) = &result {
            tracing::error!(error = e.as_str(), "Catalog fetch failed");
        }
        result
    });

    let view = match &*catalog_resource.read() {
        None => rsx! {
            div { class: "app loading", "Loading catalog\u{2026}" }
        },
        Some(Err(e)) => rsx! {
            div { class: "app",
                div { class: "error-panel",
                    h2 { "Could not load the format catalog" }
                    p { "{e}" }
                }
            }
        },
        Some(Ok(catalog)) => rsx! {
            Workspace { catalog: CatalogHandle(catalog.clone()) }
        },
    };
    view
}

#[component]
fn Workspace(catalog: CatalogHandle) -> Element {
    // The coordinator lives outside the reactive graph; `revision` is bumped
    // only when a dispatch reports a visible change.
    let coordinator = use_hook(|| {
        Rc::new(RefCell::new(Coordinator::with_selection(
            catalog.0.clone(),
            DEFAULT_FORMATS,
            DEFAULT_CIRCLES,
        )))
    });
    let mut revision = use_signal(|| 0u64);

    let on_event = use_callback({
        let coordinator = coordinator.clone();
        move |event: UiEvent| {
            let changed = coordinator.borrow_mut().dispatch(event);
            if changed {
                revision += 1;
            }
        }
    });

    // Native checkboxes have no indeterminate attribute; push it after every render.
    use_effect({
        let coordinator = coordinator.clone();
        move || {
            revision();
            let c = coordinator.borrow();
            for group in render_controls(c.catalog(), c.state()).groups {
                dom::sync_tri_state(&dom::category_checkbox_id(&group.key), group.state);
            }
        }
    });

    revision();
    let (pass, presets, reference, href) = {
        let c = coordinator.borrow();
        let reference = c.state().reference().clone();
        let href = reference_href(c.catalog(), &reference.source);
        (c.render(), c.catalog().presets().to_vec(), reference, href)
    };
    let RenderPass {
        svg,
        controls,
        table,
        tooltip,
        ..
    } = pass;
    let hovered = tooltip.as_ref().map(|t| t.content.entity.clone());

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "Frame Compare" }
                span { class: "subtitle", "Film and sensor formats on a shared optical center" }
            }

            div { class: "sidebar",
                ControlPanel { view: controls, on_event }
                ReferencePanel { presets, reference, href, on_event }
            }

            div { class: "main",
                DiagramView { svg, hovered, on_event }
                DetailTableView { table, on_event }
            }

            Tooltip { view: tooltip }
        }
    }
}
