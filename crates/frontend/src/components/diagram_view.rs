use dioxus::prelude::*;
use framecompare_shared::coordinator::UiEvent;
use framecompare_shared::models::EntityRef;
use framecompare_shared::tooltip::Point;

use crate::config::DIAGRAM_CONTAINER_ID;
use crate::dom;

/// The comparison SVG. Shapes are hit-tested through their `data-entity`
/// attribute instead of per-shape handlers, since the markup is injected.
#[component]
pub fn DiagramView(
    svg: Option<String>,
    hovered: Option<EntityRef>,
    on_event: EventHandler<UiEvent>,
) -> Element {
    rsx! {
        div {
            id: DIAGRAM_CONTAINER_ID,
            class: "diagram-container",

            onmousemove: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                let pointer = Point { x: client.x, y: client.y };
                match dom::entity_at(client.x, client.y) {
                    Some(entity) if hovered.as_ref() == Some(&entity) => {
                        on_event.call(UiEvent::PointerMove(pointer));
                    }
                    Some(entity) => on_event.call(UiEvent::HoverShape { entity, pointer }),
                    None if hovered.is_some() => on_event.call(UiEvent::Unhover),
                    None => {}
                }
            },

            onmouseleave: move |_| on_event.call(UiEvent::Unhover),

            onclick: move |evt: Event<MouseData>| {
                let client = evt.client_coordinates();
                if let Some(entity) = dom::entity_at(client.x, client.y) {
                    on_event.call(UiEvent::ClickShape(entity));
                }
            },

            if let Some(svg) = svg {
                div { class: "diagram-svg", dangerous_inner_html: "{svg}" }
            } else {
                div { class: "empty-state",
                    p { "Nothing to compare yet." }
                    p { class: "hint", "Tick a format or an image circle on the left." }
                }
            }
        }
    }
}
