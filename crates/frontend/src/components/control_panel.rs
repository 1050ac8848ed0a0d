use dioxus::prelude::*;
use framecompare_shared::controls::{CategoryGroup, CircleRow, ControlPanelView, FormatRow};
use framecompare_shared::coordinator::UiEvent;
use framecompare_shared::models::EntityRef;

use crate::dom;

#[component]
pub fn ControlPanel(view: ControlPanelView, on_event: EventHandler<UiEvent>) -> Element {
    rsx! {
        div { class: "panel",
            div { class: "panel-header",
                h3 { "Formats" }
                div { class: "bulk-actions",
                    button {
                        class: "secondary",
                        onclick: move |_| on_event.call(UiEvent::SelectAllFormats),
                        "All"
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| on_event.call(UiEvent::DeselectAllFormats),
                        "None"
                    }
                }
            }
            for group in view.groups {
                CategoryGroupView { key: "{group.key}", group: group.clone(), on_event }
            }
        }

        div { class: "panel",
            div { class: "panel-header",
                h3 { "Image circles" }
                div { class: "bulk-actions",
                    button {
                        class: "secondary",
                        onclick: move |_| on_event.call(UiEvent::SelectAllCircles),
                        "All"
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| on_event.call(UiEvent::DeselectAllCircles),
                        "None"
                    }
                }
            }
            for row in view.circles {
                CircleRowView { key: "{row.id}", row: row.clone(), on_event }
            }
        }
    }
}

#[component]
fn CategoryGroupView(group: CategoryGroup, on_event: EventHandler<UiEvent>) -> Element {
    let checkbox_id = dom::category_checkbox_id(&group.key);
    let key = group.key.clone();
    let select = group.state.toggle_target();

    rsx! {
        div { class: "category-group",
            label { class: "category-header",
                input {
                    id: "{checkbox_id}",
                    r#type: "checkbox",
                    checked: group.state.checked(),
                    onchange: move |_| {
                        on_event.call(UiEvent::SelectCategory { key: key.clone(), on: select });
                    },
                }
                span { "{group.label}" }
            }
            for row in group.rows {
                FormatRowView { key: "{row.id}", row: row.clone(), on_event }
            }
        }
    }
}

#[component]
fn FormatRowView(row: FormatRow, on_event: EventHandler<UiEvent>) -> Element {
    let entity = EntityRef::Format(row.id.clone());
    let id = row.id.clone();
    let next = !row.checked;
    let class = format!("control-row {}", row.emphasis.css_class());

    rsx! {
        label {
            class: "{class}",
            onmouseenter: move |_| on_event.call(UiEvent::HoverRow(entity.clone())),
            onmouseleave: move |_| on_event.call(UiEvent::Unhover),
            input {
                r#type: "checkbox",
                checked: row.checked,
                onchange: move |_| {
                    on_event.call(UiEvent::ToggleFormat { id: id.clone(), on: next });
                },
            }
            span { class: "swatch", style: "border-color: {row.color};" }
            span { class: "row-name", "{row.name}" }
            span { class: "row-meta", "{row.dimensions}" }
        }
    }
}

#[component]
fn CircleRowView(row: CircleRow, on_event: EventHandler<UiEvent>) -> Element {
    let entity = EntityRef::Circle(row.id.clone());
    let id = row.id.clone();
    let next = !row.checked;
    let class = format!("control-row {}", row.emphasis.css_class());

    rsx! {
        label {
            class: "{class}",
            title: "{row.notes}",
            onmouseenter: move |_| on_event.call(UiEvent::HoverRow(entity.clone())),
            onmouseleave: move |_| on_event.call(UiEvent::Unhover),
            input {
                r#type: "checkbox",
                checked: row.checked,
                onchange: move |_| {
                    on_event.call(UiEvent::ToggleCircle { id: id.clone(), on: next });
                },
            }
            span { class: "swatch circle", style: "border-color: {row.color};" }
            span { class: "row-name", "{row.name}" }
            span { class: "row-meta", "{row.diameter}" }
        }
    }
}
