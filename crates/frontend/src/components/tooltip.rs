use dioxus::prelude::*;
use framecompare_shared::coordinator::TooltipView;
use framecompare_shared::tooltip::{place, Size};

use crate::config::TOOLTIP_ID;
use crate::dom;

#[component]
pub fn Tooltip(view: Option<TooltipView>) -> Element {
    let mut size = use_signal(Size::default);

    // Measure after the DOM holds the new content, then place again with the real size.
    use_effect(use_reactive!(|view| {
        if view.is_none() {
            return;
        }
        if let Some(measured) = dom::element_size(TOOLTIP_ID) {
            if *size.peek() != measured {
                size.set(measured);
            }
        }
    }));

    let Some(view) = view else {
        return rsx! {
            div { id: TOOLTIP_ID, class: "tooltip" }
        };
    };

    let viewport = dom::viewport_size().unwrap_or(Size {
        width: f64::INFINITY,
        height: f64::INFINITY,
    });
    let pos = place(view.pointer, size(), viewport);

    let content = view.content;
    let coverage: Vec<(&'static str, String)> = content
        .coverage
        .iter()
        .map(|line| {
            let class = if line.covered { "covered" } else { "not-covered" };
            (class, format!("{}: {}", line.format_name, line.verdict()))
        })
        .collect();

    rsx! {
        div {
            id: TOOLTIP_ID,
            class: "tooltip visible",
            style: "left: {pos.x}px; top: {pos.y}px; border-color: {content.color};",
            div { class: "tt-name", "{content.title}" }
            for line in content.lines {
                div { class: "tt-row",
                    span { class: "tt-label", "{line.label}: " }
                    "{line.value}"
                }
            }
            if !coverage.is_empty() {
                div { class: "tt-coverage",
                    for (class, text) in coverage {
                        div { class: "tt-row {class}", "{text}" }
                    }
                }
            }
        }
    }
}
