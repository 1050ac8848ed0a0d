use dioxus::prelude::*;
use framecompare_shared::coordinator::UiEvent;
use framecompare_shared::models::ReferencePreset;
use framecompare_shared::selection::{ReferenceOverlay, ReferenceSource};

use crate::dom;

/// Select value standing for the user's own file.
const INLINE_VALUE: &str = "__inline__";

#[component]
pub fn ReferencePanel(
    presets: Vec<ReferencePreset>,
    reference: ReferenceOverlay,
    href: Option<String>,
    on_event: EventHandler<UiEvent>,
) -> Element {
    let current = match &reference.source {
        ReferenceSource::None => String::new(),
        ReferenceSource::Preset(key) => key.clone(),
        ReferenceSource::Inline { .. } => INLINE_VALUE.to_string(),
    };
    let inline_name = match &reference.source {
        ReferenceSource::Inline { name, .. } => Some(name.clone()),
        _ => None,
    };
    let opacity_pct = (reference.opacity * 100.0).round() as u32;
    let loading = reference.loads_in_flight > 0;
    let broken = reference.broken;
    let probe_source = reference.source.clone();

    rsx! {
        div { class: "panel",
            h3 { "Reference image" }
            select {
                "aria-label": "Reference image",
                value: "{current}",
                onchange: move |evt: Event<FormData>| {
                    let value = evt.value();
                    let source = match value.as_str() {
                        "" => ReferenceSource::None,
                        INLINE_VALUE => return,
                        _ => ReferenceSource::Preset(value),
                    };
                    on_event.call(UiEvent::SetReference(source));
                },
                option { value: "", selected: current.is_empty(), "None" }
                for p in presets.iter() {
                    option {
                        value: "{p.key}",
                        selected: current == p.key,
                        "{p.label}"
                    }
                }
                if let Some(name) = inline_name {
                    option { value: INLINE_VALUE, selected: true, "{name}" }
                }
            }
            div { class: "file-row",
                input {
                    r#type: "file",
                    accept: "image/*",
                    onchange: move |evt: Event<FormData>| {
                        let Some(file) = evt.files().into_iter().next() else {
                            return;
                        };
                        on_event.call(UiEvent::ReferenceLoadStarted);
                        spawn(async move {
                            let name = file.name();
                            let result = match file.read_bytes().await {
                                Ok(bytes) => {
                                    let url = dom::data_url(dom::mime_for(&name), &bytes);
                                    Ok((name, url))
                                }
                                Err(e) => Err(format!("Failed to read {}: {}", name, e)),
                            };
                            on_event.call(UiEvent::ReferenceLoaded(result));
                        });
                    },
                }
            }
            div { class: "strength-row",
                label { "Opacity:" }
                input {
                    r#type: "range",
                    min: "0",
                    max: "100",
                    value: "{opacity_pct}",
                    oninput: move |evt: Event<FormData>| {
                        if let Ok(v) = evt.value().parse::<f64>() {
                            on_event.call(UiEvent::SetReferenceOpacity(v / 100.0));
                        }
                    },
                }
                span { class: "value", "{opacity_pct}%" }
            }
            if loading {
                div { class: "hint", "Reading image\u{2026}" }
            }
            if broken {
                div { class: "error", "The reference image could not be loaded." }
            }
            // Hidden probe: the SVG <image> gives no load errors, an <img> does.
            if let Some(href) = href {
                img {
                    class: "reference-probe",
                    src: "{href}",
                    alt: "",
                    onerror: move |_| on_event.call(UiEvent::ReferenceBroken(probe_source.clone())),
                }
            }
        }
    }
}
