use dioxus::prelude::*;
use framecompare_shared::coordinator::UiEvent;
use framecompare_shared::models::EntityRef;
use framecompare_shared::table::{CoverageHeader, DetailTable, TableRow};

#[component]
pub fn DetailTableView(table: DetailTable, on_event: EventHandler<UiEvent>) -> Element {
    if table.is_empty() {
        return rsx! {
            div { class: "details empty", "No formats selected" }
        };
    }

    let show_coverage = table.has_coverage();
    let headers = table.coverage_headers.clone().unwrap_or_default();

    rsx! {
        div { class: "details",
            table {
                thead {
                    tr {
                        th { "Format" }
                        th { class: "num", "Width (mm)" }
                        th { class: "num", "Height (mm)" }
                        th { class: "num", "Diagonal (mm)" }
                        th { "Aspect" }
                        th { "Medium" }
                        th { "Category" }
                        if show_coverage {
                            th { class: "coverage-col",
                                "Coverage"
                                div { class: "coverage-legend",
                                    for h in headers.iter() {
                                        span {
                                            class: "coverage-key",
                                            style: "color: {h.color};",
                                            title: "{h.name}",
                                            "\u{2300}{h.diameter}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                tbody {
                    for row in table.rows {
                        TableRowView {
                            key: "{row.id}",
                            row: row.clone(),
                            headers: headers.clone(),
                            show_coverage,
                            on_event,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn TableRowView(
    row: TableRow,
    headers: Vec<CoverageHeader>,
    show_coverage: bool,
    on_event: EventHandler<UiEvent>,
) -> Element {
    let entity = EntityRef::Format(row.id.clone());
    let class = row.emphasis.css_class();
    let cells: Vec<(&'static str, &'static str, String)> = row
        .coverage
        .iter()
        .zip(headers.iter())
        .map(|(cell, header)| {
            let (class, verdict) = if cell.covered {
                ("covered", "covers")
            } else {
                ("not-covered", "does not cover")
            };
            (class, cell.glyph(), format!("{} {} this format", header.name, verdict))
        })
        .collect();

    rsx! {
        tr {
            class: "{class}",
            onmouseenter: move |_| on_event.call(UiEvent::HoverRow(entity.clone())),
            onmouseleave: move |_| on_event.call(UiEvent::Unhover),
            td {
                span { class: "swatch", style: "border-color: {row.color};" }
                "{row.name}"
            }
            td { class: "num", "{row.width}" }
            td { class: "num", "{row.height}" }
            td { class: "num", "{row.diagonal}" }
            td { "{row.aspect}" }
            td { "{row.medium}" }
            td { "{row.category}" }
            if show_coverage {
                td { class: "coverage-col",
                    for (class, glyph, title) in cells {
                        span { class: "coverage-glyph {class}", title: "{title}", "{glyph}" }
                    }
                }
            }
        }
    }
}
