use std::collections::BTreeSet;
use std::path::PathBuf;

use dioxus::prelude::*;
use rfd::{FileDialog, MessageButtons, MessageDialog, MessageLevel};
use tracing::info;

use crate::domain::entities::schema::FilterDescriptor;
use crate::domain::error::BrowserError;
use crate::infra::export::csv::save_csv;
use crate::ui::grid::{SortDirection, SortSpec};
use crate::ui::multibox::{box_key, matching_options, status_text};
use crate::ui::state::app_state::{AppState, Browser};
use crate::usecase::ports::ui::GridColumn;
use crate::usecase::services::projection::ProjectionChange;
use crate::usecase::services::reconcile::CellDisplay;
use crate::usecase::services::session::DatasetSession;

const NO_DATA_MESSAGE: &str = "Nenhum dado para exportar. Rode uma consulta antes.";
const FIELD_STYLE: &str = "display: flex; flex-direction: column; gap: 4px; min-width: 220px;";
const CELL_STYLE: &str = "border: 1px solid #bbb; padding: 6px;";

/// Outcome of the startup work done before the window opens.
#[derive(Debug, Clone)]
pub struct BootContext {
    pub outcome: Result<PathBuf, String>,
}

#[derive(Debug, Clone, PartialEq)]
enum FilterView {
    Multi {
        id: String,
        label: String,
        placeholder: String,
        options: Vec<String>,
        selected: BTreeSet<String>,
    },
    Text {
        id: String,
        label: String,
        placeholder: String,
        value: String,
    },
    Range {
        min_id: String,
        max_id: String,
        labels: (String, String),
        placeholders: (String, String),
        values: (String, String),
    },
}

fn filter_view(filter: &FilterDescriptor, dataset: &DatasetSession) -> FilterView {
    match filter {
        FilterDescriptor::Categorical {
            id,
            label,
            placeholder,
            ..
        } => FilterView::Multi {
            id: id.to_string(),
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            options: dataset.options.choices_for(id).to_vec(),
            selected: dataset.controls.checked.get(*id).cloned().unwrap_or_default(),
        },
        FilterDescriptor::FreeText {
            id,
            label,
            placeholder,
            ..
        } => FilterView::Text {
            id: id.to_string(),
            label: label.to_string(),
            placeholder: placeholder.to_string(),
            value: dataset.controls.input(id).to_string(),
        },
        FilterDescriptor::Range {
            min_id,
            max_id,
            labels,
            placeholders,
            ..
        } => {
            let hint = |control_id: &str, declared: &str| {
                dataset
                    .options
                    .range_hints
                    .get(control_id)
                    .cloned()
                    .unwrap_or_else(|| declared.to_string())
            };
            FilterView::Range {
                min_id: min_id.to_string(),
                max_id: max_id.to_string(),
                labels: (labels.0.to_string(), labels.1.to_string()),
                placeholders: (hint(*min_id, placeholders.0), hint(*max_id, placeholders.1)),
                values: (
                    dataset.controls.input(min_id).to_string(),
                    dataset.controls.input(max_id).to_string(),
                ),
            }
        }
    }
}

fn with_browser(mut browser: Signal<Result<Browser, String>>, action: impl FnOnce(&mut Browser)) {
    if let Ok(browser) = browser.write().as_mut() {
        action(browser);
    }
}

fn tab_style(active: bool) -> &'static str {
    if active {
        "border: 1px solid #1f5fa8; background: #1f5fa8; color: #fff; padding: 6px 14px; border-radius: 6px; cursor: pointer;"
    } else {
        "border: 1px solid #bbb; background: #fff; padding: 6px 14px; border-radius: 6px; cursor: pointer;"
    }
}

fn sort_marker(sort: Option<&SortSpec>, column_id: &str) -> &'static str {
    match sort {
        Some(current) if current.column_id == column_id => match current.direction {
            SortDirection::Asc => " ▲",
            SortDirection::Desc => " ▼",
        },
        _ => "",
    }
}

/// Column id and header text, with an arrow on the sorted column.
fn grid_headers(columns: &[GridColumn], sort: Option<&SortSpec>) -> Vec<(String, String)> {
    columns
        .iter()
        .map(|column| {
            (
                column.id.clone(),
                format!("{}{}", column.header, sort_marker(sort, &column.id)),
            )
        })
        .collect()
}

fn render_cell(cell: CellDisplay) -> Element {
    match cell {
        CellDisplay::Empty => rsx! {},
        CellDisplay::Text(text) => rsx! { "{text}" },
        CellDisplay::Link { href, label } => rsx! {
            a { href: "{href}", target: "_blank", rel: "noopener", "{label}" }
        },
    }
}

fn render_filter(
    filter: FilterView,
    browser: Signal<Result<Browser, String>>,
    key: String,
    clear_revision: u64,
) -> Element {
    match filter {
        FilterView::Multi {
            id,
            label,
            placeholder,
            options,
            selected,
        } => {
            let render_key = box_key(&id, clear_revision);
            rsx! {
                MultiSelectBox {
                    key: "{render_key}",
                    label,
                    placeholder,
                    options,
                    selected,
                    on_toggle: move |(value, checked): (String, bool)| {
                        with_browser(browser, |browser| {
                            if let Ok(controls) = browser.controls_mut(&key) {
                                controls.set_checked(&id, &value, checked);
                            }
                        });
                    },
                }
            }
        }
        FilterView::Text {
            id,
            label,
            placeholder,
            value,
        } => rsx! {
            div { style: FIELD_STYLE,
                label { style: "font-weight: 600;", "{label}" }
                input {
                    r#type: "text",
                    placeholder: "{placeholder}",
                    value: "{value}",
                    oninput: move |event| {
                        let text = event.value();
                        with_browser(browser, |browser| {
                            if let Ok(controls) = browser.controls_mut(&key) {
                                controls.set_input(&id, text);
                            }
                        });
                    },
                }
            }
        },
        FilterView::Range {
            min_id,
            max_id,
            labels,
            placeholders,
            values,
        } => {
            let key_for_max = key.clone();
            let (min_label, max_label) = labels;
            let (min_placeholder, max_placeholder) = placeholders;
            let (min_value, max_value) = values;
            rsx! {
                div { style: FIELD_STYLE,
                    label { style: "font-weight: 600;", "{min_label}" }
                    input {
                        r#type: "number",
                        step: "any",
                        placeholder: "{min_placeholder}",
                        value: "{min_value}",
                        oninput: move |event| {
                            let text = event.value();
                            with_browser(browser, |browser| {
                                if let Ok(controls) = browser.controls_mut(&key) {
                                    controls.set_input(&min_id, text);
                                }
                            });
                        },
                    }
                }
                div { style: FIELD_STYLE,
                    label { style: "font-weight: 600;", "{max_label}" }
                    input {
                        r#type: "number",
                        step: "any",
                        placeholder: "{max_placeholder}",
                        value: "{max_value}",
                        oninput: move |event| {
                            let text = event.value();
                            with_browser(browser, |browser| {
                                if let Ok(controls) = browser.controls_mut(&key_for_max) {
                                    controls.set_input(&max_id, text);
                                }
                            });
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn MultiSelectBox(
    label: String,
    placeholder: String,
    options: Vec<String>,
    selected: BTreeSet<String>,
    on_toggle: EventHandler<(String, bool)>,
) -> Element {
    let mut term = use_signal(String::new);
    let current_term = term();
    let matching = matching_options(&options, &current_term)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
    let status = status_text(options.len(), matching.len(), &current_term, selected.len());

    rsx! {
        div { style: FIELD_STYLE,
            label { style: "font-weight: 600;", "{label}" }
            input {
                r#type: "search",
                placeholder: "{placeholder}",
                value: "{current_term}",
                oninput: move |event| term.set(event.value()),
            }
            div {
                style: "max-height: 160px; overflow-y: auto; border: 1px solid #bbb; border-radius: 6px; padding: 4px;",
                for option in matching {
                    label {
                        key: "{option}",
                        style: "display: flex; align-items: center; gap: 6px; padding: 2px 0;",
                        input {
                            r#type: "checkbox",
                            checked: selected.contains(&option),
                            onchange: {
                                let option = option.clone();
                                move |event: FormEvent| {
                                    let checked = event.value().parse::<bool>().unwrap_or(false);
                                    on_toggle.call((option.clone(), checked));
                                }
                            },
                        }
                        span { "{option}" }
                    }
                }
            }
            small { style: "color: #666;", "{status}" }
        }
    }
}

#[component]
fn ColumnPicker(
    columns: Vec<(String, String, bool)>,
    revision: u64,
    on_toggle: EventHandler<(String, bool)>,
) -> Element {
    rsx! {
        div { style: "display: flex; flex-wrap: wrap; gap: 10px;",
            span { style: "font-weight: 600;", "Colunas:" }
            for (id, name, visible) in columns {
                label {
                    key: "{id}-{revision}",
                    style: "display: flex; align-items: center; gap: 4px;",
                    input {
                        r#type: "checkbox",
                        checked: visible,
                        onchange: {
                            let id = id.clone();
                            move |event: FormEvent| {
                                let checked = event.value().parse::<bool>().unwrap_or(false);
                                on_toggle.call((id.clone(), checked));
                            }
                        },
                    }
                    span { "{name}" }
                }
            }
        }
    }
}

#[component]
fn ResultGrid(
    headers: Vec<(String, String)>,
    rows: Vec<Vec<CellDisplay>>,
    total_rows: usize,
    page: usize,
    page_count: usize,
    on_sort: EventHandler<String>,
    on_page: EventHandler<usize>,
) -> Element {
    let column_count = headers.len().max(1);
    let page_label = page + 1;

    rsx! {
        div { style: "overflow-x: auto;",
            table { style: "border-collapse: collapse; width: 100%; border: 1px solid #bbb;",
                thead {
                    tr {
                        for (id, header) in headers {
                            th {
                                key: "{id}",
                                style: "border: 1px solid #bbb; padding: 6px; background: #f2f2f2; cursor: pointer;",
                                onclick: {
                                    let id = id.clone();
                                    move |_| on_sort.call(id.clone())
                                },
                                "{header}"
                            }
                        }
                    }
                }
                tbody {
                    if rows.is_empty() {
                        tr {
                            td { style: CELL_STYLE,
                                colspan: column_count,
                                "Nenhum resultado"
                            }
                        }
                    } else {
                        for row in rows {
                            tr {
                                for cell in row {
                                    td { style: CELL_STYLE, {render_cell(cell)} }
                                }
                            }
                        }
                    }
                }
            }
        }
        div { style: "display: flex; align-items: center; gap: 8px; margin-top: 8px;",
            button {
                disabled: page == 0,
                onclick: move |_| on_page.call(page.saturating_sub(1)),
                "Anterior"
            }
            span { "Página {page_label} de {page_count} ({total_rows} registros)" }
            button {
                disabled: page_label >= page_count,
                onclick: move |_| on_page.call(page + 1),
                "Próxima"
            }
        }
    }
}

#[component]
pub fn App() -> Element {
    let boot = use_context::<BootContext>();
    let AppState {
        browser,
        mut picker_revision,
        mut clear_revision,
    } = AppState::new(move || match boot.outcome {
        Ok(db_path) => crate::open_browser(&db_path).map_err(|err| format!("{err:#}")),
        Err(err) => Err(err),
    });

    let guard = browser.read();
    let session = match &*guard {
        Ok(session) => session,
        Err(err) => {
            let message = format!("Falha ao carregar a base de dados: {err}");
            return rsx! {
                div { style: "padding: 16px;",
                    p { "{message}" }
                }
            };
        }
    };

    let tabs = session
        .registry()
        .schemas()
        .iter()
        .map(|schema| (schema.key.to_string(), schema.label.to_string()))
        .collect::<Vec<_>>();
    let active = session.active_tab().unwrap_or_default().to_string();
    let status = session.status().to_string();

    let mut filters = Vec::new();
    let mut picker = Vec::new();
    if let (Ok(schema), Some(dataset)) = (
        session.registry().get_schema(&active),
        session.dataset(&active),
    ) {
        filters = schema
            .filters
            .iter()
            .map(|filter| filter_view(filter, dataset))
            .collect();
        picker = schema
            .columns
            .iter()
            .map(|column| {
                (
                    column.id.to_string(),
                    column.display_name.to_string(),
                    dataset.projection.is_visible(column.id),
                )
            })
            .collect();
    }

    let (headers, grid_rows, total_rows, page, page_count) = match session.grid(&active) {
        Some(grid) => (
            grid_headers(grid.columns(), grid.sort()),
            grid.visible_rows()
                .into_iter()
                .map(|row| grid.cells(row))
                .collect::<Vec<_>>(),
            grid.row_count(),
            grid.page(),
            grid.page_count(),
        ),
        None => (Vec::new(), Vec::new(), 0, 0, 1),
    };
    drop(guard);

    let key_for_picker = active.clone();
    let key_for_apply = active.clone();
    let key_for_clear = active.clone();
    let key_for_export = active.clone();
    let key_for_sort = active.clone();
    let key_for_page = active.clone();

    rsx! {
        div { style: "font-family: sans-serif; padding: 12px; display: flex; flex-direction: column; gap: 12px;",
            div { style: "display: flex; gap: 6px;",
                for (key, label) in tabs {
                    button {
                        key: "{key}",
                        style: tab_style(key == active),
                        onclick: {
                            let key = key.clone();
                            move |_| {
                                with_browser(browser, |browser| {
                                    // failures land on the status line
                                    let _ = browser.select_tab(&key);
                                });
                            }
                        },
                        "{label}"
                    }
                }
            }

            div { style: "display: flex; flex-wrap: wrap; gap: 12px; align-items: flex-start;",
                for filter in filters {
                    {render_filter(filter, browser, active.clone(), clear_revision())}
                }
            }

            ColumnPicker {
                columns: picker,
                revision: picker_revision(),
                on_toggle: move |(column_id, checked): (String, bool)| {
                    let mut rejected = false;
                    with_browser(browser, |browser| {
                        rejected = matches!(
                            browser.toggle_column(&key_for_picker, &column_id, checked),
                            Ok(ProjectionChange::Rejected) | Err(_)
                        );
                    });
                    if rejected {
                        *picker_revision.write() += 1;
                    }
                },
            }

            div { style: "display: flex; gap: 8px;",
                button {
                    onclick: move |_| {
                        with_browser(browser, |browser| {
                            let _ = browser.apply_filters(&key_for_apply);
                        });
                    },
                    "Aplicar filtros"
                }
                button {
                    onclick: move |_| {
                        with_browser(browser, |browser| {
                            let _ = browser.clear_filters(&key_for_clear);
                        });
                        *clear_revision.write() += 1;
                    },
                    "Limpar filtros"
                }
                button {
                    onclick: move |_| {
                        let mut export = None;
                        with_browser(browser, |browser| {
                            export = Some(browser.export_csv(&key_for_export));
                        });
                        match export {
                            Some(Ok(export)) => {
                                let Some(path) = FileDialog::new()
                                    .add_filter("CSV", &["csv"])
                                    .set_file_name(export.file_name.clone())
                                    .save_file()
                                else {
                                    return;
                                };
                                let message = match save_csv(&path, &export.content) {
                                    Ok(()) => {
                                        info!(path = %path.display(), "csv saved");
                                        format!("CSV salvo em {}.", path.display())
                                    }
                                    Err(err) => format!("Falha ao salvar CSV: {err:#}"),
                                };
                                with_browser(browser, |browser| browser.set_status(message));
                            }
                            Some(Err(BrowserError::NoData { .. })) => {
                                MessageDialog::new()
                                    .set_level(MessageLevel::Warning)
                                    .set_title("Exportar CSV")
                                    .set_description(NO_DATA_MESSAGE)
                                    .set_buttons(MessageButtons::Ok)
                                    .show();
                            }
                            Some(Err(err)) => {
                                let message = format!("Falha ao exportar: {err}");
                                with_browser(browser, |browser| browser.set_status(message));
                            }
                            None => {}
                        }
                    },
                    "Baixar CSV"
                }
            }

            p { style: "margin: 0; color: #333;", "{status}" }

            ResultGrid {
                headers,
                rows: grid_rows,
                total_rows,
                page,
                page_count,
                on_sort: move |column_id: String| {
                    with_browser(browser, |browser| {
                        if let Some(grid) = browser.grid_mut(&key_for_sort) {
                            grid.toggle_sort(&column_id);
                        }
                    });
                },
                on_page: move |target: usize| {
                    with_browser(browser, |browser| {
                        if let Some(grid) = browser.grid_mut(&key_for_page) {
                            grid.set_page(target);
                        }
                    });
                },
            }
        }
    }
}
