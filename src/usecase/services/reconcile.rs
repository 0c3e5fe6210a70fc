use std::collections::BTreeMap;

use crate::domain::entities::result::{CellValue, QueryResult, ResultRow};
use crate::domain::entities::schema::{ColumnKind, DatasetSchema};
use crate::domain::error::{BrowserError, BrowserResult};
use crate::infra::export::csv::write_csv;
use crate::usecase::ports::ui::{GridColumn, GridWidget};

pub const LINK_LABEL: &str = "Abrir";

/// How one cell should be drawn, independent of the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellDisplay {
    Empty,
    Text(String),
    Link { href: String, label: String },
}

pub fn display_cell(kind: ColumnKind, value: Option<&CellValue>) -> CellDisplay {
    let text = match value {
        None | Some(CellValue::Null) => return CellDisplay::Empty,
        Some(value) => value.to_string(),
    };
    if text.is_empty() {
        return CellDisplay::Empty;
    }
    match kind {
        ColumnKind::Plain => CellDisplay::Text(text),
        ColumnKind::Link => CellDisplay::Link {
            href: text,
            label: LINK_LABEL.to_string(),
        },
    }
}

/// Grid column descriptors for the given projection, in projection order.
pub fn grid_columns(schema: &DatasetSchema, visible: &[String]) -> Vec<GridColumn> {
    visible
        .iter()
        .map(|id| match schema.column(id) {
            Some(column) => GridColumn {
                id: column.id.to_string(),
                header: column.display_name.to_string(),
                kind: column.kind,
            },
            None => GridColumn {
                id: id.clone(),
                header: id.clone(),
                kind: ColumnKind::Plain,
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// Owns one grid widget per dataset and keeps it in step with the latest
/// successful query.
#[derive(Debug, Default)]
pub struct RenderingAdapter<G: GridWidget + Default> {
    grids: BTreeMap<String, G>,
}

impl<G: GridWidget + Default> RenderingAdapter<G> {
    pub fn new() -> Self {
        Self {
            grids: BTreeMap::new(),
        }
    }

    /// Columns and rows are both replaced before the layout pass runs.
    pub fn apply(&mut self, key: &str, columns: Vec<GridColumn>, rows: Vec<ResultRow>) {
        let grid = self.grids.entry(key.to_string()).or_default();
        grid.set_columns(columns);
        grid.set_rows(rows);
        grid.relayout();
    }

    pub fn grid(&self, key: &str) -> Option<&G> {
        self.grids.get(key)
    }

    pub fn grid_mut(&mut self, key: &str) -> Option<&mut G> {
        self.grids.get_mut(key)
    }
}

/// CSV of the last applied result using the current projection as header.
pub fn export_csv(
    key: &str,
    visible: &[String],
    last_result: Option<&QueryResult>,
) -> BrowserResult<CsvExport> {
    let result = last_result.ok_or_else(|| BrowserError::NoData {
        key: key.to_string(),
    })?;

    let rows = result
        .rows
        .iter()
        .map(|row| {
            visible
                .iter()
                .map(|column| row.get(column).map(CellValue::to_string).unwrap_or_default())
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let content =
        write_csv(visible, &rows).map_err(|err| BrowserError::Export(format!("{err:#}")))?;

    Ok(CsvExport {
        file_name: format!("{key}.csv"),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct RecordingGrid {
        calls: Vec<String>,
        columns: Vec<GridColumn>,
        rows: Vec<ResultRow>,
    }

    impl GridWidget for RecordingGrid {
        fn set_columns(&mut self, columns: Vec<GridColumn>) {
            self.calls.push("columns".to_string());
            self.columns = columns;
        }

        fn set_rows(&mut self, rows: Vec<ResultRow>) {
            self.calls.push("rows".to_string());
            self.rows = rows;
        }

        fn relayout(&mut self) {
            self.calls.push("layout".to_string());
        }
    }

    fn row(fields: &[(&str, CellValue)]) -> ResultRow {
        ResultRow::new(
            fields
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        )
    }

    #[test]
    fn apply_sets_data_before_layout() {
        let mut adapter = RenderingAdapter::<RecordingGrid>::new();

        adapter.apply(
            "pos",
            vec![GridColumn {
                id: "uf".to_string(),
                header: "UF".to_string(),
                kind: ColumnKind::Plain,
            }],
            vec![row(&[("uf", CellValue::Text("SP".to_string()))])],
        );

        let grid = adapter.grid("pos").expect("grid should exist after apply");
        assert_eq!(grid.calls, vec!["columns", "rows", "layout"]);
        assert_eq!(grid.columns[0].header, "UF");
        assert_eq!(grid.rows.len(), 1);
    }

    #[test]
    fn link_columns_render_as_links() {
        let href = CellValue::Text("https://example.org/programa".to_string());

        assert_eq!(
            display_cell(ColumnKind::Link, Some(&href)),
            CellDisplay::Link {
                href: "https://example.org/programa".to_string(),
                label: "Abrir".to_string(),
            }
        );
        assert_eq!(display_cell(ColumnKind::Link, Some(&CellValue::Null)), CellDisplay::Empty);
        assert_eq!(
            display_cell(ColumnKind::Plain, Some(&CellValue::Integer(5))),
            CellDisplay::Text("5".to_string())
        );
    }

    #[test]
    fn export_without_result_is_no_data() {
        let err = export_csv("pos", &["uf".to_string()], None).expect_err("should fail");

        assert!(matches!(err, BrowserError::NoData { key } if key == "pos"));
    }

    #[test]
    fn export_quotes_special_values_and_blanks_nulls() {
        let result = QueryResult::new(
            vec!["nome".to_string(), "nota".to_string(), "uf".to_string()],
            vec![
                row(&[
                    ("nome", CellValue::Text("Foo, \"Bar\"".to_string())),
                    ("nota", CellValue::Null),
                    ("uf", CellValue::Text("SP".to_string())),
                ]),
                row(&[
                    ("nome", CellValue::Text("Linha\nnova".to_string())),
                    ("nota", CellValue::Integer(7)),
                    ("uf", CellValue::Text("RJ".to_string())),
                ]),
            ],
        );
        let visible = vec!["uf".to_string(), "nome".to_string(), "nota".to_string()];

        let export = export_csv("pos", &visible, Some(&result)).expect("export should succeed");

        assert_eq!(export.file_name, "pos.csv");
        assert_eq!(
            export.content,
            "uf,nome,nota\nSP,\"Foo, \"\"Bar\"\"\",\nRJ,\"Linha\nnova\",7\n"
        );
    }
}
