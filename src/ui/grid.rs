use crate::domain::entities::result::ResultRow;
use crate::usecase::ports::ui::{GridColumn, GridWidget};
use crate::usecase::services::reconcile::{display_cell, CellDisplay};
use crate::PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column_id: String,
    pub direction: SortDirection,
}

/// Client-side table: pagination and column sorting over the rows handed in
/// by the rendering adapter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridModel {
    columns: Vec<GridColumn>,
    rows: Vec<ResultRow>,
    sort: Option<SortSpec>,
    page: usize,
    layout_generation: u64,
}

impl GridModel {
    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.rows.len().div_ceil(PAGE_SIZE).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count() - 1);
    }

    /// First click sorts ascending, the next one flips the direction.
    pub fn toggle_sort(&mut self, column_id: &str) {
        let direction = match &self.sort {
            Some(current) if current.column_id == column_id && current.direction == SortDirection::Asc => {
                SortDirection::Desc
            }
            _ => SortDirection::Asc,
        };
        self.sort = Some(SortSpec {
            column_id: column_id.to_string(),
            direction,
        });
        self.page = 0;
    }

    /// Rows of the current page after sorting.
    pub fn visible_rows(&self) -> Vec<&ResultRow> {
        let mut ordered: Vec<&ResultRow> = self.rows.iter().collect();
        if let Some(current) = &self.sort {
            ordered.sort_by(|left, right| {
                let ordering = match (left.get(&current.column_id), right.get(&current.column_id)) {
                    (Some(left), Some(right)) => left.sort_cmp(right),
                    (None, Some(_)) => std::cmp::Ordering::Less,
                    (Some(_), None) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                };
                match current.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        ordered
            .into_iter()
            .skip(self.page * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn cells(&self, row: &ResultRow) -> Vec<CellDisplay> {
        self.columns
            .iter()
            .map(|column| display_cell(column.kind, row.get(&column.id)))
            .collect()
    }
}

impl GridWidget for GridModel {
    fn set_columns(&mut self, columns: Vec<GridColumn>) {
        let sort_survives = self
            .sort
            .as_ref()
            .is_some_and(|current| columns.iter().any(|column| column.id == current.column_id));
        if !sort_survives {
            self.sort = None;
        }
        self.columns = columns;
    }

    fn set_rows(&mut self, rows: Vec<ResultRow>) {
        self.rows = rows;
        self.page = 0;
    }

    fn relayout(&mut self) {
        self.layout_generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::result::CellValue;
    use crate::domain::entities::schema::ColumnKind;

    fn column(id: &str) -> GridColumn {
        GridColumn {
            id: id.to_string(),
            header: id.to_uppercase(),
            kind: ColumnKind::Plain,
        }
    }

    fn rows(values: &[CellValue]) -> Vec<ResultRow> {
        values
            .iter()
            .map(|value| ResultRow::new(vec![("nota".to_string(), value.clone())]))
            .collect()
    }

    fn notas(grid: &GridModel) -> Vec<CellValue> {
        grid.visible_rows()
            .into_iter()
            .filter_map(|row| row.get("nota").cloned())
            .collect()
    }

    #[test]
    fn pages_hold_fifty_rows() {
        let mut grid = GridModel::default();
        grid.set_columns(vec![column("nota")]);
        grid.set_rows(rows(&(0..120).map(CellValue::Integer).collect::<Vec<_>>()));

        assert_eq!(grid.page_count(), 3);
        assert_eq!(grid.visible_rows().len(), 50);

        grid.set_page(99);
        assert_eq!(grid.page(), 2);
        assert_eq!(grid.visible_rows().len(), 20);

        grid.set_page(1);
        assert_eq!(grid.visible_rows().len(), 50);
    }

    #[test]
    fn empty_grid_has_one_page() {
        let grid = GridModel::default();

        assert_eq!(grid.page_count(), 1);
        assert!(grid.visible_rows().is_empty());
    }

    #[test]
    fn sort_toggles_direction_with_nulls_first() {
        let mut grid = GridModel::default();
        grid.set_columns(vec![column("nota")]);
        grid.set_rows(rows(&[
            CellValue::Integer(10),
            CellValue::Null,
            CellValue::Real(2.5),
        ]));

        grid.toggle_sort("nota");
        assert_eq!(
            notas(&grid),
            vec![CellValue::Null, CellValue::Real(2.5), CellValue::Integer(10)]
        );

        grid.toggle_sort("nota");
        assert_eq!(
            notas(&grid),
            vec![CellValue::Integer(10), CellValue::Real(2.5), CellValue::Null]
        );
    }

    #[test]
    fn sort_is_dropped_when_its_column_disappears() {
        let mut grid = GridModel::default();
        grid.set_columns(vec![column("nota"), column("uf")]);
        grid.toggle_sort("uf");

        grid.set_columns(vec![column("nota")]);

        assert_eq!(grid.sort(), None);
    }

    #[test]
    fn relayout_bumps_generation() {
        let mut grid = GridModel::default();

        grid.relayout();
        grid.relayout();

        assert_eq!(grid.layout_generation(), 2);
    }
}
