use crate::domain::entities::result::ResultRow;
use crate::domain::entities::schema::ColumnKind;

/// Read access to whatever holds the filter controls of a front end.
pub trait ControlState {
    /// Values currently checked in a multi-select control.
    fn checked_values(&self, control_id: &str) -> Vec<String>;
    /// Raw text typed in an input control.
    fn input_value(&self, control_id: &str) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridColumn {
    pub id: String,
    pub header: String,
    pub kind: ColumnKind,
}

/// Table widget driven by the rendering adapter.
pub trait GridWidget {
    fn set_columns(&mut self, columns: Vec<GridColumn>);
    fn set_rows(&mut self, rows: Vec<ResultRow>);
    fn relayout(&mut self);
}
