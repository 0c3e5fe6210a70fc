use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Local};

/// One value as returned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Integer(value) => Some(*value as f64),
            CellValue::Real(value) => Some(*value),
            CellValue::Null | CellValue::Text(_) => None,
        }
    }

    /// Ordering used by client-side sorting: nulls first, then numbers, then text.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        fn rank(value: &CellValue) -> u8 {
            match value {
                CellValue::Null => 0,
                CellValue::Integer(_) | CellValue::Real(_) => 1,
                CellValue::Text(_) => 2,
            }
        }

        match (self, other) {
            (CellValue::Text(left), CellValue::Text(right)) => left.cmp(right),
            _ => match (self.as_number(), other.as_number()) {
                (Some(left), Some(right)) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
                _ => rank(self).cmp(&rank(other)),
            },
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Integer(value) => write!(f, "{value}"),
            CellValue::Real(value) => write!(f, "{value}"),
            CellValue::Text(value) => write!(f, "{value}"),
        }
    }
}

/// Ordered field -> value mapping for one row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow {
    pub fields: Vec<(String, CellValue)>,
}

impl ResultRow {
    pub fn new(fields: Vec<(String, CellValue)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
    pub completed_at: DateTime<Local>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<ResultRow>) -> Self {
        Self {
            columns,
            rows,
            completed_at: Local::now(),
        }
    }

    /// Local wall-clock time the query finished, as `HH:MM:SS`.
    pub fn completed_label(&self) -> String {
        self.completed_at.format("%H:%M:%S").to_string()
    }

    /// Whether the fetched rows already carry every requested column.
    pub fn covers<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        columns
            .iter()
            .all(|column| self.columns.iter().any(|own| own == column.as_ref()))
    }
}
