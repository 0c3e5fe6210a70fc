use crate::domain::entities::schema::DatasetSchema;
use crate::DEFAULT_VISIBLE_COLUMNS;

/// Outcome of a visibility change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionChange {
    /// Would have emptied the projection; nothing changed.
    Rejected,
    /// Stored; no result to redraw yet.
    Stored,
    /// Redrawn from the rows already fetched.
    Reprojected,
    /// The fetched rows lacked a column, so the query ran again.
    Requeried,
}

/// Visible columns of one dataset, kept in schema order and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProjection {
    visible: Vec<String>,
}

impl ColumnProjection {
    pub fn initial(schema: &DatasetSchema) -> Self {
        Self {
            visible: schema
                .columns
                .iter()
                .take(DEFAULT_VISIBLE_COLUMNS.max(1))
                .map(|column| column.id.to_string())
                .collect(),
        }
    }

    pub fn visible(&self) -> &[String] {
        &self.visible
    }

    pub fn is_visible(&self, column_id: &str) -> bool {
        self.visible.iter().any(|id| id == column_id)
    }

    /// Replaces the projection unless the candidate set is empty once
    /// unknown ids are dropped. Returns whether anything was stored.
    pub fn replace<S: AsRef<str>>(&mut self, schema: &DatasetSchema, candidates: &[S]) -> bool {
        let ordered = schema.in_schema_order(candidates);
        if ordered.is_empty() {
            return false;
        }
        self.visible = ordered;
        true
    }

    /// Candidate set produced by flipping one checkbox.
    pub fn toggled(&self, column_id: &str, checked: bool) -> Vec<String> {
        let mut next: Vec<String> = self
            .visible
            .iter()
            .filter(|id| id.as_str() != column_id)
            .cloned()
            .collect();
        if checked {
            next.push(column_id.to_string());
        }
        next
    }
}
