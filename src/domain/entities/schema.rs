use std::collections::{BTreeMap, BTreeSet};

/// How a column is presented by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    #[default]
    Plain,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: &'static str,
    pub display_name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnDef {
    pub const fn plain(id: &'static str, display_name: &'static str) -> Self {
        Self {
            id,
            display_name,
            kind: ColumnKind::Plain,
        }
    }

    pub const fn link(id: &'static str, display_name: &'static str) -> Self {
        Self {
            id,
            display_name,
            kind: ColumnKind::Link,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDescriptor {
    Categorical {
        id: &'static str,
        column: &'static str,
        match_mode: MatchMode,
        label: &'static str,
        placeholder: &'static str,
    },
    FreeText {
        id: &'static str,
        column: &'static str,
        label: &'static str,
        placeholder: &'static str,
    },
    Range {
        min_id: &'static str,
        max_id: &'static str,
        column: &'static str,
        labels: (&'static str, &'static str),
        placeholders: (&'static str, &'static str),
    },
}

impl FilterDescriptor {
    pub fn column(&self) -> &'static str {
        match self {
            FilterDescriptor::Categorical { column, .. }
            | FilterDescriptor::FreeText { column, .. }
            | FilterDescriptor::Range { column, .. } => *column,
        }
    }

    /// Control ids this filter owns in the UI state, one for categorical and
    /// text filters, two for ranges.
    pub fn control_ids(&self) -> Vec<&'static str> {
        match self {
            FilterDescriptor::Categorical { id, .. } | FilterDescriptor::FreeText { id, .. } => {
                vec![*id]
            }
            FilterDescriptor::Range { min_id, max_id, .. } => vec![*min_id, *max_id],
        }
    }

    /// Key under which the normalized value of this filter is stored.
    pub fn value_key(&self) -> &'static str {
        match self {
            FilterDescriptor::Categorical { id, .. } | FilterDescriptor::FreeText { id, .. } => *id,
            FilterDescriptor::Range { min_id, .. } => *min_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSchema {
    pub key: &'static str,
    pub label: &'static str,
    pub relation_name: &'static str,
    pub order_by: Vec<&'static str>,
    pub columns: Vec<ColumnDef>,
    pub filters: Vec<FilterDescriptor>,
    pub default_filter_values: BTreeMap<&'static str, BTreeSet<String>>,
}

impl DatasetSchema {
    pub fn column(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|column| column.id == id)
    }

    pub fn has_column(&self, id: &str) -> bool {
        self.column(id).is_some()
    }

    pub fn column_ids(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.id.to_string()).collect()
    }

    pub fn defaults_for(&self, filter_id: &str) -> BTreeSet<String> {
        self.default_filter_values
            .get(filter_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Keeps the ids that name declared columns, in declaration order.
    pub fn in_schema_order<S: AsRef<str>>(&self, ids: &[S]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|column| ids.iter().any(|id| id.as_ref() == column.id))
            .map(|column| column.id.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DatasetSchema {
        DatasetSchema {
            key: "sample",
            label: "Sample",
            relation_name: "sample",
            order_by: vec!["a"],
            columns: vec![
                ColumnDef::plain("a", "A"),
                ColumnDef::plain("b", "B"),
                ColumnDef::link("c", "C"),
            ],
            filters: vec![FilterDescriptor::Range {
                min_id: "s-min",
                max_id: "s-max",
                column: "b",
                labels: ("min", "max"),
                placeholders: ("", ""),
            }],
            default_filter_values: BTreeMap::new(),
        }
    }

    #[test]
    fn in_schema_order_drops_unknown_ids_and_reorders() {
        let schema = sample();

        let ordered = schema.in_schema_order(&["c", "zzz", "a"]);

        assert_eq!(ordered, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn range_filter_owns_two_controls() {
        let schema = sample();

        assert_eq!(schema.filters[0].control_ids(), vec!["s-min", "s-max"]);
        assert_eq!(schema.filters[0].value_key(), "s-min");
        assert_eq!(schema.filters[0].column(), "b");
    }
}
