use std::collections::BTreeMap;

use crate::domain::entities::filter::FilterValueState;
use crate::domain::entities::result::QueryResult;
use crate::domain::entities::schema::DatasetSchema;
use crate::usecase::services::filter_reader::FormState;
use crate::usecase::services::projection::ColumnProjection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Options offered by the filter widgets, read from the engine at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub choices: BTreeMap<String, Vec<String>>,
    /// Placeholders for range inputs keyed by control id.
    pub range_hints: BTreeMap<String, String>,
}

impl FilterOptions {
    pub fn choices_for(&self, control_id: &str) -> &[String] {
        self.choices
            .get(control_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone)]
pub struct DatasetSession {
    pub controls: FormState,
    pub filter_values: FilterValueState,
    pub projection: ColumnProjection,
    pub last_result: Option<QueryResult>,
    pub options: FilterOptions,
    pub tab: TabState,
}

impl DatasetSession {
    pub fn new(schema: &DatasetSchema) -> Self {
        Self {
            controls: FormState::with_defaults(schema),
            filter_values: FilterValueState::default(),
            projection: ColumnProjection::initial(schema),
            last_result: None,
            options: FilterOptions::default(),
            tab: TabState::Unloaded,
        }
    }
}

/// Everything the browser remembers for the lifetime of one session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    datasets: BTreeMap<String, DatasetSession>,
    active: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the dataset's state on first access.
    pub fn dataset_mut(&mut self, schema: &DatasetSchema) -> &mut DatasetSession {
        self.datasets
            .entry(schema.key.to_string())
            .or_insert_with(|| DatasetSession::new(schema))
    }

    pub fn dataset(&self, key: &str) -> Option<&DatasetSession> {
        self.datasets.get(key)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn set_active(&mut self, key: &str) {
        self.active = Some(key.to_string());
    }
}
