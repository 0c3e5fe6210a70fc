use thiserror::Error;

use crate::usecase::ports::engine::EngineError;

pub type BrowserResult<T> = Result<T, BrowserError>;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("dataset not found: {key}")]
    NotFound { key: String },

    #[error("filter `{filter_id}` of dataset `{dataset}` references unknown column `{column}`")]
    SchemaColumnMismatch {
        dataset: String,
        filter_id: String,
        column: String,
    },

    #[error("relation `{relation}` of dataset `{dataset}` has no column `{column}`")]
    MissingRelationColumn {
        dataset: String,
        relation: String,
        column: String,
    },

    #[error("dataset `{key}` is declared more than once")]
    DuplicateDataset { key: String },

    #[error("control id `{id}` is declared more than once")]
    DuplicateControlId { id: String },

    #[error("`{name}` is not a plain SQL identifier")]
    InvalidIdentifier { name: String },

    #[error("no data to export for `{key}`; run a query first")]
    NoData { key: String },

    #[error("csv export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
