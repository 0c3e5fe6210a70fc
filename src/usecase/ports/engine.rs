use thiserror::Error;

use crate::domain::entities::result::ResultRow;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("{0}")]
    Message(String),
}

/// Positional parameter bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Number(f64),
}

/// Embedded relational engine. Implementations release every prepared
/// statement before returning, on success and on error.
pub trait QueryEngine {
    fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<ResultRow>, EngineError>;
}
