use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use crate::domain::entities::result::ResultRow;
use crate::infra::sqlite::queries::run_query;
use crate::infra::sqlite::schema::open_connection;
use crate::usecase::ports::engine::{EngineError, QueryEngine, SqlParam};

pub struct SqliteEngine {
    conn: Connection,
}

impl SqliteEngine {
    pub fn open(db_path: &Path) -> Result<Self> {
        Ok(Self {
            conn: open_connection(db_path)?,
        })
    }
}

impl QueryEngine for SqliteEngine {
    fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<ResultRow>, EngineError> {
        run_query(&self.conn, sql, params).map_err(|err| EngineError::Message(format!("{err:#}")))
    }
}
