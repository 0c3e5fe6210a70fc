use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::domain::catalog::SchemaRegistry;
use crate::domain::entities::result::{CellValue, QueryResult};
use crate::domain::entities::schema::{DatasetSchema, FilterDescriptor};
use crate::domain::error::{BrowserError, BrowserResult};
use crate::usecase::ports::engine::{EngineError, QueryEngine, SqlParam};
use crate::usecase::services::query_builder::BuiltQuery;
use crate::usecase::services::session::FilterOptions;

pub struct QueryService {
    engine: Box<dyn QueryEngine>,
}

impl QueryService {
    pub fn new(engine: Box<dyn QueryEngine>) -> Self {
        Self { engine }
    }

    pub fn run(&self, query: &BuiltQuery) -> Result<QueryResult, EngineError> {
        let sql = query.sql();
        debug!(
            %sql,
            placeholders = query.placeholder_count(),
            params = query.parameters.len(),
            "running grid query"
        );
        let rows = self.engine.execute(&sql, &query.parameters)?;
        info!(relation = %query.relation, rows = rows.len(), "grid query finished");
        Ok(QueryResult::new(query.select_columns.clone(), rows))
    }

    /// Non-null, non-empty distinct values of a column, sorted by the engine.
    pub fn distinct_values(&self, relation: &str, column: &str) -> Result<Vec<String>, EngineError> {
        let sql = format!(
            "SELECT DISTINCT {column} AS value FROM {relation} WHERE {column} IS NOT NULL ORDER BY {column}"
        );
        let rows = self.engine.execute(&sql, &[])?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("value"))
            .map(CellValue::to_string)
            .filter(|value| !value.is_empty())
            .collect())
    }

    pub fn range_bounds(
        &self,
        relation: &str,
        column: &str,
    ) -> Result<(Option<CellValue>, Option<CellValue>), EngineError> {
        let sql = format!("SELECT MIN({column}) AS min_value, MAX({column}) AS max_value FROM {relation}");
        let rows = self.engine.execute(&sql, &[])?;
        let Some(row) = rows.first() else {
            return Ok((None, None));
        };
        let bound = |name: &str| row.get(name).filter(|value| !value.is_null()).cloned();
        Ok((bound("min_value"), bound("max_value")))
    }

    /// Options for the categorical widgets and hints for the range inputs.
    pub fn hydrate(&self, schema: &DatasetSchema) -> Result<FilterOptions, EngineError> {
        let mut options = FilterOptions::default();
        for filter in &schema.filters {
            match filter {
                FilterDescriptor::Categorical { id, column, .. } => {
                    let values = self.distinct_values(schema.relation_name, column)?;
                    options.choices.insert(id.to_string(), values);
                }
                FilterDescriptor::Range {
                    min_id,
                    max_id,
                    column,
                    ..
                } => {
                    let (min, max) = self.range_bounds(schema.relation_name, column)?;
                    if let Some(min) = min {
                        options.range_hints.insert(min_id.to_string(), min.to_string());
                    }
                    if let Some(max) = max {
                        options.range_hints.insert(max_id.to_string(), max.to_string());
                    }
                }
                FilterDescriptor::FreeText { .. } => {}
            }
        }
        debug!(
            dataset = schema.key,
            filters = options.choices.len(),
            "filter options loaded"
        );
        Ok(options)
    }

    pub fn relation_columns(&self, relation: &str) -> Result<BTreeSet<String>, EngineError> {
        let rows = self.engine.execute(
            "SELECT name FROM pragma_table_info(?)",
            &[SqlParam::Text(relation.to_string())],
        )?;
        Ok(rows
            .iter()
            .filter_map(|row| row.get("name"))
            .map(CellValue::to_string)
            .collect())
    }

    /// Every declared column must exist in the backing relation.
    pub fn validate_catalog(&self, registry: &SchemaRegistry) -> BrowserResult<()> {
        for schema in registry.schemas() {
            let actual = self.relation_columns(schema.relation_name)?;
            for column in &schema.columns {
                if !actual.contains(column.id) {
                    return Err(BrowserError::MissingRelationColumn {
                        dataset: schema.key.to_string(),
                        relation: schema.relation_name.to_string(),
                        column: column.id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
