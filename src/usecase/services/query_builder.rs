use crate::domain::entities::filter::{FilterValue, FilterValueState};
use crate::domain::entities::schema::{DatasetSchema, FilterDescriptor, MatchMode};
use crate::domain::error::{BrowserError, BrowserResult};
use crate::usecase::ports::engine::SqlParam;
use crate::GRID_LIMIT;

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub relation: String,
    pub select_columns: Vec<String>,
    /// Predicate without the `WHERE` keyword, empty when nothing filters.
    pub where_sql: String,
    pub parameters: Vec<SqlParam>,
    pub order_by: Vec<String>,
    pub limit: usize,
}

impl BuiltQuery {
    pub fn sql(&self) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select_columns.join(", "),
            self.relation
        );
        if !self.where_sql.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_sql);
        }
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }
        sql.push_str(&format!(" LIMIT {}", self.limit));
        sql
    }

    pub fn placeholder_count(&self) -> usize {
        self.where_sql.matches('?').count()
    }
}

/// Builds the grid query for one dataset.
///
/// Clauses follow the schema's filter order and the parameters are pushed in
/// the same pass that emits each placeholder, so positional binding always
/// lines up.
pub fn build_query(
    schema: &DatasetSchema,
    visible_columns: &[String],
    filter_values: &FilterValueState,
) -> BrowserResult<BuiltQuery> {
    let mut select_columns = schema.in_schema_order(visible_columns);
    if select_columns.is_empty() {
        select_columns = schema.column_ids();
    }

    let mut clauses = Vec::<String>::new();
    let mut parameters = Vec::<SqlParam>::new();

    for filter in &schema.filters {
        let column = filter.column();
        if !schema.has_column(column) {
            return Err(BrowserError::SchemaColumnMismatch {
                dataset: schema.key.to_string(),
                filter_id: filter.value_key().to_string(),
                column: column.to_string(),
            });
        }

        let Some(value) = filter_values.get(filter.value_key()) else {
            continue;
        };
        if value.is_unconstrained() {
            continue;
        }

        match (filter, value) {
            (FilterDescriptor::Categorical { match_mode, .. }, FilterValue::Categorical(values)) => {
                match match_mode {
                    MatchMode::Substring => {
                        let alternatives = values
                            .iter()
                            .map(|_| format!("{column} LIKE ?"))
                            .collect::<Vec<_>>()
                            .join(" OR ");
                        clauses.push(format!("({alternatives})"));
                        parameters.extend(
                            values
                                .iter()
                                .map(|value| SqlParam::Text(format!("%{value}%"))),
                        );
                    }
                    MatchMode::Exact => {
                        let placeholders = std::iter::repeat_n("?", values.len())
                            .collect::<Vec<_>>()
                            .join(", ");
                        clauses.push(format!("{column} IN ({placeholders})"));
                        parameters.extend(values.iter().cloned().map(SqlParam::Text));
                    }
                }
            }
            (FilterDescriptor::FreeText { .. }, FilterValue::Text(text)) => {
                clauses.push(format!("{column} LIKE ?"));
                parameters.push(SqlParam::Text(format!("%{text}%")));
            }
            (FilterDescriptor::Range { .. }, FilterValue::Range { min, max }) => {
                if let Some(min) = min {
                    clauses.push(format!("{column} >= ?"));
                    parameters.push(SqlParam::Number(*min));
                }
                if let Some(max) = max {
                    clauses.push(format!("{column} <= ?"));
                    parameters.push(SqlParam::Number(*max));
                }
            }
            // A value whose shape does not match its descriptor constrains nothing.
            _ => {}
        }
    }

    Ok(BuiltQuery {
        relation: schema.relation_name.to_string(),
        select_columns,
        where_sql: clauses.join(" AND "),
        parameters,
        order_by: schema.order_by.iter().map(|column| column.to_string()).collect(),
        limit: GRID_LIMIT,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::*;
    use crate::domain::catalog::SchemaRegistry;
    use crate::domain::entities::schema::ColumnDef;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn text(value: &str) -> SqlParam {
        SqlParam::Text(value.to_string())
    }

    fn courses() -> DatasetSchema {
        DatasetSchema {
            key: "cursos",
            label: "Cursos",
            relation_name: "cursos",
            order_by: vec!["nome", "uf"],
            columns: vec![
                ColumnDef::plain("nome", "Nome"),
                ColumnDef::plain("uf", "UF"),
                ColumnDef::plain("nivel", "Nível"),
                ColumnDef::plain("carga", "Carga"),
            ],
            filters: vec![
                FilterDescriptor::Categorical {
                    id: "c-uf",
                    column: "uf",
                    match_mode: MatchMode::Exact,
                    label: "UF",
                    placeholder: "",
                },
                FilterDescriptor::Categorical {
                    id: "c-nivel",
                    column: "nivel",
                    match_mode: MatchMode::Substring,
                    label: "Nível",
                    placeholder: "",
                },
                FilterDescriptor::FreeText {
                    id: "c-nome",
                    column: "nome",
                    label: "Nome",
                    placeholder: "",
                },
                FilterDescriptor::Range {
                    min_id: "c-carga-min",
                    max_id: "c-carga-max",
                    column: "carga",
                    labels: ("Mínimo", "Máximo"),
                    placeholders: ("", ""),
                },
            ],
            default_filter_values: BTreeMap::new(),
        }
    }

    fn visible(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn no_filters_omits_where_clause() {
        let schema = courses();

        let query = build_query(&schema, &visible(&["uf", "nome"]), &FilterValueState::default())
            .expect("query should build");

        assert_eq!(query.sql(), "SELECT nome, uf FROM cursos ORDER BY nome, uf LIMIT 400");
        assert!(query.parameters.is_empty());
    }

    #[test]
    fn exact_categorical_emits_in_list_in_value_order() {
        let schema = courses();
        let mut values = FilterValueState::default();
        values.insert("c-uf", FilterValue::Categorical(set(&["SP", "AM", "RJ"])));

        let query = build_query(&schema, &visible(&["nome"]), &values).expect("query should build");

        assert_eq!(query.where_sql, "uf IN (?, ?, ?)");
        assert_eq!(query.parameters, vec![text("AM"), text("RJ"), text("SP")]);
    }

    #[test]
    fn substring_categorical_wraps_each_value_and_ors_them() {
        let schema = courses();
        let mut values = FilterValueState::default();
        values.insert("c-uf", FilterValue::Categorical(set(&["MG"])));
        values.insert(
            "c-nivel",
            FilterValue::Categorical(set(&["MESTRADO", "DOUTORADO"])),
        );

        let query = build_query(&schema, &visible(&["nome"]), &values).expect("query should build");

        assert_eq!(
            query.where_sql,
            "uf IN (?) AND (nivel LIKE ? OR nivel LIKE ?)"
        );
        assert_eq!(
            query.parameters,
            vec![text("MG"), text("%DOUTORADO%"), text("%MESTRADO%")]
        );
    }

    #[test]
    fn free_text_becomes_single_like() {
        let schema = courses();
        let mut values = FilterValueState::default();
        values.insert("c-nome", FilterValue::Text("Física".to_string()));

        let query = build_query(&schema, &visible(&["nome"]), &values).expect("query should build");

        assert_eq!(query.where_sql, "nome LIKE ?");
        assert_eq!(query.parameters, vec![text("%Física%")]);
    }

    #[test]
    fn range_bounds_emit_independent_numeric_clauses() {
        let schema = courses();
        let cases = [
            (Some(360.0), None, "carga >= ?", vec![SqlParam::Number(360.0)]),
            (None, Some(720.0), "carga <= ?", vec![SqlParam::Number(720.0)]),
            (
                Some(360.0),
                Some(720.0),
                "carga >= ? AND carga <= ?",
                vec![SqlParam::Number(360.0), SqlParam::Number(720.0)],
            ),
            (None, None, "", Vec::new()),
        ];

        for (min, max, expected_where, expected_params) in cases {
            let mut values = FilterValueState::default();
            values.insert("c-carga-min", FilterValue::Range { min, max });

            let query =
                build_query(&schema, &visible(&["nome"]), &values).expect("query should build");

            assert_eq!(query.where_sql, expected_where);
            assert_eq!(query.parameters, expected_params);
        }
    }

    #[test]
    fn placeholders_and_parameters_stay_aligned() {
        let schema = courses();
        let mut values = FilterValueState::default();
        values.insert("c-uf", FilterValue::Categorical(set(&["BA", "PE"])));
        values.insert("c-nivel", FilterValue::Categorical(set(&["MESTRADO"])));
        values.insert("c-nome", FilterValue::Text("Direito".to_string()));
        values.insert(
            "c-carga-min",
            FilterValue::Range {
                min: Some(1.0),
                max: Some(9.0),
            },
        );

        let query = build_query(&schema, &visible(&["nome"]), &values).expect("query should build");

        assert_eq!(query.placeholder_count(), query.parameters.len());
        assert_eq!(
            query.parameters,
            vec![
                text("BA"),
                text("PE"),
                text("%MESTRADO%"),
                text("%Direito%"),
                SqlParam::Number(1.0),
                SqlParam::Number(9.0),
            ]
        );
    }

    #[test]
    fn building_twice_is_identical() {
        let registry = SchemaRegistry::builtin().expect("builtin catalog should validate");
        let schema = registry.get_schema("pos").expect("pos exists");
        let mut values = FilterValueState::default();
        values.insert(
            "pos-nivel",
            FilterValue::Categorical(set(&["MESTRADO", "DOUTORADO"])),
        );
        values.insert("pos-uf", FilterValue::Categorical(set(&["PR", "SC"])));
        let columns = visible(&["nome_programa", "sigla_ies"]);

        let first = build_query(schema, &columns, &values).expect("query should build");
        let second = build_query(schema, &columns, &values).expect("query should build");

        assert_eq!(first.sql(), second.sql());
        assert_eq!(first.parameters, second.parameters);
    }

    #[test]
    fn empty_projection_falls_back_to_all_columns() {
        let schema = courses();

        let query =
            build_query(&schema, &[], &FilterValueState::default()).expect("query should build");

        assert_eq!(query.select_columns, schema.column_ids());
    }

    #[test]
    fn filter_on_undeclared_column_is_rejected() {
        let mut schema = courses();
        schema.filters.push(FilterDescriptor::FreeText {
            id: "c-regiao",
            column: "regiao",
            label: "Região",
            placeholder: "",
        });

        let err = build_query(&schema, &visible(&["nome"]), &FilterValueState::default())
            .expect_err("unknown column should fail");

        assert!(matches!(err, BrowserError::SchemaColumnMismatch { column, .. } if column == "regiao"));
    }
}
