use anyhow::{Context, Result};
use rusqlite::types::{Value, ValueRef};
use rusqlite::Connection;

use crate::domain::entities::result::{CellValue, ResultRow};
use crate::usecase::ports::engine::SqlParam;

fn to_sql_value(param: &SqlParam) -> Value {
    match param {
        SqlParam::Text(text) => Value::Text(text.clone()),
        SqlParam::Number(number) => Value::Real(*number),
    }
}

fn to_cell(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => CellValue::Null,
        ValueRef::Integer(number) => CellValue::Integer(number),
        ValueRef::Real(number) => CellValue::Real(number),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}

/// Runs one statement and collects every row keyed by output column name.
/// The statement is dropped before returning on every path.
pub fn run_query(conn: &Connection, sql: &str, params: &[SqlParam]) -> Result<Vec<ResultRow>> {
    let mut stmt = conn
        .prepare(sql)
        .with_context(|| format!("failed to prepare query: {sql}"))?;
    let names = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter().map(to_sql_value)))
        .context("failed to run query")?;

    let mut out = Vec::new();
    while let Some(row) = rows.next().context("failed to read row")? {
        let mut fields = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let value = row
                .get_ref(idx)
                .with_context(|| format!("failed to read column {name}"))?;
            fields.push((name.clone(), to_cell(value)));
        }
        out.push(ResultRow::new(fields));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Connection {
        let conn = Connection::open_in_memory().expect("should open memory db");
        conn.execute_batch(
            "CREATE TABLE pos (uf TEXT, nota INTEGER, peso REAL, link TEXT);
             INSERT INTO pos VALUES ('SP', 5, 1.5, NULL);
             INSERT INTO pos VALUES ('RJ', 7, NULL, 'https://example.org');",
        )
        .expect("should seed db");
        conn
    }

    #[test]
    fn rows_keep_column_names_and_types() {
        let conn = fixture();

        let rows = run_query(
            &conn,
            "SELECT uf, nota, peso, link FROM pos WHERE nota >= ? ORDER BY uf",
            &[SqlParam::Number(5.0)],
        )
        .expect("query should succeed");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("uf"), Some(&CellValue::Text("RJ".to_string())));
        assert_eq!(rows[0].get("nota"), Some(&CellValue::Integer(7)));
        assert_eq!(rows[0].get("peso"), Some(&CellValue::Null));
        assert_eq!(rows[1].get("peso"), Some(&CellValue::Real(1.5)));
    }

    #[test]
    fn text_parameters_bind_in_order() {
        let conn = fixture();

        let rows = run_query(
            &conn,
            "SELECT uf FROM pos WHERE uf LIKE ? OR uf LIKE ?",
            &[SqlParam::Text("%S%".to_string()), SqlParam::Text("%X%".to_string())],
        )
        .expect("query should succeed");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("uf"), Some(&CellValue::Text("SP".to_string())));
    }

    #[test]
    fn bad_sql_is_an_error() {
        let conn = fixture();

        assert!(run_query(&conn, "SELECT missing FROM pos", &[]).is_err());
    }
}
