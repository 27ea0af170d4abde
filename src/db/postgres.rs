//! PostgreSQL implementation of [`Connection`] over the blocking `postgres` client.
//!
//! Result rows are read generically: the statement is prepared once to learn
//! its column names, then wrapped as `SELECT row_to_json(q)::text FROM (...) AS
//! q(c0, c1, ...)` so every value arrives as JSON regardless of its SQL type.
//! Positional aliases keep duplicate or odd column names from colliding.

use postgres::types::ToSql;
use postgres::{Client, NoTls};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::connection::{Connection, RowSet};
use super::errors::translate;
use super::DbError;

pub struct PgConnection {
    client: Client,
}

impl PgConnection {
    /// Open a connection.
    ///
    /// `target` is a redacted description used only in error messages.
    pub fn connect(connection_string: &str, target: &str) -> Result<Self, DbError> {
        let client = Client::connect(connection_string, NoTls).map_err(|e| DbError::ConnectFailed {
            target: target.to_string(),
            message: e.to_string(),
        })?;
        info!(server = target, "connected to PostgreSQL");
        Ok(Self { client })
    }

    fn bind(params: &[String]) -> Vec<&(dyn ToSql + Sync)> {
        params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
    }
}

fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

fn decode_row(text: &str, width: usize) -> Result<Vec<Value>, DbError> {
    let mut object: Map<String, Value> =
        serde_json::from_str(text).map_err(|e| DbError::MalformedRow {
            message: format!("row is not a JSON object: {e}"),
        })?;
    Ok((0..width)
        .map(|idx| object.remove(&format!("c{idx}")).unwrap_or(Value::Null))
        .collect())
}

impl Connection for PgConnection {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    fn query(&mut self, sql: &str, params: &[String]) -> Result<RowSet, DbError> {
        let inner = strip_terminator(sql);
        debug!(sql = inner, params = params.len(), "query");

        let prepared = self.client.prepare(inner).map_err(|e| translate(&e, sql))?;
        let columns: Vec<String> = prepared.columns().iter().map(|c| c.name().to_string()).collect();
        if columns.is_empty() {
            self.client
                .execute(&prepared, &Self::bind(params))
                .map_err(|e| translate(&e, sql))?;
            return Ok(RowSet::default());
        }

        let aliases: Vec<String> = (0..columns.len()).map(|idx| format!("c{idx}")).collect();
        let wrapped = format!(
            "SELECT row_to_json(q)::text FROM ({inner}) AS q({})",
            aliases.join(", ")
        );
        let rows = self
            .client
            .query(wrapped.as_str(), &Self::bind(params))
            .map_err(|e| translate(&e, sql))?;

        let mut result = RowSet {
            columns,
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            let text: String = row.try_get(0).map_err(|e| translate(&e, sql))?;
            result.rows.push(decode_row(&text, result.columns.len())?);
        }
        Ok(result)
    }

    fn execute(&mut self, sql: &str, params: &[String]) -> Result<u64, DbError> {
        debug!(sql = sql, params = params.len(), "execute");
        self.client
            .execute(sql, &Self::bind(params))
            .map_err(|e| translate(&e, sql))
    }

    fn batch(&mut self, sql: &str) -> Result<(), DbError> {
        debug!(sql = sql, "batch");
        self.client.batch_execute(sql).map_err(|e| translate(&e, sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("SELECT 1;", "SELECT 1")]
    #[case("  SELECT 1 ;  ", "SELECT 1")]
    #[case("SELECT 1", "SELECT 1")]
    fn test_strip_terminator(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_terminator(input), expected);
    }

    #[rstest]
    fn test_decode_row_orders_by_alias() {
        let row = decode_row(r#"{"c1": "lux", "c0": 3, "c2": null}"#, 3).unwrap();
        assert_eq!(row, vec![json!(3), json!("lux"), Value::Null]);
    }

    #[rstest]
    fn test_decode_row_rejects_non_object() {
        assert!(matches!(decode_row("[1,2]", 2), Err(DbError::MalformedRow { .. })));
    }
}
