//! The execution context threaded through catalog, assembler and mutator calls.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::DbError;

pub(crate) const SERVER_VERSION_SQL: &str = "SELECT current_setting('server_version_num') AS server_version_num";

/// Rows returned by a query, with column names in select-list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row (builder style, used by fakes and tests).
    pub fn with_row(mut self, row: Vec<Value>) -> Self {
        self.rows.push(row);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            columns: &self.columns,
            values,
        })
    }
}

/// Borrowed view of one row, with typed accessors by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, name: &str) -> Result<&'a Value, DbError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| DbError::MissingColumn {
                name: name.to_string(),
            })
    }

    pub fn opt_string(&self, name: &str) -> Result<Option<String>, DbError> {
        match self.get(name)? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            Value::Bool(b) => Ok(Some(b.to_string())),
            other => Ok(Some(other.to_string())),
        }
    }

    pub fn string(&self, name: &str) -> Result<String, DbError> {
        self.opt_string(name)?.ok_or_else(|| DbError::MalformedRow {
            message: format!("column '{name}' is NULL"),
        })
    }

    pub fn bool(&self, name: &str) -> Result<bool, DbError> {
        match self.get(name)? {
            Value::Bool(b) => Ok(*b),
            other => Err(DbError::MalformedRow {
                message: format!("column '{name}' is not boolean: {other}"),
            }),
        }
    }

    pub fn opt_i64(&self, name: &str) -> Result<Option<i64>, DbError> {
        match self.get(name)? {
            Value::Null => Ok(None),
            Value::Number(n) => n.as_i64().map(Some).ok_or_else(|| DbError::MalformedRow {
                message: format!("column '{name}' is not an integer: {n}"),
            }),
            Value::String(s) => s.parse().map(Some).map_err(|_| DbError::MalformedRow {
                message: format!("column '{name}' is not an integer: {s}"),
            }),
            other => Err(DbError::MalformedRow {
                message: format!("column '{name}' is not an integer: {other}"),
            }),
        }
    }

    /// Read a text[] column; NULL reads as empty.
    pub fn string_list(&self, name: &str) -> Result<Vec<String>, DbError> {
        match self.get(name)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    other => Err(DbError::MalformedRow {
                        message: format!("column '{name}' holds a non-text element: {other}"),
                    }),
                })
                .collect(),
            other => Err(DbError::MalformedRow {
                message: format!("column '{name}' is not an array: {other}"),
            }),
        }
    }
}

/// A single live connection. One caller at a time, blocking.
///
/// Bound parameters are passed as text; statements that compare them against
/// non-text columns cast them explicitly.
pub trait Connection {
    /// Get the backend name for logging/debugging.
    fn backend_name(&self) -> &'static str;

    /// Run a row-returning statement.
    fn query(&mut self, sql: &str, params: &[String]) -> Result<RowSet, DbError>;

    /// Run a statement and report the number of affected rows.
    fn execute(&mut self, sql: &str, params: &[String]) -> Result<u64, DbError>;

    /// Run parameterless statement text through the simple protocol.
    fn batch(&mut self, sql: &str) -> Result<(), DbError>;

    fn query_no_params(&mut self, sql: &str) -> Result<RowSet, DbError> {
        self.query(sql, &[])
    }

    fn begin(&mut self) -> Result<(), DbError> {
        self.batch("BEGIN")
    }

    fn commit(&mut self) -> Result<(), DbError> {
        self.batch("COMMIT")
    }

    fn rollback(&mut self) -> Result<(), DbError> {
        self.batch("ROLLBACK")
    }

    /// Server version as reported by `server_version_num` (e.g. 150004).
    fn server_version_num(&mut self) -> Result<u32, DbError> {
        let rows = self.query_no_params(SERVER_VERSION_SQL)?;
        let row = rows.iter().next().ok_or_else(|| DbError::MalformedRow {
            message: "server_version_num returned no rows".to_string(),
        })?;
        let raw = row.string("server_version_num")?;
        raw.trim().parse().map_err(|_| DbError::MalformedRow {
            message: format!("unparseable server_version_num '{raw}'"),
        })
    }
}

/// Run `body` between BEGIN and COMMIT, rolling back if it fails.
///
/// The error from `body` is returned even when the rollback itself fails.
pub fn in_transaction<T>(
    conn: &mut dyn Connection,
    body: impl FnOnce(&mut dyn Connection) -> Result<T, DbError>,
) -> Result<T, DbError> {
    conn.begin()?;
    match body(&mut *conn) {
        Ok(value) => {
            conn.commit()?;
            debug!(backend = conn.backend_name(), "transaction committed");
            Ok(value)
        }
        Err(err) => {
            warn!(kind = ?err.kind(), "statement failed, rolling back");
            if let Err(rollback_err) = conn.rollback() {
                warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbErrorKind;
    use crate::test_utils::MockConnection;
    use rstest::rstest;
    use serde_json::json;

    fn sample() -> RowSet {
        RowSet::new(&["name", "nullable", "max_length", "labels"])
            .with_row(vec![json!("comfort"), json!(true), json!(null), json!(["standard", "lux"])])
            .with_row(vec![json!("id"), json!(false), json!(8), json!(null)])
    }

    #[rstest]
    fn test_row_accessors() {
        let rows = sample();
        let first = rows.iter().next().unwrap();
        assert_eq!(first.string("name").unwrap(), "comfort");
        assert!(first.bool("nullable").unwrap());
        assert_eq!(first.opt_i64("max_length").unwrap(), None);
        assert_eq!(first.string_list("labels").unwrap(), vec!["standard", "lux"]);

        let second = rows.iter().nth(1).unwrap();
        assert_eq!(second.opt_i64("max_length").unwrap(), Some(8));
        assert!(second.string_list("labels").unwrap().is_empty());
    }

    #[rstest]
    fn test_missing_column_is_reported() {
        let rows = sample();
        let first = rows.iter().next().unwrap();
        let err = first.string("nope").unwrap_err();
        assert!(matches!(err, DbError::MissingColumn { ref name } if name == "nope"));
    }

    #[rstest]
    fn test_wrong_type_is_malformed() {
        let rows = sample();
        let first = rows.iter().next().unwrap();
        assert!(matches!(first.bool("name"), Err(DbError::MalformedRow { .. })));
    }

    #[rstest]
    fn test_server_version_num() {
        let mut conn = MockConnection::new().with_server_version(150004);
        assert_eq!(conn.server_version_num().unwrap(), 150004);
    }

    #[rstest]
    fn test_in_transaction_commits() {
        let mut conn = MockConnection::new();
        in_transaction(&mut conn, |c| c.batch("ALTER TABLE rooms ADD COLUMN x integer;")).unwrap();
        assert_eq!(
            conn.statements(),
            vec!["BEGIN", "ALTER TABLE rooms ADD COLUMN x integer;", "COMMIT"]
        );
    }

    #[rstest]
    fn test_in_transaction_rolls_back() {
        let mut conn = MockConnection::new().fail_on(
            "ALTER TABLE rooms ADD COLUMN x integer;",
            DbErrorKind::UniqueViolation,
        );
        let err = in_transaction(&mut conn, |c| c.batch("ALTER TABLE rooms ADD COLUMN x integer;"))
            .unwrap_err();
        assert_eq!(err.kind(), DbErrorKind::UniqueViolation);
        assert_eq!(
            conn.statements(),
            vec!["BEGIN", "ALTER TABLE rooms ADD COLUMN x integer;", "ROLLBACK"]
        );
    }
}
