use std::error::Error;

use serde::Serialize;

use super::QueryCmd;
use crate::commands::{read_descriptor, Execute};
use crate::db::{Connection, RowSet};
use crate::queries::{run_query, Assembler, QuerySpec};

/// Result of the query command execution
#[derive(Debug, Serialize)]
pub struct QueryResult {
    pub sql: String,
    pub params: Vec<String>,
    /// `None` when only rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<RowSet>,
}

impl Execute for QueryCmd {
    type Output = QueryResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        let spec: QuerySpec = read_descriptor(&self.spec)?;

        if self.sql_only {
            let rendered = Assembler::load(conn, schema, &spec)?.render(&spec)?;
            return Ok(QueryResult {
                sql: rendered.sql,
                params: rendered.params,
                rows: None,
            });
        }

        let (rendered, rows) = run_query(conn, schema, &spec)?;
        Ok(QueryResult {
            sql: rendered.sql,
            params: rendered.params,
            rows: Some(rows),
        })
    }
}
