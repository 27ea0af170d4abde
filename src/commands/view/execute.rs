use std::error::Error;

use serde::Serialize;
use tracing::debug;

use super::{ViewAction, ViewCmd};
use crate::commands::{read_descriptor, Execute};
use crate::db::{Connection, RowSet};
use crate::queries::{create_view, drop_view, refresh_materialized_view, Assembler, QuerySpec};

/// Result of the view command execution
#[derive(Debug, Serialize)]
pub struct ViewResult {
    pub action: String,
    pub name: String,
    pub statement: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    /// Rows of a CTE query; `None` for DDL actions and rendered-only CTEs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<RowSet>,
}

impl ViewResult {
    fn ddl(action: &str, name: String, statement: String) -> Self {
        Self {
            action: action.to_string(),
            name,
            statement,
            params: Vec::new(),
            rows: None,
        }
    }
}

impl Execute for ViewCmd {
    type Output = ViewResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        match self.action {
            ViewAction::Create { name, spec, materialized } => {
                let spec: QuerySpec = read_descriptor(&spec)?;
                let statement = create_view(conn, schema, &spec, &name, materialized)?;
                let action = if materialized { "create_materialized_view" } else { "create_view" };
                Ok(ViewResult::ddl(action, name, statement))
            }
            ViewAction::Refresh { name } => {
                let statement = refresh_materialized_view(conn, schema, &name)?;
                Ok(ViewResult::ddl("refresh_materialized_view", name, statement))
            }
            ViewAction::Drop { name, materialized, cascade } => {
                let statement = drop_view(conn, schema, &name, materialized, cascade)?;
                let action = if materialized { "drop_materialized_view" } else { "drop_view" };
                Ok(ViewResult::ddl(action, name, statement))
            }
            ViewAction::Cte { name, spec, sql_only } => {
                let spec: QuerySpec = read_descriptor(&spec)?;
                let rendered = Assembler::load(conn, schema, &spec)?.render_cte(&spec, &name)?;
                let rows = if sql_only {
                    None
                } else {
                    debug!(sql = %rendered.sql, params = rendered.params.len(), "Running CTE query");
                    Some(conn.query(&rendered.sql, &rendered.params)?)
                };
                Ok(ViewResult {
                    action: "cte".to_string(),
                    name,
                    statement: rendered.sql,
                    params: rendered.params,
                    rows,
                })
            }
        }
    }
}
