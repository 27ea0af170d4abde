//! Persisting assembled queries as views, materialized views and CTEs.

use tracing::info;

use super::assembler::{Assembler, RenderedQuery};
use super::spec::QuerySpec;
use super::{BuildError, QueryError};
use crate::db::{in_transaction, quote_ident, quote_qualified, Connection};

impl Assembler {
    /// `CREATE [MATERIALIZED] VIEW` around the rendered SELECT.
    ///
    /// View bodies are stored by the server, so every filter must be inline.
    pub fn render_as_view(&self, spec: &QuerySpec, name: &str, materialized: bool) -> Result<String, BuildError> {
        check_name(name, "view")?;
        let rendered = self.render(spec)?;
        if !rendered.params.is_empty() {
            return Err(BuildError::BoundParamsInView);
        }
        let target = quote_qualified(self.schema(), name);
        Ok(if materialized {
            format!("CREATE MATERIALIZED VIEW IF NOT EXISTS {} AS {};", target, rendered.sql)
        } else {
            format!("CREATE OR REPLACE VIEW {} AS {};", target, rendered.sql)
        })
    }

    /// `WITH name AS (...) SELECT * FROM name`. Bound parameters carry over.
    pub fn render_cte(&self, spec: &QuerySpec, name: &str) -> Result<RenderedQuery, BuildError> {
        check_name(name, "common table expression")?;
        let rendered = self.render(spec)?;
        let alias = quote_ident(name);
        Ok(RenderedQuery {
            sql: format!("WITH {alias} AS ({}) SELECT * FROM {alias}", rendered.sql),
            params: rendered.params,
        })
    }
}

pub fn refresh_materialized_view_sql(schema: &str, name: &str) -> String {
    format!("REFRESH MATERIALIZED VIEW {};", quote_qualified(schema, name))
}

pub fn drop_view_sql(schema: &str, name: &str, materialized: bool, cascade: bool) -> String {
    format!(
        "DROP {}VIEW IF EXISTS {}{};",
        if materialized { "MATERIALIZED " } else { "" },
        quote_qualified(schema, name),
        if cascade { " CASCADE" } else { "" }
    )
}

/// Render `spec` as a view named `name` and create it in one transaction.
pub fn create_view(
    conn: &mut dyn Connection,
    schema: &str,
    spec: &QuerySpec,
    name: &str,
    materialized: bool,
) -> Result<String, QueryError> {
    let assembler = Assembler::load(conn, schema, spec)?;
    let statement = assembler.render_as_view(spec, name, materialized)?;
    run_view_statement(conn, &statement)?;
    info!(view = name, materialized, "Created view");
    Ok(statement)
}

pub fn refresh_materialized_view(conn: &mut dyn Connection, schema: &str, name: &str) -> Result<String, QueryError> {
    check_name(name, "view")?;
    let statement = refresh_materialized_view_sql(schema, name);
    run_view_statement(conn, &statement)?;
    info!(view = name, "Refreshed materialized view");
    Ok(statement)
}

pub fn drop_view(
    conn: &mut dyn Connection,
    schema: &str,
    name: &str,
    materialized: bool,
    cascade: bool,
) -> Result<String, QueryError> {
    check_name(name, "view")?;
    let statement = drop_view_sql(schema, name, materialized, cascade);
    run_view_statement(conn, &statement)?;
    info!(view = name, materialized, cascade, "Dropped view");
    Ok(statement)
}

fn run_view_statement(conn: &mut dyn Connection, statement: &str) -> Result<(), QueryError> {
    in_transaction(conn, |tx| tx.batch(statement))?;
    Ok(())
}

fn check_name(name: &str, what: &str) -> Result<(), BuildError> {
    if name.trim().is_empty() {
        return Err(BuildError::InvalidParameter {
            context: what.to_string(),
            reason: "name cannot be empty".to_string(),
        });
    }
    Ok(())
}
