//! SELECT assembly from structured query descriptors.
//!
//! The pipeline has three layers:
//!
//! 1. **Description** - [`QuerySpec`] says what to read, filter, group and order
//! 2. **Rendering** - [`Assembler`] turns a [`QuerySpec`] plus table metadata into SQL text
//!    and bound parameters; [`coerce`] decides operator legality and literals
//! 3. **Execution** - [`run_query`] loads metadata, renders and runs the statement
//!
//! Views and CTEs reuse the rendered text, see [`views`].

mod assembler;
pub mod coerce;
mod expressions;
pub mod spec;
pub mod views;

pub use assembler::{Assembler, RenderedQuery};
pub use coerce::{check_operator, coerce, Operator, SqlLiteral};
pub use spec::{
    Aggregate, AggregateFunction, ColumnRef, ComputedExpr, Direction, Expression, Filter, Grouping,
    GroupingMode, HavingPredicate, JoinKind, JoinSpec, Ordering, Projection, QuerySpec, Source,
    StringFunction, SubqueryMode, SubqueryPredicate, AGGREGATE_ALIAS,
};
pub use views::{
    create_view, drop_view, drop_view_sql, refresh_materialized_view, refresh_materialized_view_sql,
};

use thiserror::Error;
use tracing::debug;

use crate::db::{Connection, DbError, RowSet};
use crate::schema::{IntrospectionError, TypeCategory};

/// A descriptor that cannot be turned into SQL.
///
/// Raised before anything is sent to the database.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Operator {operator} is not allowed on {category} columns")]
    InvalidOperatorForType { category: TypeCategory, operator: Operator },

    #[error("'{value}' is not a valid {category} value: {reason}")]
    InvalidLiteral {
        category: TypeCategory,
        value: String,
        reason: String,
    },

    #[error("Missing required parameter '{parameter}' for {context}")]
    MissingParameter { context: String, parameter: String },

    #[error("Invalid parameter for {context}: {reason}")]
    InvalidParameter { context: String, reason: String },

    #[error("Cannot order by '{column}': only grouping columns and agg_value exist under aggregation")]
    InvalidOrderColumn { column: String },

    #[error("Unknown column '{column}'")]
    UnknownColumn { column: String },

    #[error("Unknown table '{table}'")]
    UnknownTable { table: String },

    #[error("Column '{column}' exists in more than one joined table; qualify it as table.column")]
    AmbiguousColumn { column: String },

    #[error("Grouping needs between 1 and 3 columns, got {count}")]
    GroupingColumnCount { count: usize },

    #[error("HAVING requires grouping or an aggregate")]
    HavingWithoutAggregation,

    #[error("Cannot join {left} ({left_category}) with {right} ({right_category})")]
    IncompatibleJoinKeys {
        left: String,
        left_category: TypeCategory,
        right: String,
        right_category: TypeCategory,
    },

    #[error("'{expression}' is not a valid type expression")]
    InvalidTypeExpression { expression: String },

    #[error("{what} list of '{name}' cannot be empty")]
    EmptyTypeDefinition { name: String, what: &'static str },

    #[error("Duplicate {what} '{value}' in '{name}'")]
    DuplicateEntry {
        name: String,
        what: &'static str,
        value: String,
    },

    #[error("View definitions cannot contain bound parameters; render the filter inline")]
    BoundParamsInView,
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Describe every table `spec` reads, render it and run it.
pub fn run_query(conn: &mut dyn Connection, schema: &str, spec: &QuerySpec) -> Result<(RenderedQuery, RowSet), QueryError> {
    let assembler = Assembler::load(conn, schema, spec)?;
    let rendered = assembler.render(spec)?;
    debug!(sql = %rendered.sql, params = rendered.params.len(), "Running assembled query");
    let rows = conn.query(&rendered.sql, &rendered.params)?;
    Ok((rendered, rows))
}
