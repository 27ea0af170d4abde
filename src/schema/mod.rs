//! Schema metadata: type classification, the in-memory model and the live catalog.

mod catalog;
mod classify;
mod model;
pub(crate) mod sql;

pub use catalog::{
    describe_table, list_tables, list_user_types, list_views, reference_values,
    reference_values_sql, type_registry,
};
pub use classify::{classify, is_valid_type_expression, TypeCategory, TypeRegistry};
pub use model::{
    ColumnMetadata, CompositeField, ConstraintInfo, ConstraintKind, FkAction, ForeignKey,
    ReferenceValue, TableMetadata, UserType, ViewInfo,
};

use thiserror::Error;

use crate::db::DbError;

/// Failure to read schema metadata.
///
/// Callers treat any of these as "no usable metadata"; partial results are never returned.
#[derive(Error, Debug)]
pub enum IntrospectionError {
    #[error("Failed to read schema metadata: {0}")]
    Query(#[from] DbError),

    #[error("Table '{schema}.{table}' does not exist")]
    NoSuchTable { schema: String, table: String },

    #[error("Table '{table}' has no column '{column}'")]
    NoSuchColumn { table: String, column: String },

    #[error("Table '{table}' has no single-column primary key")]
    NoSingleColumnKey { table: String },

    #[error("Unexpected catalog data: {message}")]
    Malformed { message: String },
}
