//! Connection plumbing shared by the catalog, assembler and mutator.
//!
//! - [`Connection`]: the execution context passed explicitly to every operation
//! - [`PgConnection`]: the `postgres` driver implementation
//! - [`DatabaseConfig`]: where to connect, resolved from flags, file or env
//! - quoting helpers for identifiers and literals
//! - [`DbError`]: engine failures translated into stable categories

mod config;
mod connection;
mod errors;
mod escape;
mod postgres;

pub use config::{DatabaseConfig, PostgresConfig};
pub use connection::{in_transaction, Connection, Row, RowSet};
#[cfg(test)]
pub(crate) use connection::SERVER_VERSION_SQL;
pub use errors::{translate, DbErrorKind};
pub use escape::{
    escape_literal, quote_ident, quote_literal, quote_qualified, DEFAULT_SCHEMA, MAX_IDENT_LEN,
};
pub use self::postgres::PgConnection;

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to connect to '{target}': {message}")]
    ConnectFailed { target: String, message: String },

    /// A statement failed on the server. `message` is the translated text;
    /// `detail` keeps the driver's own wording for diagnostics.
    #[error("{message}\n  statement: {statement}")]
    Execution {
        kind: DbErrorKind,
        message: String,
        statement: String,
        detail: String,
    },

    #[error("Missing column '{name}' in query result")]
    MissingColumn { name: String },

    #[error("Malformed result row: {message}")]
    MalformedRow { message: String },
}
