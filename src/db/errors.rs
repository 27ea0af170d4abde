//! Translation of driver failures into stable, categorised errors.

use serde::Serialize;

use super::DbError;

/// Category of a database-engine failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DbErrorKind {
    UniqueViolation,
    NotNullViolation,
    CheckViolation,
    ForeignKeyViolation,
    TypeMismatch,
    ValueOutOfRange,
    StringTooLong,
    ConnectionFailure,
    Other,
}

impl DbErrorKind {
    /// Classify a five-character SQLSTATE code.
    pub fn from_sqlstate(code: &str) -> Self {
        match code {
            "23505" => Self::UniqueViolation,
            "23502" => Self::NotNullViolation,
            "23514" => Self::CheckViolation,
            "23503" => Self::ForeignKeyViolation,
            "42804" | "22P02" | "22007" | "22008" | "42883" => Self::TypeMismatch,
            "22003" => Self::ValueOutOfRange,
            "22001" => Self::StringTooLong,
            c if c.starts_with("08") || c.starts_with("57P") => Self::ConnectionFailure,
            _ => Self::Other,
        }
    }

    /// Human-readable message shown instead of the raw driver text.
    pub fn message(self) -> &'static str {
        match self {
            Self::UniqueViolation => "A row with the same unique value already exists",
            Self::NotNullViolation => "A required column was left empty",
            Self::CheckViolation => "A value does not satisfy a check constraint",
            Self::ForeignKeyViolation => {
                "A referenced row is missing or is still referenced by another table"
            }
            Self::TypeMismatch => "A value does not match the column's data type",
            Self::ValueOutOfRange => "A numeric value is out of range for its column",
            Self::StringTooLong => "A text value is longer than the column allows",
            Self::ConnectionFailure => "The connection to the database was lost",
            Self::Other => "The database rejected the statement",
        }
    }
}

impl DbError {
    /// Build an execution error of the given kind for `statement`.
    pub fn execution(kind: DbErrorKind, statement: &str, detail: impl Into<String>) -> Self {
        DbError::Execution {
            kind,
            message: kind.message().to_string(),
            statement: statement.to_string(),
            detail: detail.into(),
        }
    }

    /// The failure category, for callers that branch on it.
    pub fn kind(&self) -> DbErrorKind {
        match self {
            DbError::ConnectFailed { .. } => DbErrorKind::ConnectionFailure,
            DbError::Execution { kind, .. } => *kind,
            DbError::MissingColumn { .. } | DbError::MalformedRow { .. } => DbErrorKind::Other,
        }
    }
}

/// Translate a `postgres` client error raised while running `statement`.
pub fn translate(err: &postgres::Error, statement: &str) -> DbError {
    if err.is_closed() {
        return DbError::execution(DbErrorKind::ConnectionFailure, statement, err.to_string());
    }
    match err.as_db_error() {
        Some(db) => {
            let kind = DbErrorKind::from_sqlstate(db.code().code());
            let detail = match db.detail() {
                Some(extra) => format!("{}: {}", db.message(), extra),
                None => db.message().to_string(),
            };
            DbError::execution(kind, statement, detail)
        }
        None => DbError::execution(DbErrorKind::Other, statement, err.to_string()),
    }
}
