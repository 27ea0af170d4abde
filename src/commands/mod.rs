//! Command definitions and implementations.
//!
//! Each command is defined in its own module with:
//! - The command struct with clap attributes for CLI parsing
//! - An `Execute` impl that talks to the connection and builds a result
//! - An `Outputable` impl that renders the result as a table

mod alter;
mod describe;
mod query;
mod refs;
mod tables;
mod types;
mod view;
mod views;

pub use alter::AlterCmd;
pub use describe::DescribeCmd;
pub use query::QueryCmd;
pub use refs::RefsCmd;
pub use tables::TablesCmd;
pub use types::TypesCmd;
pub use view::{ViewAction, ViewCmd};
pub use views::ViewsCmd;

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::db::Connection;
use crate::output::{OutputFormat, Outputable};

/// Trait for executing commands with command-specific result types.
pub trait Execute {
    type Output: Outputable;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>>;
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List tables in the schema
    Tables(TablesCmd),

    /// Show columns, keys and constraints of a table
    Describe(DescribeCmd),

    /// List user-defined enum and composite types
    Types(TypesCmd),

    /// List views and materialized views
    Views(ViewsCmd),

    /// Show key/label pairs of a table for picking foreign key values
    Refs(RefsCmd),

    /// Render (and run) a SELECT from a JSON query descriptor
    Query(QueryCmd),

    /// Apply a structural change from a JSON change descriptor
    Alter(AlterCmd),

    /// Create, refresh or drop views, or run a query as a CTE
    View(ViewCmd),

    /// Catch-all for unknown commands
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

impl Command {
    /// Execute the command and return formatted output
    pub fn run(self, conn: &mut dyn Connection, schema: &str, format: OutputFormat) -> Result<String, Box<dyn Error>> {
        match self {
            Command::Tables(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::Describe(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::Types(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::Views(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::Refs(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::Query(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::Alter(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::View(cmd) => {
                let result = cmd.execute(conn, schema)?;
                Ok(result.format(format))
            }
            Command::Unknown(args) => {
                Err(format!("Unknown command: {}", args.first().unwrap_or(&String::new())).into())
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Failed to read descriptor file '{path}': {message}")]
    FileReadFailed { path: String, message: String },

    #[error("Invalid descriptor in '{path}': {message}")]
    JsonParseFailed { path: String, message: String },
}

pub(crate) fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);
    if path.exists() {
        Ok(path)
    } else {
        Err(format!("File not found: {}", path.display()))
    }
}

/// Read a JSON query or change descriptor.
pub(crate) fn read_descriptor<T: DeserializeOwned>(path: &Path) -> Result<T, DescriptorError> {
    let content = fs::read_to_string(path).map_err(|e| DescriptorError::FileReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| DescriptorError::JsonParseFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
