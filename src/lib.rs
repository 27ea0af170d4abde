//! pgdesk library - schema administration core for PostgreSQL
//!
//! Reads table and type metadata from the catalog, turns declarative query and
//! change descriptors into SQL, and applies structural changes one
//! transaction at a time. The `pgdesk` binary wires these into subcommands.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod ddl;
pub mod logging;
pub mod output;
pub mod queries;
pub mod schema;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
