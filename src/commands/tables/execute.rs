use std::error::Error;

use serde::Serialize;

use super::TablesCmd;
use crate::commands::Execute;
use crate::db::Connection;
use crate::schema::list_tables;

/// Result of the tables command execution
#[derive(Debug, Serialize)]
pub struct TablesResult {
    pub schema: String,
    pub tables: Vec<String>,
}

impl Execute for TablesCmd {
    type Output = TablesResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        Ok(TablesResult {
            schema: schema.to_string(),
            tables: list_tables(conn, schema)?,
        })
    }
}
