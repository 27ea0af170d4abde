use std::error::Error;

use serde::Serialize;

use super::RefsCmd;
use crate::commands::Execute;
use crate::db::Connection;
use crate::schema::{reference_values, ReferenceValue};

/// Result of the refs command execution
#[derive(Debug, Serialize)]
pub struct RefsResult {
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_column: Option<String>,
    pub values: Vec<ReferenceValue>,
}

impl Execute for RefsCmd {
    type Output = RefsResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        let values = reference_values(conn, schema, &self.table, self.label.as_deref(), self.limit)?;
        Ok(RefsResult {
            table: self.table,
            label_column: self.label,
            values,
        })
    }
}
