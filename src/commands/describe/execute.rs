use std::error::Error;

use serde::Serialize;

use super::DescribeCmd;
use crate::commands::Execute;
use crate::db::Connection;
use crate::schema::{describe_table, TableMetadata};

/// Result of the describe command execution
#[derive(Debug, Serialize)]
pub struct DescribeResult {
    #[serde(flatten)]
    pub table: TableMetadata,
}

impl Execute for DescribeCmd {
    type Output = DescribeResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        Ok(DescribeResult {
            table: describe_table(conn, schema, &self.table)?,
        })
    }
}
