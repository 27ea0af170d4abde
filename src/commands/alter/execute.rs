use std::error::Error;

use serde::Serialize;

use super::AlterCmd;
use crate::commands::{read_descriptor, Execute};
use crate::db::Connection;
use crate::ddl::{ChangeSpec, Mutator};

/// Result of the alter command execution
#[derive(Debug, Serialize)]
pub struct AlterResult {
    pub change: String,
    pub statement: String,
    pub applied: bool,
}

impl Execute for AlterCmd {
    type Output = AlterResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        let change: ChangeSpec = read_descriptor(&self.spec)?;
        let mut mutator = Mutator::new(conn, schema);

        let statement = if self.dry_run {
            mutator.plan(&change)?
        } else {
            mutator.apply(&change)?
        };

        Ok(AlterResult {
            change: change.kind().to_string(),
            statement,
            applied: !self.dry_run,
        })
    }
}
