//! Applying structural changes against a live connection.

use tracing::{debug, info};

use super::render::{render_change, ChangeContext};
use super::{ChangeSpec, MutationError};
use crate::db::{in_transaction, Connection};
use crate::schema::{describe_table, type_registry};

/// First server version whose `ALTER TYPE` accepts `DROP VALUE`.
///
/// No released server supports removing enum labels yet, so every version
/// is rejected.
pub const MIN_DROP_ENUM_VALUE_VERSION: u32 = u32::MAX;

/// Plans and applies [`ChangeSpec`]s, one transaction per change.
pub struct Mutator<'a> {
    conn: &'a mut dyn Connection,
    schema: String,
}

impl<'a> Mutator<'a> {
    pub fn new(conn: &'a mut dyn Connection, schema: &str) -> Self {
        Self {
            conn,
            schema: schema.to_string(),
        }
    }

    /// Render `change` without modifying anything.
    ///
    /// Reads the catalog when the change depends on it and checks the server
    /// version for gated operations.
    pub fn plan(&mut self, change: &ChangeSpec) -> Result<String, MutationError> {
        let mut ctx = ChangeContext::default();
        match change {
            ChangeSpec::AddColumn { default: Some(_), .. } => {
                ctx.registry = type_registry(self.conn, &self.schema)?;
            }
            ChangeSpec::AddCheck { table, .. } => {
                ctx.table = Some(describe_table(self.conn, &self.schema, table)?);
            }
            ChangeSpec::DropEnumValue { .. } => {
                let actual = self.conn.server_version_num()?;
                if actual < MIN_DROP_ENUM_VALUE_VERSION {
                    return Err(MutationError::UnsupportedServerVersion {
                        feature: "ALTER TYPE ... DROP VALUE",
                        required: MIN_DROP_ENUM_VALUE_VERSION,
                        actual,
                    });
                }
            }
            _ => {}
        }
        let statement = render_change(change, &self.schema, &ctx)?;
        debug!(change = change.kind(), statement = %statement, "Planned change");
        Ok(statement)
    }

    /// Plan `change` and run it in its own transaction.
    ///
    /// Returns the executed statement. On failure the transaction is rolled
    /// back and the translated database error is returned.
    pub fn apply(&mut self, change: &ChangeSpec) -> Result<String, MutationError> {
        let statement = self.plan(change)?;
        in_transaction(self.conn, |tx| tx.batch(&statement))?;
        info!(change = change.kind(), schema = %self.schema, "Applied change");
        Ok(statement)
    }
}
