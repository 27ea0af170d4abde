//! Output formatting for alter command results.

use super::execute::AlterResult;
use crate::output::Outputable;

impl Outputable for AlterResult {
    fn to_table(&self) -> String {
        let header = if self.applied {
            format!("Applied {}:", self.change)
        } else {
            format!("Planned {} (dry run, nothing applied):", self.change)
        };
        format!("{header}\n  {}", self.statement)
    }
}
