//! Output formatting for tables command results.

use super::execute::TablesResult;
use crate::output::Outputable;

impl Outputable for TablesResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("Tables in schema '{}'", self.schema), String::new()];

        if self.tables.is_empty() {
            lines.push("No tables found.".to_string());
        } else {
            lines.push(format!("Found {} table(s):", self.tables.len()));
            lines.extend(self.tables.iter().map(|t| format!("  {t}")));
        }

        lines.join("\n")
    }
}
