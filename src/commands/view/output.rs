//! Output formatting for view command results.

use super::execute::ViewResult;
use crate::output::{format_grid, Outputable};

impl Outputable for ViewResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("{} '{}':", self.action.replace('_', " "), self.name)];
        lines.push(format!("  {}", self.statement));

        if let Some(rows) = &self.rows {
            lines.push(String::new());
            lines.extend(format_grid(rows));
            let noun = if rows.len() == 1 { "row" } else { "rows" };
            lines.push(format!("({} {noun})", rows.len()));
        }

        lines.join("\n")
    }
}
