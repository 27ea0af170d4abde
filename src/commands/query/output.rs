//! Output formatting for query command results.

use super::execute::QueryResult;
use crate::db::quote_literal;
use crate::output::{format_grid, Outputable};

impl Outputable for QueryResult {
    fn to_table(&self) -> String {
        let mut lines = vec![self.sql.clone()];

        for (index, param) in self.params.iter().enumerate() {
            lines.push(format!("  ${} = {}", index + 1, quote_literal(param)));
        }
        lines.push(String::new());

        match &self.rows {
            None => lines.push("(not executed)".to_string()),
            Some(rows) => {
                lines.extend(format_grid(rows));
                let noun = if rows.len() == 1 { "row" } else { "rows" };
                lines.push(format!("({} {noun})", rows.len()));
            }
        }

        lines.join("\n")
    }
}
