//! Output formatting for refs command results.

use serde_json::json;

use super::execute::RefsResult;
use crate::db::RowSet;
use crate::output::{format_grid, Outputable};

impl Outputable for RefsResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("Reference values of '{}'", self.table), String::new()];

        if self.values.is_empty() {
            lines.push("No rows found.".to_string());
            return lines.join("\n");
        }

        let mut rows = RowSet::new(&["key", "label"]);
        for value in &self.values {
            rows = rows.with_row(vec![json!(value.key), json!(value.label)]);
        }
        lines.extend(format_grid(&rows));
        lines.join("\n")
    }
}
