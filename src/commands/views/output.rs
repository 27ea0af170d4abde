//! Output formatting for views command results.

use super::execute::ViewsResult;
use crate::output::Outputable;

impl Outputable for ViewsResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("Views in schema '{}'", self.schema), String::new()];

        if self.views.is_empty() {
            lines.push("No views found.".to_string());
            return lines.join("\n");
        }

        lines.push(format!("Found {} view(s):", self.views.len()));
        for view in &self.views {
            let kind = if view.materialized { "materialized view" } else { "view" };
            lines.push(format!("  {} ({kind})", view.name));
            if self.show_definitions {
                lines.extend(view.definition.trim().lines().map(|l| format!("      {}", l.trim_end())));
            }
        }

        lines.join("\n")
    }
}
