//! Output formatting for types command results.

use super::execute::TypesResult;
use crate::output::Outputable;
use crate::schema::UserType;

impl Outputable for TypesResult {
    fn to_table(&self) -> String {
        let mut lines = vec![format!("User types in schema '{}'", self.schema), String::new()];

        if self.types.is_empty() {
            lines.push("No user types found.".to_string());
            return lines.join("\n");
        }

        lines.push(format!("Found {} type(s):", self.types.len()));
        for user_type in &self.types {
            match user_type {
                UserType::Enum { name, labels } => {
                    lines.push(format!("  {name} (enum): {}", labels.join(", ")));
                }
                UserType::Composite { name, fields } => {
                    let fields: Vec<String> = fields
                        .iter()
                        .map(|f| format!("{} {}", f.name, f.type_expression))
                        .collect();
                    lines.push(format!("  {name} (composite): {}", fields.join(", ")));
                }
            }
        }

        lines.join("\n")
    }
}
