//! Output formatting for describe command results.

use serde_json::{json, Value};

use super::execute::DescribeResult;
use crate::db::RowSet;
use crate::output::{format_grid, Outputable};
use crate::schema::{ColumnMetadata, ConstraintKind};

impl Outputable for DescribeResult {
    fn to_table(&self) -> String {
        let table = &self.table;
        let mut lines = vec![format!("Table {}.{}", table.schema, table.name), String::new()];

        let mut columns = RowSet::new(&["column", "type", "category", "null", "default", "keys"]);
        for column in &table.columns {
            columns = columns.with_row(column_row(column));
        }
        lines.extend(format_grid(&columns).into_iter().map(|l| format!("  {l}")));

        if !table.constraints.is_empty() {
            lines.push(String::new());
            lines.push("Constraints:".to_string());
            for constraint in &table.constraints {
                lines.push(format!(
                    "  {} [{}] {}",
                    constraint.name,
                    kind_label(constraint.kind),
                    constraint.definition
                ));
            }
        }

        let enums: Vec<&ColumnMetadata> = table.columns.iter().filter(|c| !c.enum_labels.is_empty()).collect();
        if !enums.is_empty() {
            lines.push(String::new());
            lines.push("Enum labels:".to_string());
            for column in enums {
                lines.push(format!("  {}: {}", column.name, column.enum_labels.join(", ")));
            }
        }

        lines.join("\n")
    }
}

fn column_row(column: &ColumnMetadata) -> Vec<Value> {
    let mut keys = Vec::new();
    if column.is_primary_key {
        keys.push("pk".to_string());
    }
    if !column.unique_groups.is_empty() {
        keys.push("unique".to_string());
    }
    for fk in &column.foreign_keys {
        keys.push(format!("fk -> {}.{}", fk.ref_table, fk.ref_column));
    }
    if !column.check_clauses.is_empty() {
        keys.push("check".to_string());
    }

    vec![
        json!(column.name),
        json!(column.declared_type),
        json!(column.category.to_string()),
        json!(if column.nullable { "yes" } else { "no" }),
        json!(column.default_expression),
        json!(keys.join(", ")),
    ]
}

fn kind_label(kind: ConstraintKind) -> &'static str {
    match kind {
        ConstraintKind::PrimaryKey => "primary key",
        ConstraintKind::Unique => "unique",
        ConstraintKind::ForeignKey => "foreign key",
        ConstraintKind::Check => "check",
    }
}
