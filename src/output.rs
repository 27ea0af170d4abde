//! Output formatting for command results.
//!
//! Supports multiple output formats: table (human-readable), JSON, and toon.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

use crate::db::RowSet;

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Token-efficient toon format
    Toon,
}

/// Trait for types that can be formatted for output
pub trait Outputable: Serialize {
    /// Format as a human-readable table
    fn to_table(&self) -> String;

    /// Format according to the specified output format
    fn format(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => self.to_table(),
            OutputFormat::Json => serde_json::to_string_pretty(self).unwrap_or_default(),
            OutputFormat::Toon => {
                let json_value = serde_json::to_value(self).unwrap_or_default();
                toon::encode(&json_value, None)
            }
        }
    }
}

/// Render a cell value the way psql would: NULL as empty, strings unquoted.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Lay out `rows` as left-aligned columns under a header and a dashed rule.
pub fn format_grid(rows: &RowSet) -> Vec<String> {
    let cells: Vec<Vec<String>> = rows
        .rows
        .iter()
        .map(|row| row.iter().map(display_value).collect())
        .collect();

    let mut widths: Vec<usize> = rows.columns.iter().map(|c| c.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(rows.columns.as_slice())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(cells.iter().map(|row| line(row.as_slice())));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), "")]
    #[case(json!("lux"), "lux")]
    #[case(json!(42), "42")]
    #[case(json!(true), "true")]
    #[case(json!(["wifi", "sea view"]), "[\"wifi\",\"sea view\"]")]
    fn test_display_value(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(display_value(&value), expected);
    }

    #[rstest]
    fn test_format_grid() {
        let rows = RowSet::new(&["id", "room_number"])
            .with_row(vec![json!(1), json!("101")])
            .with_row(vec![json!(12), json!(null)]);
        assert_eq!(
            format_grid(&rows),
            vec!["id | room_number", "---+------------", "1  | 101", "12 |"]
        );
    }

    #[rstest]
    fn test_format_grid_without_rows() {
        let rows = RowSet::new(&["key", "label"]);
        assert_eq!(format_grid(&rows), vec!["key | label", "----+------"]);
    }
}
