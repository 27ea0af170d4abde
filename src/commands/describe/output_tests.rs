//! Output formatting tests for describe command.

#[cfg(test)]
mod tests {
    use super::super::execute::DescribeResult;
    use crate::schema::{ColumnMetadata, ConstraintInfo, ConstraintKind, TableMetadata, TypeCategory};
    use rstest::{fixture, rstest};

    // =========================================================================
    // Fixtures
    // =========================================================================

    #[fixture]
    fn rooms_result() -> DescribeResult {
        let mut id = ColumnMetadata::new("id", "integer", TypeCategory::Numeric);
        id.nullable = false;
        id.is_primary_key = true;

        let mut room_number = ColumnMetadata::new("room_number", "character varying(10)", TypeCategory::Text);
        room_number.max_length = Some(10);
        room_number.unique_groups = vec![vec!["room_number".to_string()]];

        let mut comfort = ColumnMetadata::new("comfort", "comfort_level", TypeCategory::Enum);
        comfort.default_expression = Some("'standard'::comfort_level".to_string());
        comfort.enum_labels = vec!["standard".to_string(), "semi_lux".to_string(), "lux".to_string()];

        DescribeResult {
            table: TableMetadata {
                schema: "public".to_string(),
                name: "rooms".to_string(),
                columns: vec![id, room_number, comfort],
                constraints: vec![ConstraintInfo {
                    name: "rooms_pkey".to_string(),
                    kind: ConstraintKind::PrimaryKey,
                    columns: vec!["id".to_string()],
                    definition: "PRIMARY KEY (id)".to_string(),
                }],
            },
        }
    }

    // =========================================================================
    // Tests
    // =========================================================================

    crate::output_table_contains_test! {
        test_name: test_to_table_lists_columns,
        fixture: rooms_result,
        fixture_type: DescribeResult,
        contains: [
            "Table public.rooms",
            "character varying(10)",
            "'standard'::comfort_level",
            "pk",
            "unique",
        ],
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_lists_constraints,
        fixture: rooms_result,
        fixture_type: DescribeResult,
        contains: ["Constraints:", "  rooms_pkey [primary key] PRIMARY KEY (id)"],
    }

    crate::output_table_contains_test! {
        test_name: test_to_table_lists_enum_labels,
        fixture: rooms_result,
        fixture_type: DescribeResult,
        contains: ["Enum labels:", "  comfort: standard, semi_lux, lux"],
    }

    crate::output_json_test! {
        test_name: test_format_json_is_flat,
        fixture: rooms_result,
        fixture_type: DescribeResult,
        assertions: {
            "schema": "public",
            "name": "rooms",
        },
    }

    #[rstest]
    fn test_format_json_columns(rooms_result: DescribeResult) {
        use crate::output::{OutputFormat, Outputable};
        let parsed: serde_json::Value = serde_json::from_str(&rooms_result.format(OutputFormat::Json)).unwrap();
        assert_eq!(parsed["columns"][0]["is_primary_key"], true);
        assert_eq!(parsed["columns"][2]["category"], "Enum");
        assert!(parsed["columns"][0].get("enum_labels").is_none());
    }
}
