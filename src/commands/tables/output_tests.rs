//! Output formatting tests for tables command.

#[cfg(test)]
mod tests {
    use super::super::execute::TablesResult;
    use rstest::{fixture, rstest};

    // =========================================================================
    // Expected outputs
    // =========================================================================

    const EMPTY_TABLE: &str = "\
Tables in schema 'front_desk'

No tables found.";

    const HOTEL_TABLE: &str = "\
Tables in schema 'public'

Found 2 table(s):
  rooms
  stays";

    // =========================================================================
    // Fixtures
    // =========================================================================

    #[fixture]
    fn empty_result() -> TablesResult {
        TablesResult {
            schema: "front_desk".to_string(),
            tables: vec![],
        }
    }

    #[fixture]
    fn hotel_result() -> TablesResult {
        TablesResult {
            schema: "public".to_string(),
            tables: vec!["rooms".to_string(), "stays".to_string()],
        }
    }

    // =========================================================================
    // Tests
    // =========================================================================

    crate::output_table_test! {
        test_name: test_to_table_empty,
        fixture: empty_result,
        fixture_type: TablesResult,
        expected: EMPTY_TABLE,
    }

    crate::output_table_test! {
        test_name: test_to_table_hotel,
        fixture: hotel_result,
        fixture_type: TablesResult,
        expected: HOTEL_TABLE,
    }

    crate::output_json_test! {
        test_name: test_format_json,
        fixture: hotel_result,
        fixture_type: TablesResult,
        assertions: {
            "schema": "public",
            "tables": serde_json::json!(["rooms", "stays"]),
        },
    }

    crate::output_toon_test! {
        test_name: test_format_toon,
        fixture: hotel_result,
        fixture_type: TablesResult,
        contains: ["schema: public", "rooms"],
    }
}
