//! Statement text for each [`ChangeSpec`] variant.

use std::collections::HashSet;

use super::{ChangeSpec, CheckExpression};
use crate::db::{quote_ident, quote_literal, quote_qualified, MAX_IDENT_LEN};
use crate::queries::coerce::{missing, Comparison};
use crate::queries::{coerce, BuildError, Operator};
use crate::schema::{classify, is_valid_type_expression, CompositeField, FkAction, TableMetadata, TypeRegistry};

/// Catalog facts a change may need before it can be rendered.
///
/// `table` is read by `AddCheck` (column type and existing checks), `registry`
/// by `AddColumn` defaults of user-defined types.
#[derive(Debug, Default)]
pub struct ChangeContext {
    pub table: Option<TableMetadata>,
    pub registry: TypeRegistry,
}

/// Render `change` to a single `;`-terminated statement.
pub fn render_change(change: &ChangeSpec, schema: &str, ctx: &ChangeContext) -> Result<String, BuildError> {
    let table_sql = |table: &str| quote_qualified(schema, table);
    let sql = match change {
        ChangeSpec::AddColumn {
            table,
            name,
            type_expression,
            nullable,
            default,
        } => {
            check_type_expression(type_expression)?;
            let mut sql = format!(
                "ALTER TABLE {} ADD COLUMN {} {}",
                table_sql(table),
                quote_ident(name),
                normalize_type(type_expression)
            );
            if let Some(default) = default {
                let category = classify(type_expression, &ctx.registry);
                if let Some(literal) = coerce(default, category, Operator::Eq)? {
                    sql.push_str(&format!(" DEFAULT {literal}"));
                }
            }
            if !nullable {
                sql.push_str(" NOT NULL");
            }
            sql
        }
        ChangeSpec::DropColumn { table, name, cascade } => format!(
            "ALTER TABLE {} DROP COLUMN {}{}",
            table_sql(table),
            quote_ident(name),
            cascade_suffix(*cascade)
        ),
        ChangeSpec::RenameColumn { table, old, new } => {
            require_name(new, "rename_column", "new")?;
            format!(
                "ALTER TABLE {} RENAME COLUMN {} TO {}",
                table_sql(table),
                quote_ident(old),
                quote_ident(new)
            )
        }
        ChangeSpec::RenameTable { old, new } => {
            require_name(new, "rename_table", "new")?;
            format!("ALTER TABLE {} RENAME TO {}", table_sql(old), quote_ident(new))
        }
        ChangeSpec::ChangeColumnType { table, name, new_type } => {
            check_type_expression(new_type)?;
            format!(
                "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                table_sql(table),
                quote_ident(name),
                normalize_type(new_type)
            )
        }
        ChangeSpec::SetNotNull { table, name, flag } => format!(
            "ALTER TABLE {} ALTER COLUMN {} {} NOT NULL",
            table_sql(table),
            quote_ident(name),
            if *flag { "SET" } else { "DROP" }
        ),
        ChangeSpec::AddUnique { table, columns, name } => {
            if columns.is_empty() {
                return Err(missing("add_unique", "columns"));
            }
            let constraint = name.clone().unwrap_or_else(|| unique_constraint_name(table, columns));
            let list: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
            format!(
                "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
                table_sql(table),
                quote_ident(&constraint),
                list.join(", ")
            )
        }
        ChangeSpec::AddForeignKey {
            table,
            local_column,
            ref_table,
            ref_column,
            on_delete,
            on_update,
            name,
        } => render_foreign_key(schema, table, local_column, ref_table, ref_column, *on_delete, *on_update, name.as_deref()),
        ChangeSpec::AddCheck { table, expression, name } => render_check(schema, table, expression, name.as_deref(), ctx)?,
        ChangeSpec::DropUnique { table, constraint_name }
        | ChangeSpec::DropForeignKey { table, constraint_name }
        | ChangeSpec::DropCheck { table, constraint_name } => {
            require_name(constraint_name, change.kind(), "constraint_name")?;
            format!(
                "ALTER TABLE {} DROP CONSTRAINT IF EXISTS {}",
                table_sql(table),
                quote_ident(constraint_name)
            )
        }
        ChangeSpec::CreateEnumType { name, labels } => {
            check_labels(name, labels)?;
            let quoted: Vec<String> = labels.iter().map(|l| quote_literal(l)).collect();
            format!("CREATE TYPE {} AS ENUM ({})", table_sql(name), quoted.join(", "))
        }
        ChangeSpec::AddEnumValue { type_name, value } => {
            check_label(type_name, value)?;
            format!(
                "ALTER TYPE {} ADD VALUE IF NOT EXISTS {}",
                table_sql(type_name),
                quote_literal(value)
            )
        }
        ChangeSpec::DropEnumValue { type_name, value } => {
            check_label(type_name, value)?;
            format!("ALTER TYPE {} DROP VALUE {}", table_sql(type_name), quote_literal(value))
        }
        ChangeSpec::CreateCompositeType { name, fields } => {
            check_fields(name, fields)?;
            let list: Vec<String> = fields
                .iter()
                .map(|f| format!("{} {}", quote_ident(&f.name), normalize_type(&f.type_expression)))
                .collect();
            format!("CREATE TYPE {} AS ({})", table_sql(name), list.join(", "))
        }
        ChangeSpec::DropType { name, cascade } => {
            format!("DROP TYPE {}{}", table_sql(name), cascade_suffix(*cascade))
        }
    };
    Ok(format!("{sql};"))
}

/// `uq_{table}_{col1}_{col2}...`
pub fn unique_constraint_name(table: &str, columns: &[String]) -> String {
    truncate_ident(format!("uq_{}_{}", table, columns.join("_")))
}

/// `fk_{table}_{column}_{ref_table}_{ref_column}`
pub fn foreign_key_name(table: &str, column: &str, ref_table: &str, ref_column: &str) -> String {
    truncate_ident(format!("fk_{table}_{column}_{ref_table}_{ref_column}"))
}

/// `ck_{table}_{column}_{n}`, `n` being one more than the column's existing checks.
pub fn check_constraint_name(table: &str, column: &str, existing: usize) -> String {
    truncate_ident(format!("ck_{}_{}_{}", table, column, existing + 1))
}

#[allow(clippy::too_many_arguments)]
fn render_foreign_key(
    schema: &str,
    table: &str,
    local_column: &str,
    ref_table: &str,
    ref_column: &str,
    on_delete: FkAction,
    on_update: FkAction,
    name: Option<&str>,
) -> String {
    let constraint = name
        .map(str::to_string)
        .unwrap_or_else(|| foreign_key_name(table, local_column, ref_table, ref_column));
    format!(
        "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}) ON DELETE {} ON UPDATE {}",
        quote_qualified(schema, table),
        quote_ident(&constraint),
        quote_ident(local_column),
        quote_qualified(schema, ref_table),
        quote_ident(ref_column),
        on_delete.sql(),
        on_update.sql()
    )
}

fn render_check(
    schema: &str,
    table: &str,
    expression: &CheckExpression,
    name: Option<&str>,
    ctx: &ChangeContext,
) -> Result<String, BuildError> {
    let metadata = ctx
        .table
        .as_ref()
        .filter(|t| t.name == table)
        .ok_or_else(|| BuildError::UnknownTable {
            table: table.to_string(),
        })?;
    let column = metadata
        .column(&expression.column)
        .ok_or_else(|| BuildError::UnknownColumn {
            column: format!("{}.{}", table, expression.column),
        })?;

    let lhs = quote_ident(&column.name);
    let condition = Comparison {
        lhs: &lhs,
        category: column.category,
        declared_type: &column.declared_type,
        op: expression.op,
        value: expression.value.as_deref(),
        value2: expression.value2.as_deref(),
    }
    .render("add_check", None)?;

    let constraint = name
        .map(str::to_string)
        .unwrap_or_else(|| check_constraint_name(table, &column.name, column.check_clauses.len()));
    Ok(format!(
        "ALTER TABLE {} ADD CONSTRAINT {} CHECK ({})",
        quote_qualified(schema, table),
        quote_ident(&constraint),
        condition
    ))
}

fn cascade_suffix(cascade: bool) -> &'static str {
    if cascade { " CASCADE" } else { "" }
}

fn normalize_type(expression: &str) -> String {
    expression.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn check_type_expression(expression: &str) -> Result<(), BuildError> {
    if is_valid_type_expression(expression) {
        Ok(())
    } else {
        Err(BuildError::InvalidTypeExpression {
            expression: expression.to_string(),
        })
    }
}

fn require_name(value: &str, context: &str, parameter: &str) -> Result<(), BuildError> {
    if value.trim().is_empty() {
        Err(missing(context, parameter))
    } else {
        Ok(())
    }
}

fn check_labels(name: &str, labels: &[String]) -> Result<(), BuildError> {
    if labels.is_empty() {
        return Err(BuildError::EmptyTypeDefinition {
            name: name.to_string(),
            what: "label",
        });
    }
    let mut seen = HashSet::new();
    for label in labels {
        check_label(name, label)?;
        if !seen.insert(label.as_str()) {
            return Err(BuildError::DuplicateEntry {
                name: name.to_string(),
                what: "label",
                value: label.clone(),
            });
        }
    }
    Ok(())
}

/// Enum labels are stored as `name`, so they share the identifier length limit.
fn check_label(type_name: &str, label: &str) -> Result<(), BuildError> {
    let reason = if label.is_empty() {
        "labels cannot be empty"
    } else if label.len() > MAX_IDENT_LEN {
        "labels are limited to 63 bytes"
    } else if label.contains('\0') {
        "labels cannot contain NUL characters"
    } else {
        return Ok(());
    };
    Err(BuildError::InvalidParameter {
        context: format!("enum {type_name}"),
        reason: reason.to_string(),
    })
}

fn check_fields(name: &str, fields: &[CompositeField]) -> Result<(), BuildError> {
    if fields.is_empty() {
        return Err(BuildError::EmptyTypeDefinition {
            name: name.to_string(),
            what: "field",
        });
    }
    let mut seen = HashSet::new();
    for field in fields {
        require_name(&field.name, "create_composite_type", "field name")?;
        check_type_expression(&field.type_expression)?;
        if !seen.insert(field.name.as_str()) {
            return Err(BuildError::DuplicateEntry {
                name: name.to_string(),
                what: "field",
                value: field.name.clone(),
            });
        }
    }
    Ok(())
}

/// The server truncates longer names; doing it here keeps the reported name exact.
fn truncate_ident(mut name: String) -> String {
    if name.len() > MAX_IDENT_LEN {
        let mut end = MAX_IDENT_LEN;
        while !name.is_char_boundary(end) {
            end -= 1;
        }
        name.truncate(end);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnMetadata, TypeCategory};
    use rstest::{fixture, rstest};

    fn render(change: ChangeSpec) -> Result<String, BuildError> {
        render_change(&change, "public", &ChangeContext::default())
    }

    #[fixture]
    fn stays_context() -> ChangeContext {
        let mut nights = ColumnMetadata::new("nights", "integer", TypeCategory::Numeric);
        nights.check_clauses.push("CHECK ((nights > 0))".to_string());
        ChangeContext {
            table: Some(TableMetadata {
                schema: "public".to_string(),
                name: "stays".to_string(),
                columns: vec![
                    ColumnMetadata::new("guest", "text", TypeCategory::Text),
                    nights,
                    ColumnMetadata::new("check_in", "date", TypeCategory::DateTime),
                ],
                constraints: vec![],
            }),
            registry: TypeRegistry::new(),
        }
    }

    fn foreign_key(on_delete: FkAction, on_update: FkAction) -> ChangeSpec {
        ChangeSpec::AddForeignKey {
            table: "stays".to_string(),
            local_column: "room_id".to_string(),
            ref_table: "rooms".to_string(),
            ref_column: "id".to_string(),
            on_delete,
            on_update,
            name: None,
        }
    }

    // =========================================================================
    // Columns and tables
    // =========================================================================

    #[rstest]
    fn test_add_column_plain() {
        let change = ChangeSpec::AddColumn {
            table: "rooms".to_string(),
            name: "floor".to_string(),
            type_expression: "integer".to_string(),
            nullable: true,
            default: None,
        };
        assert_eq!(render(change).unwrap(), "ALTER TABLE rooms ADD COLUMN floor integer;");
    }

    #[rstest]
    #[case("integer NOT NULL")]
    #[case("integer PRIMARY KEY")]
    #[case("integer USING id")]
    fn test_add_column_rejects_constraint_clauses(#[case] type_expression: &str) {
        let change = ChangeSpec::AddColumn {
            table: "rooms".to_string(),
            name: "floor".to_string(),
            type_expression: type_expression.to_string(),
            nullable: true,
            default: None,
        };
        assert_eq!(
            render(change).unwrap_err(),
            BuildError::InvalidTypeExpression {
                expression: type_expression.to_string(),
            }
        );
    }

    #[rstest]
    #[case("integer", "3,0", "ALTER TABLE rooms ADD COLUMN x integer DEFAULT 3.0 NOT NULL;")]
    #[case("boolean", "yes", "ALTER TABLE rooms ADD COLUMN x boolean DEFAULT true NOT NULL;")]
    #[case("varchar(20)", "n/a", "ALTER TABLE rooms ADD COLUMN x varchar(20) DEFAULT 'n/a' NOT NULL;")]
    #[case("timestamp  with time zone", "2024-01-01", "ALTER TABLE rooms ADD COLUMN x timestamp with time zone DEFAULT '2024-01-01' NOT NULL;")]
    fn test_add_column_default_coerced(#[case] type_expression: &str, #[case] default: &str, #[case] expected: &str) {
        let change = ChangeSpec::AddColumn {
            table: "rooms".to_string(),
            name: "x".to_string(),
            type_expression: type_expression.to_string(),
            nullable: false,
            default: Some(default.to_string()),
        };
        assert_eq!(render(change).unwrap(), expected);
    }

    #[rstest]
    fn test_add_column_enum_default_uses_registry() {
        let mut registry = TypeRegistry::new();
        registry.register_enum("comfort_level");
        let ctx = ChangeContext { table: None, registry };
        let change = ChangeSpec::AddColumn {
            table: "rooms".to_string(),
            name: "tier".to_string(),
            type_expression: "comfort_level".to_string(),
            nullable: true,
            default: Some("lux".to_string()),
        };
        assert_eq!(
            render_change(&change, "public", &ctx).unwrap(),
            "ALTER TABLE rooms ADD COLUMN tier comfort_level DEFAULT 'lux';"
        );
    }

    #[rstest]
    fn test_add_column_bad_default() {
        let change = ChangeSpec::AddColumn {
            table: "rooms".to_string(),
            name: "floor".to_string(),
            type_expression: "integer".to_string(),
            nullable: true,
            default: Some("ground".to_string()),
        };
        assert!(matches!(render(change), Err(BuildError::InvalidLiteral { .. })));
    }

    #[rstest]
    #[case("integer; DROP TABLE rooms")]
    #[case("")]
    #[case("text DEFAULT 'x'")]
    fn test_add_column_rejects_type_injection(#[case] type_expression: &str) {
        let change = ChangeSpec::AddColumn {
            table: "rooms".to_string(),
            name: "x".to_string(),
            type_expression: type_expression.to_string(),
            nullable: true,
            default: None,
        };
        assert!(matches!(render(change), Err(BuildError::InvalidTypeExpression { .. })));
    }

    #[rstest]
    #[case(false, "ALTER TABLE rooms DROP COLUMN tags;")]
    #[case(true, "ALTER TABLE rooms DROP COLUMN tags CASCADE;")]
    fn test_drop_column(#[case] cascade: bool, #[case] expected: &str) {
        let change = ChangeSpec::DropColumn {
            table: "rooms".to_string(),
            name: "tags".to_string(),
            cascade,
        };
        assert_eq!(render(change).unwrap(), expected);
    }

    #[rstest]
    fn test_renames_quote_identifiers() {
        let column = ChangeSpec::RenameColumn {
            table: "rooms".to_string(),
            old: "room_number".to_string(),
            new: "Room No".to_string(),
        };
        assert_eq!(
            render(column).unwrap(),
            "ALTER TABLE rooms RENAME COLUMN room_number TO \"Room No\";"
        );

        let table = ChangeSpec::RenameTable {
            old: "stays".to_string(),
            new: "order".to_string(),
        };
        assert_eq!(render(table).unwrap(), "ALTER TABLE stays RENAME TO \"order\";");
    }

    #[rstest]
    fn test_rename_requires_new_name() {
        let change = ChangeSpec::RenameTable {
            old: "stays".to_string(),
            new: "  ".to_string(),
        };
        assert!(matches!(render(change), Err(BuildError::MissingParameter { .. })));
    }

    #[rstest]
    fn test_change_column_type_in_other_schema() {
        let change = ChangeSpec::ChangeColumnType {
            table: "rooms".to_string(),
            name: "price".to_string(),
            new_type: "numeric(12, 2)".to_string(),
        };
        assert_eq!(
            render_change(&change, "hotel", &ChangeContext::default()).unwrap(),
            "ALTER TABLE hotel.rooms ALTER COLUMN price TYPE numeric(12, 2);"
        );
    }

    #[rstest]
    #[case(true, "ALTER TABLE stays ALTER COLUMN check_out SET NOT NULL;")]
    #[case(false, "ALTER TABLE stays ALTER COLUMN check_out DROP NOT NULL;")]
    fn test_set_not_null(#[case] flag: bool, #[case] expected: &str) {
        let change = ChangeSpec::SetNotNull {
            table: "stays".to_string(),
            name: "check_out".to_string(),
            flag,
        };
        assert_eq!(render(change).unwrap(), expected);
    }

    // =========================================================================
    // Constraints
    // =========================================================================

    #[rstest]
    fn test_add_unique_generated_name() {
        let change = ChangeSpec::AddUnique {
            table: "stays".to_string(),
            columns: vec!["room_id".to_string(), "check_in".to_string()],
            name: None,
        };
        assert_eq!(
            render(change).unwrap(),
            "ALTER TABLE stays ADD CONSTRAINT uq_stays_room_id_check_in UNIQUE (room_id, check_in);"
        );
    }

    #[rstest]
    fn test_add_unique_explicit_name_and_empty_columns() {
        let named = ChangeSpec::AddUnique {
            table: "rooms".to_string(),
            columns: vec!["room_number".to_string()],
            name: Some("rooms_number_once".to_string()),
        };
        assert_eq!(
            render(named).unwrap(),
            "ALTER TABLE rooms ADD CONSTRAINT rooms_number_once UNIQUE (room_number);"
        );

        let empty = ChangeSpec::AddUnique {
            table: "rooms".to_string(),
            columns: vec![],
            name: None,
        };
        assert!(matches!(render(empty), Err(BuildError::MissingParameter { .. })));
    }

    #[rstest]
    fn test_add_foreign_key() {
        assert_eq!(
            render(foreign_key(FkAction::Cascade, FkAction::NoAction)).unwrap(),
            "ALTER TABLE stays ADD CONSTRAINT fk_stays_room_id_rooms_id FOREIGN KEY (room_id) \
             REFERENCES rooms(id) ON DELETE CASCADE ON UPDATE NO ACTION;"
        );
    }

    #[rstest]
    fn test_add_foreign_key_actions() {
        let sql = render(foreign_key(FkAction::SetNull, FkAction::Restrict)).unwrap();
        assert!(sql.ends_with("ON DELETE SET NULL ON UPDATE RESTRICT;"));
    }

    #[rstest]
    fn test_drop_constraints() {
        let unique = ChangeSpec::DropUnique {
            table: "rooms".to_string(),
            constraint_name: "rooms_room_number_key".to_string(),
        };
        assert_eq!(
            render(unique).unwrap(),
            "ALTER TABLE rooms DROP CONSTRAINT IF EXISTS rooms_room_number_key;"
        );

        let foreign = ChangeSpec::DropForeignKey {
            table: "stays".to_string(),
            constraint_name: "".to_string(),
        };
        assert_eq!(
            render(foreign).unwrap_err(),
            BuildError::MissingParameter {
                context: "drop_foreign_key".to_string(),
                parameter: "constraint_name".to_string(),
            }
        );
    }

    #[rstest]
    fn test_add_check_numbers_after_existing(stays_context: ChangeContext) {
        let change = ChangeSpec::AddCheck {
            table: "stays".to_string(),
            expression: CheckExpression {
                column: "nights".to_string(),
                op: Operator::Lte,
                value: Some("30".to_string()),
                value2: None,
            },
            name: None,
        };
        assert_eq!(
            render_change(&change, "public", &stays_context).unwrap(),
            "ALTER TABLE stays ADD CONSTRAINT ck_stays_nights_2 CHECK (nights <= 30);"
        );
    }

    #[rstest]
    fn test_add_check_first_on_column(stays_context: ChangeContext) {
        let change = ChangeSpec::AddCheck {
            table: "stays".to_string(),
            expression: CheckExpression {
                column: "check_in".to_string(),
                op: Operator::Between,
                value: Some("2020-01-01".to_string()),
                value2: Some("2030-12-31".to_string()),
            },
            name: None,
        };
        assert_eq!(
            render_change(&change, "public", &stays_context).unwrap(),
            "ALTER TABLE stays ADD CONSTRAINT ck_stays_check_in_1 \
             CHECK (check_in BETWEEN '2020-01-01' AND '2030-12-31');"
        );
    }

    #[rstest]
    fn test_add_check_rejects_illegal_operator(stays_context: ChangeContext) {
        let change = ChangeSpec::AddCheck {
            table: "stays".to_string(),
            expression: CheckExpression {
                column: "guest".to_string(),
                op: Operator::Gt,
                value: Some("A".to_string()),
                value2: None,
            },
            name: Some("ck_guest".to_string()),
        };
        assert!(matches!(
            render_change(&change, "public", &stays_context),
            Err(BuildError::InvalidOperatorForType { .. })
        ));
    }

    #[rstest]
    fn test_add_check_unknown_column(stays_context: ChangeContext) {
        let change = ChangeSpec::AddCheck {
            table: "stays".to_string(),
            expression: CheckExpression {
                column: "rating".to_string(),
                op: Operator::Gt,
                value: Some("1".to_string()),
                value2: None,
            },
            name: None,
        };
        assert_eq!(
            render_change(&change, "public", &stays_context).unwrap_err(),
            BuildError::UnknownColumn {
                column: "stays.rating".to_string()
            }
        );
    }

    #[rstest]
    fn test_add_check_without_metadata() {
        let change = ChangeSpec::AddCheck {
            table: "stays".to_string(),
            expression: CheckExpression {
                column: "nights".to_string(),
                op: Operator::Gt,
                value: Some("0".to_string()),
                value2: None,
            },
            name: None,
        };
        assert!(matches!(render(change), Err(BuildError::UnknownTable { .. })));
    }

    #[rstest]
    fn test_generated_names_truncated() {
        let long = "a".repeat(40);
        let name = foreign_key_name(&long, "column", "other_table", "id");
        assert_eq!(name.len(), MAX_IDENT_LEN);
        assert!(name.starts_with("fk_aaaa"));
        assert_eq!(check_constraint_name("stays", "nights", 0), "ck_stays_nights_1");
    }

    // =========================================================================
    // Types
    // =========================================================================

    #[rstest]
    fn test_create_enum() {
        let change = ChangeSpec::CreateEnumType {
            name: "meal_plan".to_string(),
            labels: vec!["none".to_string(), "breakfast".to_string(), "chef's".to_string()],
        };
        assert_eq!(
            render(change).unwrap(),
            "CREATE TYPE meal_plan AS ENUM ('none', 'breakfast', 'chef''s');"
        );
    }

    #[rstest]
    fn test_create_enum_rejects_empty_and_duplicates() {
        let empty = ChangeSpec::CreateEnumType {
            name: "meal_plan".to_string(),
            labels: vec![],
        };
        assert_eq!(
            render(empty).unwrap_err(),
            BuildError::EmptyTypeDefinition {
                name: "meal_plan".to_string(),
                what: "label",
            }
        );

        let duplicate = ChangeSpec::CreateEnumType {
            name: "meal_plan".to_string(),
            labels: vec!["none".to_string(), "full".to_string(), "none".to_string()],
        };
        assert_eq!(
            render(duplicate).unwrap_err(),
            BuildError::DuplicateEntry {
                name: "meal_plan".to_string(),
                what: "label",
                value: "none".to_string(),
            }
        );
    }

    #[rstest]
    fn test_enum_label_length_limit() {
        let change = ChangeSpec::AddEnumValue {
            type_name: "meal_plan".to_string(),
            value: "x".repeat(64),
        };
        assert!(matches!(render(change), Err(BuildError::InvalidParameter { .. })));
    }

    #[rstest]
    fn test_enum_values() {
        let add = ChangeSpec::AddEnumValue {
            type_name: "comfort_level".to_string(),
            value: "suite".to_string(),
        };
        assert_eq!(
            render(add).unwrap(),
            "ALTER TYPE comfort_level ADD VALUE IF NOT EXISTS 'suite';"
        );

        let drop = ChangeSpec::DropEnumValue {
            type_name: "comfort_level".to_string(),
            value: "semi_lux".to_string(),
        };
        assert_eq!(render(drop).unwrap(), "ALTER TYPE comfort_level DROP VALUE 'semi_lux';");
    }

    #[rstest]
    fn test_create_composite() {
        let change = ChangeSpec::CreateCompositeType {
            name: "address".to_string(),
            fields: vec![
                CompositeField {
                    name: "city".to_string(),
                    type_expression: "text".to_string(),
                },
                CompositeField {
                    name: "zip".to_string(),
                    type_expression: "character varying(10)".to_string(),
                },
            ],
        };
        assert_eq!(
            render(change).unwrap(),
            "CREATE TYPE address AS (city text, zip character varying(10));"
        );
    }

    #[rstest]
    fn test_create_composite_validation() {
        let empty = ChangeSpec::CreateCompositeType {
            name: "address".to_string(),
            fields: vec![],
        };
        assert!(matches!(render(empty), Err(BuildError::EmptyTypeDefinition { what: "field", .. })));

        let bad_type = ChangeSpec::CreateCompositeType {
            name: "address".to_string(),
            fields: vec![CompositeField {
                name: "city".to_string(),
                type_expression: "text); DROP TABLE rooms; --".to_string(),
            }],
        };
        assert!(matches!(render(bad_type), Err(BuildError::InvalidTypeExpression { .. })));

        let field = CompositeField {
            name: "city".to_string(),
            type_expression: "text".to_string(),
        };
        let duplicate = ChangeSpec::CreateCompositeType {
            name: "address".to_string(),
            fields: vec![field.clone(), field],
        };
        assert!(matches!(render(duplicate), Err(BuildError::DuplicateEntry { what: "field", .. })));
    }

    #[rstest]
    #[case(false, "DROP TYPE meal_plan;")]
    #[case(true, "DROP TYPE meal_plan CASCADE;")]
    fn test_drop_type(#[case] cascade: bool, #[case] expected: &str) {
        let change = ChangeSpec::DropType {
            name: "meal_plan".to_string(),
            cascade,
        };
        assert_eq!(render(change).unwrap(), expected);
    }
}
