//! Live metadata reads. Every call queries the server; nothing is cached.

use tracing::debug;

use super::classify::{classify, TypeRegistry};
use super::model::{
    ColumnMetadata, CompositeField, ConstraintInfo, ConstraintKind, FkAction, ForeignKey,
    ReferenceValue, TableMetadata, UserType, ViewInfo,
};
use super::sql;
use super::IntrospectionError;
use crate::db::{quote_ident, quote_qualified, Connection, Row};

fn schema_params(schema: &str) -> Vec<String> {
    vec![schema.to_string()]
}

fn table_params(schema: &str, table: &str) -> Vec<String> {
    vec![schema.to_string(), table.to_string()]
}

/// Ordered names of ordinary and partitioned tables in `schema`.
pub fn list_tables(conn: &mut dyn Connection, schema: &str) -> Result<Vec<String>, IntrospectionError> {
    let rows = conn.query(sql::LIST_TABLES, &schema_params(schema))?;
    rows.iter()
        .map(|row| row.string("table_name").map_err(IntrospectionError::from))
        .collect()
}

/// Full metadata for one table.
///
/// An empty column list means the table does not exist (or is not visible),
/// reported as [`IntrospectionError::NoSuchTable`].
pub fn describe_table(
    conn: &mut dyn Connection,
    schema: &str,
    table: &str,
) -> Result<TableMetadata, IntrospectionError> {
    let params = table_params(schema, table);
    let column_rows = conn.query(sql::TABLE_COLUMNS, &params)?;
    if column_rows.is_empty() {
        return Err(IntrospectionError::NoSuchTable {
            schema: schema.to_string(),
            table: table.to_string(),
        });
    }

    let mut registry = TypeRegistry::new();
    for row in column_rows.iter() {
        match row.string("type_kind")?.as_str() {
            "e" => registry.register_enum(&row.string("type_name")?),
            "c" => registry.register_composite(&row.string("type_name")?),
            _ => {}
        }
    }

    let mut columns = column_rows
        .iter()
        .map(|row| column_from_row(&row, &registry))
        .collect::<Result<Vec<_>, _>>()?;

    let constraint_rows = conn.query(sql::TABLE_CONSTRAINTS, &params)?;
    let mut constraints = Vec::with_capacity(constraint_rows.len());
    for row in constraint_rows.iter() {
        let constraint = apply_constraint(&row, &mut columns)?;
        constraints.push(constraint);
    }

    debug!(schema, table, columns = columns.len(), constraints = constraints.len(), "described table");

    Ok(TableMetadata {
        schema: schema.to_string(),
        name: table.to_string(),
        columns,
        constraints,
    })
}

fn column_from_row(row: &Row<'_>, registry: &TypeRegistry) -> Result<ColumnMetadata, IntrospectionError> {
    let declared_type = row.string("declared_type")?;
    let mut column = ColumnMetadata::new(
        &row.string("name")?,
        &declared_type,
        classify(&declared_type, registry),
    );
    column.nullable = row.bool("nullable")?;
    column.default_expression = row.opt_string("default_expression")?;
    column.max_length = row.opt_i64("max_length")?;
    column.enum_labels = row.string_list("enum_labels")?;
    Ok(column)
}

/// Record a constraint on the columns it covers and return its summary.
fn apply_constraint(
    row: &Row<'_>,
    columns: &mut [ColumnMetadata],
) -> Result<ConstraintInfo, IntrospectionError> {
    let name = row.string("name")?;
    let code = row.string("kind")?;
    let kind = ConstraintKind::from_catalog_code(&code).ok_or_else(|| IntrospectionError::Malformed {
        message: format!("unknown constraint type '{code}' on {name}"),
    })?;
    let covered = row.string_list("columns")?;
    let definition = row.opt_string("definition")?.unwrap_or_default();

    match kind {
        ConstraintKind::PrimaryKey => {
            for column in columns.iter_mut().filter(|c| covered.contains(&c.name)) {
                column.is_primary_key = true;
            }
        }
        ConstraintKind::Unique => {
            for column in columns.iter_mut().filter(|c| covered.contains(&c.name)) {
                column.unique_groups.push(covered.clone());
            }
        }
        ConstraintKind::ForeignKey => {
            let ref_columns = row.string_list("ref_columns")?;
            let ref_schema = row.opt_string("ref_schema")?.unwrap_or_default();
            let ref_table = row.opt_string("ref_table")?.unwrap_or_default();
            let on_delete = fk_action(row, "on_delete", &name)?;
            let on_update = fk_action(row, "on_update", &name)?;
            for (local, referenced) in covered.iter().zip(ref_columns.iter()) {
                if let Some(column) = columns.iter_mut().find(|c| &c.name == local) {
                    column.foreign_keys.push(ForeignKey {
                        name: name.clone(),
                        local_column: local.clone(),
                        ref_schema: ref_schema.clone(),
                        ref_table: ref_table.clone(),
                        ref_column: referenced.clone(),
                        on_delete,
                        on_update,
                    });
                }
            }
        }
        ConstraintKind::Check => {
            for column in columns.iter_mut().filter(|c| covered.contains(&c.name)) {
                column.check_clauses.push(definition.clone());
            }
        }
    }

    Ok(ConstraintInfo {
        name,
        kind,
        columns: covered,
        definition,
    })
}

fn fk_action(row: &Row<'_>, column: &str, constraint: &str) -> Result<FkAction, IntrospectionError> {
    let code = row.string(column)?;
    FkAction::from_catalog_code(&code).ok_or_else(|| IntrospectionError::Malformed {
        message: format!("unknown referential action '{code}' on {constraint}"),
    })
}

/// Enum types and standalone composite types defined in `schema`.
pub fn list_user_types(conn: &mut dyn Connection, schema: &str) -> Result<Vec<UserType>, IntrospectionError> {
    let rows = conn.query(sql::USER_TYPES, &schema_params(schema))?;
    let mut types = Vec::with_capacity(rows.len());
    for row in rows.iter() {
        let name = row.string("name")?;
        let user_type = match row.string("kind")?.as_str() {
            "e" => UserType::Enum {
                name,
                labels: row.string_list("labels")?,
            },
            "c" => {
                let names = row.string_list("field_names")?;
                let field_types = row.string_list("field_types")?;
                UserType::Composite {
                    name,
                    fields: names
                        .into_iter()
                        .zip(field_types)
                        .map(|(name, type_expression)| CompositeField { name, type_expression })
                        .collect(),
                }
            }
            other => {
                return Err(IntrospectionError::Malformed {
                    message: format!("unexpected type kind '{other}' for {name}"),
                });
            }
        };
        types.push(user_type);
    }
    Ok(types)
}

/// Registry of the user types in `schema`, for classifying type expressions.
pub fn type_registry(conn: &mut dyn Connection, schema: &str) -> Result<TypeRegistry, IntrospectionError> {
    Ok(TypeRegistry::from_user_types(&list_user_types(conn, schema)?))
}

/// Plain and materialized views in `schema`.
pub fn list_views(conn: &mut dyn Connection, schema: &str) -> Result<Vec<ViewInfo>, IntrospectionError> {
    let rows = conn.query(sql::LIST_VIEWS, &schema_params(schema))?;
    rows.iter()
        .map(|row| -> Result<ViewInfo, IntrospectionError> {
            Ok(ViewInfo {
                name: row.string("name")?,
                materialized: row.bool("materialized")?,
                definition: row.opt_string("definition")?.unwrap_or_default(),
            })
        })
        .collect()
}

/// Statement reading key/label pairs from `table`, ordered by key.
pub fn reference_values_sql(
    table: &TableMetadata,
    label_column: Option<&str>,
    limit: u32,
) -> Result<String, IntrospectionError> {
    let key = match table.primary_key().as_slice() {
        [single] => single.to_string(),
        _ => {
            return Err(IntrospectionError::NoSingleColumnKey {
                table: table.name.clone(),
            });
        }
    };

    let label = match label_column {
        Some(name) => {
            table.column(name).ok_or_else(|| IntrospectionError::NoSuchColumn {
                table: table.name.clone(),
                column: name.to_string(),
            })?;
            name.to_string()
        }
        None => table
            .columns
            .iter()
            .find(|c| c.category == super::TypeCategory::Text && c.name != key)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| key.clone()),
    };

    let key = quote_ident(&key);
    Ok(format!(
        "SELECT {key}::text AS key, {}::text AS label FROM {} ORDER BY {key} LIMIT {limit}",
        quote_ident(&label),
        quote_qualified(&table.schema, &table.name),
    ))
}

/// Up to `limit` key/label pairs for choosing a row of `table` as a reference target.
pub fn reference_values(
    conn: &mut dyn Connection,
    schema: &str,
    table: &str,
    label_column: Option<&str>,
    limit: u32,
) -> Result<Vec<ReferenceValue>, IntrospectionError> {
    let metadata = describe_table(conn, schema, table)?;
    let statement = reference_values_sql(&metadata, label_column, limit)?;
    let rows = conn.query_no_params(&statement)?;
    rows.iter()
        .map(|row| -> Result<ReferenceValue, IntrospectionError> {
            Ok(ReferenceValue {
                key: row.opt_string("key")?.unwrap_or_default(),
                label: row.opt_string("label")?.unwrap_or_default(),
            })
        })
        .collect()
}
