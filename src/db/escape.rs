//! Identifier and literal quoting for generated SQL.
//!
//! Every table, column, type and constraint name that ends up in SQL text goes
//! through [`quote_ident`]; every string literal goes through [`quote_literal`].

/// Schema whose objects render without a schema prefix.
pub const DEFAULT_SCHEMA: &str = "public";

/// Maximum identifier length before PostgreSQL truncates (NAMEDATALEN - 1).
pub const MAX_IDENT_LEN: usize = 63;

/// Keywords that cannot appear bare as a column or table name.
const RESERVED: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "binary", "both", "case", "cast", "check", "collate", "collation",
    "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end",
    "except", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant",
    "group", "having", "ilike", "in", "initially", "inner", "intersect", "into", "is",
    "isnull", "join", "lateral", "leading", "left", "like", "limit", "localtime",
    "localtimestamp", "natural", "not", "notnull", "null", "offset", "on", "only", "or",
    "order", "outer", "overlaps", "placing", "primary", "references", "returning",
    "right", "select", "session_user", "similar", "some", "symmetric", "table",
    "tablesample", "then", "to", "trailing", "true", "union", "unique", "user", "using",
    "variadic", "verbose", "when", "where", "window", "with",
];

/// True if `name` can be written without double quotes and still mean itself.
fn is_plain_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_lowercase() || first == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        && !RESERVED.contains(&name)
}

/// Quote an identifier for use in SQL text.
///
/// Lower-case, non-reserved names are left bare so generated statements stay
/// readable (`rooms`, `room_id`). Anything else is double-quoted with embedded
/// quotes doubled.
pub fn quote_ident(name: &str) -> String {
    if is_plain_ident(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Quote a schema-qualified relation name, dropping the default schema.
pub fn quote_qualified(schema: &str, name: &str) -> String {
    if schema.is_empty() || schema == DEFAULT_SCHEMA {
        quote_ident(name)
    } else {
        format!("{}.{}", quote_ident(schema), quote_ident(name))
    }
}

/// Double single quotes so the text can sit inside a `'...'` literal.
pub fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a single-quoted string literal.
#[inline]
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_literal(value))
}
