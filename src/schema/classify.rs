//! Mapping from declared type names to semantic categories.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::model::UserType;

/// Semantic category of a column's type. Decides legal operators and literal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeCategory {
    Numeric,
    Boolean,
    DateTime,
    Text,
    Enum,
    Array,
    Composite,
    Other,
}

impl fmt::Display for TypeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::DateTime => "date/time",
            Self::Text => "text",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Composite => "composite",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// First words of built-in numeric type names.
const NUMERIC_WORDS: &[&str] = &[
    "smallint", "integer", "bigint", "int", "int2", "int4", "int8", "numeric", "decimal",
    "real", "double", "float", "float4", "float8", "smallserial", "serial", "bigserial",
    "serial2", "serial4", "serial8",
];

/// Names of user-defined enum and composite types known for a schema.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    enums: HashSet<String>,
    composites: HashSet<String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_user_types(types: &[UserType]) -> Self {
        let mut registry = Self::new();
        for t in types {
            match t {
                UserType::Enum { name, .. } => registry.register_enum(name),
                UserType::Composite { name, .. } => registry.register_composite(name),
            }
        }
        registry
    }

    pub fn register_enum(&mut self, name: &str) {
        self.enums.insert(name.to_string());
    }

    pub fn register_composite(&mut self, name: &str) {
        self.composites.insert(name.to_string());
    }

    /// Look up a bare or schema-qualified, possibly quoted, type name.
    pub fn lookup(&self, declared: &str) -> Option<TypeCategory> {
        let name = unqualified(declared);
        if self.enums.contains(name) {
            Some(TypeCategory::Enum)
        } else if self.composites.contains(name) {
            Some(TypeCategory::Composite)
        } else {
            None
        }
    }
}

/// Strip type modifiers, schema prefix and identifier quotes: `"Hotel"."RoomKind"` -> `RoomKind`.
fn unqualified(declared: &str) -> &str {
    let base = declared.split('(').next().unwrap_or(declared).trim();
    let last = if base.ends_with('"') {
        match base[..base.len() - 1].rfind('"') {
            Some(open) => &base[open..],
            None => base,
        }
    } else {
        base.rsplit('.').next().unwrap_or(base)
    };
    last.trim_matches('"')
}

/// Classify a declared type such as `numeric(10,2)` or `character varying(40)`.
///
/// Arrays and registered user types are recognised before the built-in
/// families, so `integer[]` is an array and an enum named `room_text` is an
/// enum. Numeric names are matched as whole words so `point` and `interval`
/// are not mistaken for numbers. Never fails: unknown types are `Other`.
pub fn classify(declared: &str, registry: &TypeRegistry) -> TypeCategory {
    let lower = declared.trim().to_lowercase();

    if lower.ends_with("[]") || lower == "array" {
        return TypeCategory::Array;
    }
    if let Some(category) = registry.lookup(declared.trim()) {
        return category;
    }
    if lower.contains("range") {
        return TypeCategory::Other;
    }
    if lower.contains("char") || lower.contains("text") {
        return TypeCategory::Text;
    }
    if lower.contains("bool") {
        return TypeCategory::Boolean;
    }
    if lower.contains("date") || lower.contains("time") || lower.starts_with("interval") {
        return TypeCategory::DateTime;
    }

    let first_word = lower
        .split(|c: char| c == '(' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    if NUMERIC_WORDS.contains(&first_word) {
        return TypeCategory::Numeric;
    }

    TypeCategory::Other
}

static TYPE_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    let word = r#"(?:[A-Za-z_][A-Za-z0-9_]*|"[^"\x00]+")"#;
    let modifiers = r"(?: ?\(\d+(?: ?, ?-?\d+)?\))?";
    let precision = r"(?: ?\(\d+\))?";
    let field = "(?:year|month|day|hour|minute|second)";
    Regex::new(&format!(
        r"(?i)^(?:double precision|(?:character|char|bit) varying{modifiers}|(?:timestamp|time){precision}(?: with(?:out)? time zone)?|interval(?: {field}(?: to {field})?)?{precision}|{word}(?:\.{word})?{modifiers})(?:\[\d*\])*$"
    ))
    .expect("valid regex")
});

/// True if `expr` is a plain type expression safe to splice into DDL.
///
/// Accepts a name with optional schema, one modifier list and array
/// suffixes. The only multi-word forms are the built-ins `double precision`,
/// `character varying`, `bit varying`, `time[stamp] with[out] time zone` and
/// interval fields, so constraint clauses such as `NOT NULL` never pass.
pub fn is_valid_type_expression(expr: &str) -> bool {
    let normalized = expr.split_whitespace().collect::<Vec<_>>().join(" ");
    !normalized.is_empty() && normalized.len() <= 200 && TYPE_EXPRESSION.is_match(&normalized)
}
