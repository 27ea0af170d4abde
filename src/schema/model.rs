//! In-memory snapshot of table and type metadata.
//!
//! Values are built fresh by each catalog call and never mutated afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::classify::TypeCategory;

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FkAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl FkAction {
    pub fn sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }

    /// Decode `pg_constraint.confdeltype` / `confupdtype`.
    pub fn from_catalog_code(code: &str) -> Option<Self> {
        match code {
            "a" => Some(Self::NoAction),
            "r" => Some(Self::Restrict),
            "c" => Some(Self::Cascade),
            "n" => Some(Self::SetNull),
            "d" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

impl fmt::Display for FkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

impl FromStr for FkAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_uppercase()
            .replace(['_', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "NO ACTION" => Ok(Self::NoAction),
            "RESTRICT" => Ok(Self::Restrict),
            "CASCADE" => Ok(Self::Cascade),
            "SET NULL" => Ok(Self::SetNull),
            "SET DEFAULT" => Ok(Self::SetDefault),
            _ => Err(format!("unknown referential action '{s}'")),
        }
    }
}

impl TryFrom<String> for FkAction {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FkAction> for String {
    fn from(action: FkAction) -> Self {
        action.sql().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForeignKey {
    pub name: String,
    pub local_column: String,
    pub ref_schema: String,
    pub ref_table: String,
    pub ref_column: String,
    pub on_delete: FkAction,
    pub on_update: FkAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
    Check,
}

impl ConstraintKind {
    pub fn from_catalog_code(code: &str) -> Option<Self> {
        match code {
            "p" => Some(Self::PrimaryKey),
            "u" => Some(Self::Unique),
            "f" => Some(Self::ForeignKey),
            "c" => Some(Self::Check),
            _ => None,
        }
    }
}

/// A named table constraint, listed so callers can pick names to drop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintInfo {
    pub name: String,
    pub kind: ConstraintKind,
    pub columns: Vec<String>,
    pub definition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub declared_type: String,
    pub category: TypeCategory,
    pub nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_expression: Option<String>,
    /// Character limit; only set for length-limited text types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    pub is_primary_key: bool,
    /// Every UNIQUE constraint this column takes part in, as its full column list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unique_groups: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub check_clauses: Vec<String>,
    /// Ordered labels; non-empty only for enum columns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enum_labels: Vec<String>,
}

impl ColumnMetadata {
    /// A column with only name and type set; the catalog fills in the rest.
    pub fn new(name: &str, declared_type: &str, category: TypeCategory) -> Self {
        Self {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            category,
            nullable: true,
            default_expression: None,
            max_length: None,
            is_primary_key: false,
            unique_groups: Vec::new(),
            foreign_keys: Vec::new(),
            check_clauses: Vec::new(),
            enum_labels: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableMetadata {
    pub schema: String,
    pub name: String,
    pub columns: Vec<ColumnMetadata>,
    pub constraints: Vec<ConstraintInfo>,
}

impl TableMetadata {
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary key column names in key order.
    pub fn primary_key(&self) -> Vec<&str> {
        self.constraints
            .iter()
            .find(|c| c.kind == ConstraintKind::PrimaryKey)
            .map(|c| c.columns.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeField {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expression: String,
}

/// A user-defined enum or composite type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum UserType {
    Enum { name: String, labels: Vec<String> },
    Composite { name: String, fields: Vec<CompositeField> },
}

impl UserType {
    pub fn name(&self) -> &str {
        match self {
            Self::Enum { name, .. } | Self::Composite { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewInfo {
    pub name: String,
    pub materialized: bool,
    pub definition: String,
}

/// Key/label pair offered when picking a referenced row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceValue {
    pub key: String,
    pub label: String,
}
