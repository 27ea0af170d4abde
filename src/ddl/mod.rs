//! Structural changes: ALTER TABLE, CREATE TYPE and ALTER TYPE.
//!
//! A [`ChangeSpec`] is rendered to exactly one statement by [`render_change`]
//! and applied by [`Mutator`] inside its own transaction.

mod mutator;
mod render;

pub use mutator::{Mutator, MIN_DROP_ENUM_VALUE_VERSION};
pub use render::{check_constraint_name, foreign_key_name, render_change, unique_constraint_name, ChangeContext};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DbError;
use crate::queries::{BuildError, Operator};
use crate::schema::{CompositeField, FkAction, IntrospectionError};

/// Condition of an `AddCheck` change, compared like a WHERE filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckExpression {
    pub column: String,
    pub op: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
}

/// One structural change, tagged by `change` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ChangeSpec {
    AddColumn {
        table: String,
        name: String,
        #[serde(rename = "type")]
        type_expression: String,
        #[serde(default = "default_true")]
        nullable: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<String>,
    },
    DropColumn {
        table: String,
        name: String,
        #[serde(default)]
        cascade: bool,
    },
    RenameColumn {
        table: String,
        old: String,
        new: String,
    },
    RenameTable {
        old: String,
        new: String,
    },
    ChangeColumnType {
        table: String,
        name: String,
        new_type: String,
    },
    SetNotNull {
        table: String,
        name: String,
        flag: bool,
    },
    AddUnique {
        table: String,
        columns: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    DropUnique {
        table: String,
        constraint_name: String,
    },
    AddForeignKey {
        table: String,
        local_column: String,
        ref_table: String,
        ref_column: String,
        #[serde(default)]
        on_delete: FkAction,
        #[serde(default)]
        on_update: FkAction,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    DropForeignKey {
        table: String,
        constraint_name: String,
    },
    AddCheck {
        table: String,
        expression: CheckExpression,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    DropCheck {
        table: String,
        constraint_name: String,
    },
    CreateEnumType {
        name: String,
        labels: Vec<String>,
    },
    AddEnumValue {
        type_name: String,
        value: String,
    },
    DropEnumValue {
        type_name: String,
        value: String,
    },
    CreateCompositeType {
        name: String,
        fields: Vec<CompositeField>,
    },
    DropType {
        name: String,
        #[serde(default)]
        cascade: bool,
    },
}

fn default_true() -> bool {
    true
}

impl ChangeSpec {
    /// Short name of the change kind, as used in JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddColumn { .. } => "add_column",
            Self::DropColumn { .. } => "drop_column",
            Self::RenameColumn { .. } => "rename_column",
            Self::RenameTable { .. } => "rename_table",
            Self::ChangeColumnType { .. } => "change_column_type",
            Self::SetNotNull { .. } => "set_not_null",
            Self::AddUnique { .. } => "add_unique",
            Self::DropUnique { .. } => "drop_unique",
            Self::AddForeignKey { .. } => "add_foreign_key",
            Self::DropForeignKey { .. } => "drop_foreign_key",
            Self::AddCheck { .. } => "add_check",
            Self::DropCheck { .. } => "drop_check",
            Self::CreateEnumType { .. } => "create_enum_type",
            Self::AddEnumValue { .. } => "add_enum_value",
            Self::DropEnumValue { .. } => "drop_enum_value",
            Self::CreateCompositeType { .. } => "create_composite_type",
            Self::DropType { .. } => "drop_type",
        }
    }
}

#[derive(Error, Debug)]
pub enum MutationError {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("{feature} {} (server reports {actual})", version_requirement(.required))]
    UnsupportedServerVersion {
        feature: &'static str,
        required: u32,
        actual: u32,
    },

    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    #[error(transparent)]
    Db(#[from] DbError),
}

fn version_requirement(required: &u32) -> String {
    if *required == u32::MAX {
        "is not supported by any server version".to_string()
    } else {
        format!("requires server version {required} or later")
    }
}
