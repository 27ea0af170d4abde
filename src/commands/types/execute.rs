use std::error::Error;

use serde::Serialize;

use super::TypesCmd;
use crate::commands::Execute;
use crate::db::Connection;
use crate::schema::{list_user_types, UserType};

/// Result of the types command execution
#[derive(Debug, Serialize)]
pub struct TypesResult {
    pub schema: String,
    pub types: Vec<UserType>,
}

impl Execute for TypesCmd {
    type Output = TypesResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        let mut types = list_user_types(conn, schema)?;
        if self.enums_only {
            types.retain(|t| matches!(t, UserType::Enum { .. }));
        }
        Ok(TypesResult {
            schema: schema.to_string(),
            types,
        })
    }
}
