use std::error::Error;

use serde::Serialize;

use super::ViewsCmd;
use crate::commands::Execute;
use crate::db::Connection;
use crate::schema::{list_views, ViewInfo};

/// Result of the views command execution
#[derive(Debug, Serialize)]
pub struct ViewsResult {
    pub schema: String,
    #[serde(skip)]
    pub show_definitions: bool,
    pub views: Vec<ViewInfo>,
}

impl Execute for ViewsCmd {
    type Output = ViewsResult;

    fn execute(self, conn: &mut dyn Connection, schema: &str) -> Result<Self::Output, Box<dyn Error>> {
        let mut views = list_views(conn, schema)?;
        if self.materialized {
            views.retain(|v| v.materialized);
        }
        Ok(ViewsResult {
            schema: schema.to_string(),
            show_definitions: self.definitions,
            views,
        })
    }
}
