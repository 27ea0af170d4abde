mod execute;
mod output;

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::commands::validate_file_exists;

/// Create, refresh or drop views, or run a query as a CTE
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk view create lux_rooms --spec lux_rooms.json           # CREATE OR REPLACE VIEW
  pgdesk view create revenue --spec revenue.json --materialized
  pgdesk view refresh revenue                                   # REFRESH MATERIALIZED VIEW
  pgdesk view drop revenue --materialized --cascade
  pgdesk view cte recent --spec recent_stays.json               # WITH recent AS (...) SELECT * FROM recent")]
pub struct ViewCmd {
    #[command(subcommand)]
    pub action: ViewAction,
}

#[derive(Subcommand, Debug)]
pub enum ViewAction {
    /// Save a query descriptor as a view
    Create {
        /// View name
        name: String,

        /// Path to the JSON query descriptor
        #[arg(short, long, value_parser = validate_file_exists)]
        spec: PathBuf,

        /// Create a materialized view instead of a plain one
        #[arg(short, long, default_value_t = false)]
        materialized: bool,
    },

    /// Recompute a materialized view
    Refresh {
        /// Materialized view name
        name: String,
    },

    /// Drop a view if it exists
    Drop {
        /// View name
        name: String,

        /// The view is materialized
        #[arg(short, long, default_value_t = false)]
        materialized: bool,

        /// Also drop objects that depend on the view
        #[arg(long, default_value_t = false)]
        cascade: bool,
    },

    /// Run a query descriptor wrapped in a named common table expression
    Cte {
        /// Name of the common table expression
        name: String,

        /// Path to the JSON query descriptor
        #[arg(short, long, value_parser = validate_file_exists)]
        spec: PathBuf,

        /// Render the statement without running it
        #[arg(long, default_value_t = false)]
        sql_only: bool,
    },
}
