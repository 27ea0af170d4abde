mod cli_tests;
mod execute;
mod output;

use clap::Args;

/// List views and materialized views
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk views                         # All views in the schema
  pgdesk views --materialized          # Only materialized views
  pgdesk views --definitions           # Include each view's SELECT")]
pub struct ViewsCmd {
    /// Only show materialized views
    #[arg(short, long, default_value_t = false)]
    pub materialized: bool,

    /// Show the stored definition under each view
    #[arg(short, long, default_value_t = false)]
    pub definitions: bool,
}
