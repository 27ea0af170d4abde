mod execute;
mod output;
mod output_tests;

use clap::Args;

/// Show columns, keys and constraints of a table
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk describe rooms                # Columns and constraints of rooms
  pgdesk describe stays -o json        # Full metadata as JSON
  pgdesk --schema archive describe stays")]
pub struct DescribeCmd {
    /// Table to describe
    pub table: String,
}
