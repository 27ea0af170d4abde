mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

use crate::commands::validate_file_exists;

/// Render (and run) a SELECT from a JSON query descriptor
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk query --spec lux_rooms.json              # Render and run the query
  pgdesk query --spec lux_rooms.json --sql-only   # Only print the SQL
  pgdesk query -s revenue.json -o json            # Rows as JSON

Descriptor format:
  {\"source\": {\"table\": \"rooms\"},
   \"predicates\": [{\"column\": \"comfort\", \"op\": \"=\", \"value\": \"lux\"}],
   \"limit\": 10}")]
pub struct QueryCmd {
    /// Path to the JSON query descriptor
    #[arg(short, long, value_parser = validate_file_exists)]
    pub spec: PathBuf,

    /// Render the statement without running it
    #[arg(long, default_value_t = false)]
    pub sql_only: bool,
}
