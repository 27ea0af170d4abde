mod execute;
mod output;

use clap::Args;

/// Show key/label pairs of a table for picking foreign key values
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk refs rooms                    # Room ids with the first text column as label
  pgdesk refs rooms --label comfort    # Label rows by a chosen column
  pgdesk refs stays -l 20              # First 20 stays by key")]
pub struct RefsCmd {
    /// Referenced table; must have a single-column primary key
    pub table: String,

    /// Column shown next to each key (defaults to the first text column)
    #[arg(long)]
    pub label: Option<String>,

    /// Maximum number of rows to return (1-1000)
    #[arg(short, long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..=1000))]
    pub limit: u32,
}
