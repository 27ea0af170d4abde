mod execute;
mod output;
mod output_tests;

use clap::Args;

/// List tables in the schema
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk tables                        # Tables in the configured schema
  pgdesk --schema front_desk tables    # Tables in another schema
  pgdesk tables -o json                # Machine-readable list")]
pub struct TablesCmd {}
