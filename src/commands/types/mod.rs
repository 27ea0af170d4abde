mod execute;
mod output;

use clap::Args;

/// List user-defined enum and composite types
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk types                         # Enum and composite types in the schema
  pgdesk types --enums-only            # Only enum types, with their labels")]
pub struct TypesCmd {
    /// Only show enum types
    #[arg(long, default_value_t = false)]
    pub enums_only: bool,
}
