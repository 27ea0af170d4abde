mod execute;
mod output;

use std::path::PathBuf;

use clap::Args;

use crate::commands::validate_file_exists;

/// Apply a structural change from a JSON change descriptor
#[derive(Args, Debug)]
#[command(after_help = "\
Examples:
  pgdesk alter --spec add_floor.json              # Apply in its own transaction
  pgdesk alter --spec add_floor.json --dry-run    # Only print the statement

Descriptor format:
  {\"change\": \"add_column\", \"table\": \"rooms\", \"name\": \"floor\",
   \"type\": \"integer\", \"nullable\": false, \"default\": \"1\"}

Other changes: drop_column, rename_column, rename_table, change_column_type,
set_not_null, add_unique, drop_unique, add_foreign_key, drop_foreign_key,
add_check, drop_check, create_enum_type, add_enum_value, drop_enum_value,
create_composite_type, drop_type")]
pub struct AlterCmd {
    /// Path to the JSON change descriptor
    #[arg(short, long, value_parser = validate_file_exists)]
    pub spec: PathBuf,

    /// Render the statement without applying it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
