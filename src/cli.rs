//! CLI argument definitions.
//!
//! This module contains the top-level CLI structure and the global options.
//! Individual command definitions are in the `commands` module.

use clap::{ArgAction, Parser};

use crate::commands::Command;
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Connection string, e.g. postgres://user@localhost/hotel
    /// (falls back to the config file, then DATABASE_URL, then localhost defaults)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Schema to work in (falls back to the config file, then "public")
    #[arg(long, global = true)]
    pub schema: Option<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    /// Increase log detail (-v debug, -vv trace); PGDESK_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_global_defaults() {
        let args = Args::try_parse_from(["pgdesk", "tables"]).unwrap();
        assert_eq!(args.url, None);
        assert_eq!(args.schema, None);
        assert_eq!(args.format, OutputFormat::Table);
        assert_eq!(args.verbose, 0);
    }

    #[rstest]
    #[case(&["pgdesk", "-o", "json", "tables"], OutputFormat::Json)]
    #[case(&["pgdesk", "tables", "--format", "toon"], OutputFormat::Toon)]
    fn test_format_flag(#[case] argv: &[&str], #[case] expected: OutputFormat) {
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.format, expected);
    }

    #[rstest]
    fn test_verbosity_counts() {
        let args = Args::try_parse_from(["pgdesk", "-vv", "types"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[rstest]
    fn test_url_and_schema_are_global() {
        let args = Args::try_parse_from([
            "pgdesk",
            "describe",
            "stays",
            "--url",
            "postgres://localhost/hotel",
            "--schema",
            "archive",
        ])
        .unwrap();
        assert_eq!(args.url.as_deref(), Some("postgres://localhost/hotel"));
        assert_eq!(args.schema.as_deref(), Some("archive"));
    }

    #[rstest]
    fn test_invalid_format_rejected() {
        assert!(Args::try_parse_from(["pgdesk", "-o", "xml", "tables"]).is_err());
    }
}
