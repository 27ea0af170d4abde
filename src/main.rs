use clap::Parser;
use tracing::debug;

use pgdesk::cli::Args;
use pgdesk::config::ConfigFile;
use pgdesk::db::{DatabaseConfig, DEFAULT_SCHEMA};
use pgdesk::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config_file = ConfigFile::discover()?;
    let database = DatabaseConfig::resolve(args.url.as_deref(), config_file.as_ref())?;
    let schema = args
        .schema
        .or_else(|| config_file.map(|c| c.schema))
        .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());
    debug!(server = %database.target(), schema = %schema, "Resolved connection settings");

    let mut conn = database.connect()?;
    let output = args.command.run(&mut conn, &schema, args.format)?;
    println!("{}", output);
    Ok(())
}
