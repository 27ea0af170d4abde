//! Log setup for the binary.
//!
//! Library code only emits `tracing` events; the subscriber is installed once
//! here. Logs go to stderr so command output on stdout stays parseable.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive, e.g. `pgdesk=trace`.
pub const LOG_ENV: &str = "PGDESK_LOG";

/// Filter used when `PGDESK_LOG` is unset or invalid.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "pgdesk=warn",
        1 => "pgdesk=debug,warn",
        _ => "pgdesk=trace,info",
    }
}

/// Install the global subscriber. Safe to call more than once; later calls are ignored.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
