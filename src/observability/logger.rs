//! Tracing subscriber setup
//!
//! Logs go to stderr so that command output on stdout stays clean.
//! `TAGPACK_LOG` takes an `EnvFilter` directive and overrides `-v`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a filter directive
pub const LOG_ENV: &str = "TAGPACK_LOG";

/// Filter directive for a `-v` count
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "tagpack=warn",
        1 => "tagpack=info",
        2 => "tagpack=debug",
        _ => "tagpack=trace,debug",
    }
}

/// Installs the global fmt subscriber.
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
