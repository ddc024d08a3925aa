//! Tracing subscriber setup for the binary

use std::env;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable checked before `RUST_LOG`
pub const LOG_ENV: &str = "SORTFILES_LOG";

/// Filter directive used when no environment variable is set
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info"
    } else {
        "warn"
    }
}

fn filter_from_env(verbose: bool) -> EnvFilter {
    let directive = env::var(LOG_ENV)
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_directive(verbose).to_string());

    EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Install a stderr fmt layer; later calls are ignored
pub fn init_logger(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter_from_env(verbose))
        .try_init();
}
