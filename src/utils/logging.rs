//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Log output goes to stderr so stdout carries only the stage messages.
//!
//! # Log Levels
//!
//! - `error`: only with `--quiet`
//! - `warn`: default
//! - `info`: `-v`, pipeline stages and transform totals
//! - `debug`: `-vv`, per-column decisions
//! - `trace`: `-vvv`
//!
//! `RUST_LOG` takes precedence over the flags when set.

use anyhow::{anyhow, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map `-v` count and `--quiet` to a level
pub fn level_from_flags(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber. Call once, from `main`.
pub fn init_logging(level: Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))
}
