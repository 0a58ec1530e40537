//! Diagnostic logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! binary's job. Logs go to stderr so they never mix with rendered output.
//!
//! Level selection, first match wins:
//! 1. `BOOKSHELF_LOG`, in `EnvFilter` syntax (e.g. `bookshelf=debug,reqwest=info`)
//! 2. the `-v` count: none → `warn`, `-v` → `info`, `-vv` or more → `debug`

use crate::error::{CatalogError, Result};
use std::io;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const LOG_ENV: &str = "BOOKSHELF_LOG";

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn build_filter(verbosity: u8) -> Result<EnvFilter> {
    let filter_string = match std::env::var(LOG_ENV) {
        Ok(custom) if !custom.trim().is_empty() => custom,
        _ => {
            let level = level_for(verbosity);
            format!(
                "{}={},reqwest=warn,hyper=warn",
                env!("CARGO_PKG_NAME"),
                level
            )
        }
    };

    EnvFilter::try_new(filter_string)
        .map_err(|e| CatalogError::Config(format!("Invalid log filter: {}", e)))
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let filter = build_filter(verbosity)?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(io::stderr);

    // try_init fails only when a subscriber is already installed.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
    Ok(())
}
