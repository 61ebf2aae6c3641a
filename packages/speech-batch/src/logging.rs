//! Diagnostic logging setup.
//!
//! Logs go to stderr so the per-job console report on stdout stays clean.
//! `RUST_LOG` wins over the verbosity flags when it is set.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directive for a given `-v`/`-q` balance.
pub fn default_directive(verbosity: i8) -> &'static str {
    match verbosity {
        i8::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Calling it twice is not an error.
pub fn init_tracing(verbosity: i8) -> Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(value) if !value.trim().is_empty() => EnvFilter::try_new(&value)
            .with_context(|| format!("invalid {} directive: {value}", EnvFilter::DEFAULT_ENV))?,
        _ => EnvFilter::try_new(default_directive(verbosity))
            .context("failed to build default log filter")?,
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
    Ok(())
}
