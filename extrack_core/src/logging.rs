//! Tracing setup for the `extrack` binary.
//!
//! Log lines go to stderr. Stdout is reserved for the JSON or CSV a command
//! prints, so piping `extrack log <id>` into another tool never picks up
//! diagnostics.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber
///
/// `default_level` is the `[logging] level` value from `extrack/config.toml`
/// (`"info"` unless configured). A set `RUST_LOG` replaces it entirely.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Debug-level output routed through the test harness
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
