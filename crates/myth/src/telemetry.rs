//! Logging bootstrap for binaries.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter (`info`, `myth=debug`, ...).
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Installs a `fmt` subscriber filtered by `LOG_LEVEL`, falling back to
/// `default_filter` when unset or unparsable.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_tracing(default_filter: &str) {
    let filter = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(env = LOG_LEVEL_ENV, "Tracing initialized");
    }
}
