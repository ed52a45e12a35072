//! Logging setup

use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// Initialize tracing for the process. Falls back to `info` when the
/// configured filter does not parse.
pub fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|e| {
        eprintln!("invalid log filter `{}` ({e}), using `info`", config.log_filter);
        EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    debug!(filter = %config.log_filter, "logging initialized");
}
