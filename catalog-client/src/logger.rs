//! Logging setup
//!
//! `RUST_LOG` takes precedence over the level passed in.

use tracing_subscriber::EnvFilter;

/// Initialize the logger with default settings
pub fn init_default_logger() {
    init_logger(None, false);
}

/// Initialize the logger
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_logger(log_level: Option<&str>, json: bool) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if result.is_err() {
        tracing::debug!("Logger already initialized");
    }
}
