//! Diagnostic logging to stderr

use tracing_subscriber::EnvFilter;

/// Level used when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Install the global subscriber. `level` wins over `RUST_LOG`.
///
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
