//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SNIPCTX_LOG";
const DEFAULT_FILTER: &str = "warn";

/// Install a stderr `fmt` subscriber filtered by `SNIPCTX_LOG`.
///
/// Calling this more than once is harmless; later calls keep the first subscriber.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
