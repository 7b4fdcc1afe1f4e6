//! Logging init: timestamped lines on stdout, filtered by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Defaults to `info` when `RUST_LOG` is unset
/// or unparsable.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stdout)
        .with_target(true)
        .init();
}
