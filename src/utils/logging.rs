//! Logging setup.

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber. `RUST_LOG` overrides the default
/// `info` level. Safe to call more than once (tests share a process).
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .try_init();
}
