//! Logging setup
//! Installs the tracing subscriber. `RUST_LOG` takes precedence over the
//! configured filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` if set and valid, otherwise `default_directive`.
pub fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Initialize global logging. Safe to call more than once; later calls are
/// ignored.
pub fn init(default_directive: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default_directive))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
}
