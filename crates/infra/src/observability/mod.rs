//! Logging setup
//!
//! Installs a global `tracing` subscriber. `RUST_LOG` wins over the
//! configured level when set.

use std::sync::atomic::{AtomicBool, Ordering};

use dirgraph_domain::LoggingConfig;
use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

static INITIALISED: AtomicBool = AtomicBool::new(false);

/// Build the filter: `RUST_LOG` when set and valid, else `config.level`.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, by this function
/// or anyone else; the call is then a no-op.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    if INITIALISED.swap(true, Ordering::SeqCst) {
        return false;
    }

    let builder = fmt().with_env_filter(env_filter(config)).with_target(true);
    let installed = if config.json {
        builder.json().with_current_span(true).try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, json = config.json, "tracing initialised");
    }
    installed
}
