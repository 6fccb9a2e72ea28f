//! Log output setup for hosts that do not install their own subscriber
//!
//! The crate emits through both `log` and `tracing`. [`init`] installs a `tracing` formatter
//! that also picks up `log` records, filtered by the `PMT_METRICS_LOG` environment variable.

use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_LOG_FILTER, LOG_ENV};

/// Installs the global subscriber, filtered by `PMT_METRICS_LOG` or `warn` when unset
///
/// Returns false if a global subscriber was already installed.
pub fn init() -> bool {
    init_with_default(DEFAULT_LOG_FILTER)
}

/// Like [`init`], with `default_filter` used when `PMT_METRICS_LOG` is unset or invalid
pub fn init_with_default(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).with_thread_names(true).try_init().is_ok()
}
