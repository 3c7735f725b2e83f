//! Diagnostic tracing for hosts embedding the registry.
//!
//! Engine code emits `tracing` events only. Installing a subscriber is left to
//! the host; [`init`] is the stock choice.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a compact stderr subscriber filtered by `RUST_LOG` (default `warn`).
///
/// Panics if a global subscriber is already set; use [`try_init`] when that can
/// happen.
///
/// # Example
/// ```bash
/// RUST_LOG=rsvplog=debug cargo test
/// ```
pub fn init() {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}

/// Like [`init`], but returns `false` instead of panicking when a subscriber
/// is already installed.
pub fn try_init() -> bool {
    tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init()
        .is_ok()
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}
