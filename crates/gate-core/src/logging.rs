//! Logging initialization.
//!
//! All crates in the workspace use standard `tracing` macros; this is the
//! single place a subscriber is installed.

use tracing_subscriber::EnvFilter;

/// Initialize the logging system.
///
/// Sets up a fmt subscriber with a level filter taken from `RUST_LOG`,
/// falling back to the provided default. Safe to call more than once;
/// subsequent calls are no-ops.
///
/// # Example
///
/// ```ignore
/// init_logging("info");
/// tracing::info!("gate started");
/// ```
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    // try_init so tests and embedders that already installed a subscriber
    // don't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
