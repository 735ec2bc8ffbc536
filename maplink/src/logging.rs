//! Tracing subscriber initialization.
//!
//! Installs a fmt subscriber honoring `RUST_LOG`, defaulting to `info`.
//! Host applications with their own subscriber simply skip this module.

use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber, defaulting to `info` level.
///
/// Ignores the error when a subscriber is already installed, so it is safe
/// to call from tools and tests alike.
pub fn init() {
    let _ = try_init();
}

/// Installs the global fmt subscriber, reporting failure.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn try_init() -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| e.to_string())
}
