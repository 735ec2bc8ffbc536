//! Maplink - license-aware client plumbing for remote basemap services
//!
//! This library links an application to a remote basemap provisioning
//! service (vector/raster tile catalogues plus a font glyph endpoint). Its
//! core is a lazy, request-coalesced client cache that keeps the service's
//! `license` query parameter in sync with an external source of truth, and
//! a one-shot font reachability probe with a local fallback for glyph URLs.
//!
//! # Modules
//!
//! - [`client`] - the service client handle, construction seams and the
//!   lazy cache
//! - [`fonts`] - font endpoint reachability probe and glyph URL resolution
//! - [`http`] - HTTP client abstraction used by everything above
//! - [`service`] - the [`service::BasemapService`] facade applications hold
//! - [`settings`] - the configuration surface
//! - [`logging`] - tracing subscriber initialization

pub mod client;
pub mod fonts;
pub mod http;
pub mod logging;
pub mod service;
pub mod settings;

/// Crate version string, as reported by diagnostics and the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_not_empty() {
        assert!(!VERSION.is_empty(), "Version should not be empty");
    }
}
