//! Basemap service settings.
//!
//! `BasemapSettings` is the configuration surface handed to the service
//! facade. It is a plain value type with builder-style setters so host
//! applications can construct it from whatever configuration layer they
//! use; the serde derives keep it loadable from config files directly.

use serde::{Deserialize, Serialize};

/// Path under which the host application serves fonts locally when the
/// remote endpoint is unreachable or the service is disabled.
pub const FONTS_API_PATH: &str = "api/fonts";

/// Default documentation page referenced by diagnostics.
pub const DEFAULT_DOCS_URL: &str = "https://github.com/maplink/maplink#readme";

/// Basemap service settings.
///
/// # Example
///
/// ```ignore
/// use maplink::settings::BasemapSettings;
///
/// let settings = BasemapSettings::new(
///     "https://basemaps.example.com",
///     "https://fonts.example.com/{fontstack}/{range}",
/// )
/// .with_base_path("/app");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasemapSettings {
    /// Whether the remote basemap service may be contacted at all.
    pub enabled: bool,

    /// Root URL of the basemap service.
    pub service_origin: String,

    /// Font library URL template with `{fontstack}` and `{range}`
    /// placeholders.
    pub font_library_url: String,

    /// Path prefix prepended to locally served fallback URLs.
    pub base_path: String,

    /// Documentation page referenced when the font endpoint is unreachable.
    pub docs_url: String,
}

impl BasemapSettings {
    /// Creates settings for an enabled service with no base path.
    ///
    /// # Arguments
    ///
    /// * `service_origin` - Root URL of the basemap service
    /// * `font_library_url` - Font URL template with placeholders
    pub fn new(service_origin: impl Into<String>, font_library_url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            service_origin: service_origin.into(),
            font_library_url: font_library_url.into(),
            base_path: String::new(),
            docs_url: DEFAULT_DOCS_URL.to_string(),
        }
    }

    /// Enables or disables the remote service.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the path prefix for locally served fallback URLs.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Sets the documentation page referenced by diagnostics.
    pub fn with_docs_url(mut self, docs_url: impl Into<String>) -> Self {
        self.docs_url = docs_url.into();
        self
    }

    /// Prepends the configured base path to a locally served path.
    ///
    /// The result always contains exactly one slash between the two parts;
    /// an empty base path returns the path unchanged.
    pub fn prepend_base_path(&self, path: &str) -> String {
        let base = self.base_path.trim_end_matches('/');
        if base.is_empty() {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BasemapSettings {
        BasemapSettings::new(
            "https://basemaps.example.com",
            "https://fonts.example.com/{fontstack}/{range}",
        )
    }

    #[test]
    fn test_new_defaults() {
        let s = settings();
        assert!(s.enabled);
        assert!(s.base_path.is_empty());
        assert_eq!(s.docs_url, DEFAULT_DOCS_URL);
    }

    #[test]
    fn test_builder_setters() {
        let s = settings().with_enabled(false).with_base_path("/app");
        assert!(!s.enabled);
        assert_eq!(s.base_path, "/app");
    }

    #[test]
    fn test_prepend_base_path_empty_base() {
        let s = settings();
        assert_eq!(s.prepend_base_path("/api/fonts"), "/api/fonts");
    }

    #[test]
    fn test_prepend_base_path_normalizes_slashes() {
        let s = settings().with_base_path("/app/");
        assert_eq!(s.prepend_base_path("/api/fonts"), "/app/api/fonts");
        assert_eq!(s.prepend_base_path("api/fonts"), "/app/api/fonts");
    }

    #[test]
    fn test_settings_roundtrip_serde() {
        let s = settings().with_base_path("/app");
        let json = serde_json::to_string(&s).unwrap();
        let back: BasemapSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
