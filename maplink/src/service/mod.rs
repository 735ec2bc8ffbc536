//! Basemap service facade.
//!
//! [`BasemapService`] wires the settings, the client cache and the font
//! probe into the one type applications hold. Catalogue accessors check the
//! enabled flag before touching the client cache, so a disabled service
//! never constructs a client or issues a request.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use maplink::client::SharedLicense;
//! use maplink::service::BasemapService;
//! use maplink::settings::BasemapSettings;
//!
//! let settings = BasemapSettings::new(
//!     "https://basemaps.example.com",
//!     "https://fonts.example.com/{fontstack}/{range}",
//! );
//! let service = BasemapService::with_defaults(settings, Arc::new(SharedLicense::new()))?;
//!
//! let layers = service.file_layers().await?;
//! let glyphs = service.glyph_url().await;
//! ```

use std::sync::Arc;

use crate::client::{
    BasemapClient, ClientCache, ClientError, ClientFactory, FileLayer, LicenseSource,
    StaticClientFactory, TileService,
};
use crate::fonts::FontProbe;
use crate::http::{AsyncHttpClient, AsyncReqwestClient, HttpError};
use crate::settings::BasemapSettings;

/// Facade over the basemap client cache and font probe.
pub struct BasemapService {
    settings: BasemapSettings,
    cache: ClientCache,
    fonts: FontProbe,
}

impl BasemapService {
    /// Creates a service with explicit collaborator seams.
    ///
    /// # Arguments
    ///
    /// * `settings` - The configuration surface
    /// * `factory` - Constructs the client on first acquisition
    /// * `license` - Source of truth for the active license id
    /// * `http` - HTTP client used by the font probe
    pub fn new(
        settings: BasemapSettings,
        factory: Arc<dyn ClientFactory>,
        license: Arc<dyn LicenseSource>,
        http: Arc<dyn AsyncHttpClient>,
    ) -> Self {
        Self {
            fonts: FontProbe::new(settings.clone(), http),
            cache: ClientCache::new(factory, license),
            settings,
        }
    }

    /// Creates a service with the default HTTP client and factory.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn with_defaults(
        settings: BasemapSettings,
        license: Arc<dyn LicenseSource>,
    ) -> Result<Self, HttpError> {
        let http: Arc<dyn AsyncHttpClient> = Arc::new(AsyncReqwestClient::new()?);
        let factory = Arc::new(StaticClientFactory::new(
            settings.service_origin.clone(),
            Arc::clone(&http),
        ));
        Ok(Self::new(settings, factory, license, http))
    }

    /// Settings this service was created with.
    pub fn settings(&self) -> &BasemapSettings {
        &self.settings
    }

    /// Returns the shared service client, constructing it on first use.
    ///
    /// See [`ClientCache::acquire`] for the coalescing and license refresh
    /// semantics.
    pub async fn client(&self) -> Result<Arc<BasemapClient>, ClientError> {
        self.cache.acquire().await
    }

    /// Vector file layers advertised by the service catalogue.
    ///
    /// Returns an empty list without touching the client cache when the
    /// service is disabled.
    pub async fn file_layers(&self) -> Result<Vec<FileLayer>, ClientError> {
        if !self.settings.enabled {
            return Ok(Vec::new());
        }
        self.client().await?.file_layers().await
    }

    /// Tile services advertised by the service catalogue.
    ///
    /// Returns an empty list without touching the client cache when the
    /// service is disabled.
    pub async fn tile_services(&self) -> Result<Vec<TileService>, ClientError> {
        if !self.settings.enabled {
            return Ok(Vec::new());
        }
        self.client().await?.tile_services().await
    }

    /// Whether the remote font endpoint is reachable.
    pub async fn can_access_fonts(&self) -> bool {
        self.fonts.can_access_fonts().await
    }

    /// Glyph URL template clients should use.
    pub async fn glyph_url(&self) -> String {
        self.fonts.glyph_url().await
    }

    /// Clears the cached font probe result.
    ///
    /// Intended for test isolation.
    pub fn reset_font_probe(&self) {
        self.fonts.reset();
    }
}
