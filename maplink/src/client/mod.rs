//! Basemap service client: handle, construction seams and the lazy cache.
//!
//! The client is expensive to construct and is shared process-wide, so it
//! lives behind [`ClientCache`]: the first caller triggers construction,
//! concurrent callers join the in-flight attempt, and every acquisition
//! re-checks the license id against the [`LicenseSource`] so the client's
//! `license` query parameter tracks the externally managed licensing state.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use maplink::client::{ClientCache, SharedLicense, StaticClientFactory};
//! use maplink::http::AsyncReqwestClient;
//!
//! let http = Arc::new(AsyncReqwestClient::new()?);
//! let factory = Arc::new(StaticClientFactory::new("https://basemaps.example.com", http));
//! let license = Arc::new(SharedLicense::new());
//!
//! let cache = ClientCache::new(factory, license);
//! let client = cache.acquire().await?;
//! let layers = client.file_layers().await?;
//! ```

mod cache;
mod error;
mod factory;
mod handle;
mod license;

pub use cache::{ClientCache, LICENSE_PARAM};
pub use error::ClientError;
pub use factory::{ClientFactory, StaticClientFactory};
pub use handle::{BasemapClient, FileLayer, TileService};
pub use license::{LicenseSource, SharedLicense};
