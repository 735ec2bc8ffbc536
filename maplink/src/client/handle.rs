//! The basemap service client handle.
//!
//! [`BasemapClient`] is an opaque handle to a configured connection to the
//! remote basemap service. Production code obtains it through the client
//! cache, which constructs it at most once per process; the handle itself
//! carries the service origin, a mutable query-parameter table and the
//! catalogue accessors.
//!
//! Query parameters (notably the license id) are mutated in place on the
//! shared handle. Every mutation bumps a revision counter so callers can
//! detect parameter changes without diffing the table.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::ClientError;
use crate::http::AsyncHttpClient;

/// Path of the catalogue manifest below the service origin.
const MANIFEST_PATH: &str = "/manifest";

/// A vector file layer advertised by the service catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileLayer {
    /// Stable layer identifier, e.g. `world_countries`.
    pub id: String,

    /// Human-readable layer name.
    #[serde(default)]
    pub name: String,

    /// Attribution required when the layer is displayed.
    #[serde(default)]
    pub attribution: Option<String>,

    /// URL of the layer data, relative to the service origin.
    #[serde(default)]
    pub url: Option<String>,
}

/// A tile service advertised by the service catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileService {
    /// Stable service identifier, e.g. `road_map`.
    pub id: String,

    /// Human-readable service name.
    #[serde(default)]
    pub name: String,

    /// Tile URL template with `{x}`, `{y}` and `{z}` placeholders.
    #[serde(default)]
    pub url_template: Option<String>,
}

/// The catalogue manifest document served at the service origin.
///
/// Unknown fields are ignored so the service can grow its catalogue format
/// without breaking older clients.
#[derive(Debug, Clone, Default, Deserialize)]
struct CatalogueManifest {
    #[serde(default)]
    layers: Vec<FileLayer>,

    #[serde(default)]
    services: Vec<TileService>,
}

/// Opaque handle to a configured basemap service connection.
///
/// Constructed by a [`ClientFactory`](super::ClientFactory) and cached by
/// [`ClientCache`](super::ClientCache); applications normally receive it as
/// `Arc<BasemapClient>` from the cache rather than constructing their own.
pub struct BasemapClient {
    /// Service root URL, without a trailing slash.
    origin: String,

    /// HTTP client shared with the rest of the crate.
    http: Arc<dyn AsyncHttpClient>,

    /// Query parameters attached to every catalogue request.
    query: RwLock<BTreeMap<String, String>>,

    /// Bumped on every query parameter mutation.
    revision: AtomicU64,
}

impl std::fmt::Debug for BasemapClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasemapClient")
            .field("origin", &self.origin)
            .field("query", &self.query)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}

impl BasemapClient {
    /// Creates a handle for the given service origin.
    ///
    /// # Arguments
    ///
    /// * `origin` - Service root URL; a trailing slash is stripped
    /// * `http` - HTTP client used for catalogue requests
    pub fn new(origin: impl Into<String>, http: Arc<dyn AsyncHttpClient>) -> Self {
        let origin = origin.into();
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            http,
            query: RwLock::new(BTreeMap::new()),
            revision: AtomicU64::new(0),
        }
    }

    /// Service root URL.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Sets a query parameter, replacing any previous value.
    pub fn set_query_param(&self, name: &str, value: &str) {
        self.query
            .write()
            .insert(name.to_string(), value.to_string());
        self.revision.fetch_add(1, Ordering::Relaxed);
        debug!(name, value, "Updated client query parameter");
    }

    /// Returns a snapshot of the current query parameters.
    pub fn query_params(&self) -> BTreeMap<String, String> {
        self.query.read().clone()
    }

    /// Number of query parameter mutations applied to this handle.
    ///
    /// Lets callers detect parameter changes cheaply, without keeping and
    /// diffing a copy of the table.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Relaxed)
    }

    /// Builds a service URL with the current query parameters appended.
    ///
    /// # Arguments
    ///
    /// * `path` - Path below the service origin, starting with `/`
    pub fn url_with_params(&self, path: &str) -> String {
        let mut url = format!("{}{}", self.origin, path);
        let query = self.query.read();
        let mut separator = '?';
        for (name, value) in query.iter() {
            url.push(separator);
            url.push_str(name);
            url.push('=');
            url.push_str(value);
            separator = '&';
        }
        url
    }

    /// Fetches and parses the service catalogue manifest.
    async fn manifest(&self) -> Result<CatalogueManifest, ClientError> {
        let url = self.url_with_params(MANIFEST_PATH);
        let body = self.http.get(&url).await?;
        serde_json::from_slice(&body).map_err(|e| ClientError::Manifest(e.to_string()))
    }

    /// Lists the vector file layers advertised by the service.
    pub async fn file_layers(&self) -> Result<Vec<FileLayer>, ClientError> {
        Ok(self.manifest().await?.layers)
    }

    /// Lists the tile services advertised by the service.
    pub async fn tile_services(&self) -> Result<Vec<TileService>, ClientError> {
        Ok(self.manifest().await?.services)
    }
}
