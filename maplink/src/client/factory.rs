//! Client construction seam.

use std::sync::Arc;

use tracing::info;

use super::error::ClientError;
use super::handle::BasemapClient;
use crate::http::{AsyncHttpClient, BoxFuture};

/// Trait for constructing the basemap service client.
///
/// The cache invokes the factory at most once per process lifetime (plus
/// once per retry after a failed attempt). Host applications implement this
/// to control how the client is configured; [`StaticClientFactory`] covers
/// the common case of a fixed service origin.
pub trait ClientFactory: Send + Sync {
    /// Constructs a new client instance.
    fn create(&self) -> BoxFuture<'_, Result<BasemapClient, ClientError>>;
}

/// Factory building a client for a configured service origin.
///
/// Construction validates the origin URL; a malformed or non-HTTP origin is
/// a construction failure and surfaces through the cache to every caller.
pub struct StaticClientFactory {
    origin: String,
    http: Arc<dyn AsyncHttpClient>,
}

impl StaticClientFactory {
    /// Creates a factory for the given service origin.
    pub fn new(origin: impl Into<String>, http: Arc<dyn AsyncHttpClient>) -> Self {
        Self {
            origin: origin.into(),
            http,
        }
    }
}

impl ClientFactory for StaticClientFactory {
    fn create(&self) -> BoxFuture<'_, Result<BasemapClient, ClientError>> {
        Box::pin(async move {
            let url = reqwest::Url::parse(&self.origin).map_err(|e| {
                ClientError::Construction(format!(
                    "Invalid service origin '{}': {}",
                    self.origin, e
                ))
            })?;

            if !matches!(url.scheme(), "http" | "https") {
                return Err(ClientError::Construction(format!(
                    "Unsupported service origin scheme '{}'",
                    url.scheme()
                )));
            }

            info!(origin = %self.origin, "Constructed basemap client");
            Ok(BasemapClient::new(
                self.origin.clone(),
                Arc::clone(&self.http),
            ))
        })
    }
}
