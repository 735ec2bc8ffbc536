//! HTTP client abstraction for testability
//!
//! The traits here allow for dependency injection: production code uses
//! [`AsyncReqwestClient`] while tests substitute mock clients without any
//! network access.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

/// Default timeout for service requests in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur while talking to the service over HTTP.
///
/// The type is `Clone` so a single failure can be fanned out to multiple
/// callers sharing one in-flight request.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// The client could not be built or the request could not be sent.
    #[error("Request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    Status {
        /// The response status code.
        status: u16,
        /// The requested URL.
        url: String,
    },

    /// The response body could not be read.
    #[error("Failed to read response: {0}")]
    Body(String),
}

/// Trait for HTTP operations against the basemap service.
///
/// This abstraction allows for dependency injection and easier testing
/// by enabling mock HTTP clients in tests.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request and returns the response body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, HttpError>>;

    /// Performs an HTTP HEAD request and returns the response status code.
    ///
    /// No response body is transferred. This is the existence check used by
    /// the font probe; any status code is returned as `Ok`, only transport
    /// failures produce an error.
    fn head(&self, url: &str) -> BoxFuture<'_, Result<u16, HttpError>>;
}

/// Real HTTP client implementation using reqwest.
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new client with the default timeout.
    pub fn new() -> Result<Self, HttpError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    fn get(&self, url: &str) -> BoxFuture<'_, Result<Vec<u8>, HttpError>> {
        let request = self.client.get(url);
        let url = url.to_string();
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| HttpError::Request(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(HttpError::Status {
                    status: status.as_u16(),
                    url,
                });
            }

            response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| HttpError::Body(e.to_string()))
        })
    }

    fn head(&self, url: &str) -> BoxFuture<'_, Result<u16, HttpError>> {
        let request = self.client.head(url);
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| HttpError::Request(e.to_string()))?;

            Ok(response.status().as_u16())
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock HTTP client for testing.
    ///
    /// Records issued requests so tests can assert on call counts, and can
    /// delay responses to exercise in-flight coalescing.
    pub struct MockAsyncHttpClient {
        /// Response returned by `get`.
        pub get_response: Result<Vec<u8>, HttpError>,
        /// Response returned by `head`.
        pub head_response: Result<u16, HttpError>,
        /// Optional artificial latency before responding.
        pub delay: Option<Duration>,
        get_calls: AtomicUsize,
        head_calls: AtomicUsize,
    }

    impl MockAsyncHttpClient {
        /// Creates a mock whose HEAD requests answer with `head_response`.
        pub fn with_head(head_response: Result<u16, HttpError>) -> Self {
            Self {
                get_response: Ok(Vec::new()),
                head_response,
                delay: None,
                get_calls: AtomicUsize::new(0),
                head_calls: AtomicUsize::new(0),
            }
        }

        /// Creates a mock whose GET requests answer with `get_response`.
        pub fn with_get(get_response: Result<Vec<u8>, HttpError>) -> Self {
            Self {
                get_response,
                head_response: Ok(200),
                delay: None,
                get_calls: AtomicUsize::new(0),
                head_calls: AtomicUsize::new(0),
            }
        }

        /// Number of GET requests issued so far.
        pub fn get_calls(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }

        /// Number of HEAD requests issued so far.
        pub fn head_calls(&self) -> usize {
            self.head_calls.load(Ordering::SeqCst)
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        fn get(&self, _url: &str) -> BoxFuture<'_, Result<Vec<u8>, HttpError>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            let response = self.get_response.clone();
            let delay = self.delay;
            Box::pin(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            })
        }

        fn head(&self, _url: &str) -> BoxFuture<'_, Result<u16, HttpError>> {
            self.head_calls.fetch_add(1, Ordering::SeqCst);
            let response = self.head_response.clone();
            let delay = self.delay;
            Box::pin(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            })
        }
    }

    #[tokio::test]
    async fn test_mock_client_get_success() {
        let mock = MockAsyncHttpClient::with_get(Ok(vec![1, 2, 3, 4]));

        let result = mock.get("http://example.com").await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), vec![1, 2, 3, 4]);
        assert_eq!(mock.get_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_head_status() {
        let mock = MockAsyncHttpClient::with_head(Ok(404));

        let result = mock.head("http://example.com").await;
        assert_eq!(result.unwrap(), 404);
        assert_eq!(mock.head_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock =
            MockAsyncHttpClient::with_get(Err(HttpError::Request("Test error".to_string())));

        let result = mock.get("http://example.com").await;
        assert!(result.is_err());
    }

    #[test]
    fn test_http_error_display() {
        let err = HttpError::Status {
            status: 503,
            url: "http://example.com/manifest".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("http://example.com/manifest"));
    }
}
