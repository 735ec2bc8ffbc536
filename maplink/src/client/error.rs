//! Client error types.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur while constructing or using the service client.
///
/// The type is `Clone` so one construction failure can be fanned out to
/// every caller joined on the in-flight future.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The client could not be constructed.
    #[error("Failed to construct basemap client: {0}")]
    Construction(String),

    /// A request to the service failed.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The catalogue manifest could not be parsed.
    #[error("Invalid catalogue manifest: {0}")]
    Manifest(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Construction("origin unreachable".to_string());
        assert!(err.to_string().contains("Failed to construct"));
        assert!(err.to_string().contains("origin unreachable"));
    }

    #[test]
    fn test_client_error_from_http() {
        let http_err = HttpError::Request("connection refused".to_string());
        let err: ClientError = http_err.into();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
