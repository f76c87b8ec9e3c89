//! Error types for upload client operations

use thiserror::Error;
use upload_core::TransportError;

/// Result type alias for upload client operations
pub type Result<T> = std::result::Result<T, UploadClientError>;

/// Errors that can occur during upload client operations
#[derive(Error, Debug)]
pub enum UploadClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// A duration does not fit the configuration's millisecond fields
    #[error("Invalid timeout: {0:?}")]
    InvalidTimeout(std::time::Duration),
}

impl From<UploadClientError> for TransportError {
    fn from(err: UploadClientError) -> Self {
        match err {
            UploadClientError::HttpError(e) if e.is_timeout() => TransportError::Timeout,
            UploadClientError::HttpError(e) if e.is_body() || e.is_decode() => {
                TransportError::Body(e.to_string())
            }
            other => TransportError::Network(other.to_string()),
        }
    }
}
