//! Error types for form submission

use thiserror::Error;

/// Prefix written in front of every failure shown in the status element
pub const ERROR_PREFIX: &str = "Error: ";

/// Fixed message shown when the form is submitted without a file
pub const NO_FILE_MESSAGE: &str = "Please select a file.";

/// Fallback message when the server response carries no usable error
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed.";

/// Result type for a form submission
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Errors that end a form submission
///
/// Every variant is terminal for the submission it came from. The user
/// resubmits manually; nothing is retried.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// No file was selected; recovered locally without a network call
    #[error("{}", NO_FILE_MESSAGE)]
    NoFileSelected,

    /// The response parsed but did not carry an identifier
    #[error("{0}")]
    ServerReported(String),

    /// The request could not be sent or its body could not be read
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// The response body was not valid JSON
    #[error("{0}")]
    Parse(String),

    /// The identifier could not be written to storage
    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl SubmitError {
    /// Build a server-reported failure, falling back to the fixed message
    /// when the server gave none
    pub fn server_reported(message: Option<&str>) -> Self {
        match message {
            Some(m) if !m.is_empty() => Self::ServerReported(m.to_string()),
            _ => Self::ServerReported(UPLOAD_FAILED_MESSAGE.to_string()),
        }
    }

    /// Text shown in the status element for this error
    pub fn status_text(&self) -> String {
        match self {
            Self::NoFileSelected => NO_FILE_MESSAGE.to_string(),
            other => format!("{}{}", ERROR_PREFIX, other),
        }
    }
}

/// Failures raised by an [`UploadTransport`](crate::UploadTransport)
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection refused, reset, DNS failure and the like
    #[error("{0}")]
    Network(String),

    /// The request did not complete in time
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be read
    #[error("{0}")]
    Body(String),
}

/// Failures raised by a [`KeyValueStore`](crate::KeyValueStore)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed: {0}")]
    Write(String),
}
