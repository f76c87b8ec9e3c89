//! The seams between the submit handler and its surroundings

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::{StorageError, TransportError};
use crate::models::SelectedFile;

/// The form's UI touchpoints: the file input and the status element
pub trait FormView: Send + Sync {
    /// The file currently selected in the input, if any
    fn selected_file(&self) -> Option<SelectedFile>;

    /// Replace the status element's text
    fn set_status_text(&self, text: &str);

    /// Remove the status element's hidden state
    fn reveal_status(&self);
}

/// Durable client-side key-value storage
pub trait KeyValueStore: Send + Sync {
    /// Write `value` under `key`, overwriting any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Read the value under `key`
    fn get(&self, key: &str) -> Option<String>;
}

/// Full-page navigation
pub trait Navigator: Send + Sync {
    /// Leave the current page for `target`
    fn navigate(&self, target: &str);
}

/// A multipart upload of a single file
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Relative endpoint path
    pub path: String,
    /// Multipart field name for the file part
    pub field: String,
    /// The file itself
    pub file: SelectedFile,
}

/// Sends an [`UploadRequest`] and returns the raw response body
///
/// The body is returned whatever the HTTP status is; the form decides
/// success from the JSON, not the status line.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn send(&self, request: UploadRequest) -> Result<Bytes, TransportError>;
}
