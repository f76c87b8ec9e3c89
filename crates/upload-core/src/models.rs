//! Data model for a single form submission

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{SubmitError, SubmitResult};

// =============================================================================
// Contract Defaults
// =============================================================================

/// Endpoint the file is posted to
pub const DEFAULT_UPLOAD_PATH: &str = "/upload";

/// Multipart field name carrying the file
pub const DEFAULT_FILE_FIELD: &str = "file";

/// Storage key the next page reads the identifier from
pub const DEFAULT_STORAGE_KEY: &str = "uploaded_filename";

/// Page navigated to after a successful upload
pub const DEFAULT_NEXT_PAGE: &str = "/conversion_options.html";

/// Status text shown while the request is in flight
pub const UPLOADING_MESSAGE: &str = "Uploading file...";

// =============================================================================
// Selected File
// =============================================================================

/// A file chosen in the form's file input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// File name as reported by the input
    pub name: String,
    /// MIME type, if the source knows it
    pub content_type: Option<String>,
    /// File contents
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// Upload Response
// =============================================================================

/// Body returned by the upload endpoint
///
/// Both fields are optional. Any body that is valid JSON is accepted;
/// fields that are missing or not strings read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Server-side identifier of the stored file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Human-readable failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            filename: None,
            error: Some(error.into()),
        }
    }

    /// Parse a raw response body
    pub fn from_body(body: &[u8]) -> SubmitResult<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| SubmitError::Parse(e.to_string()))?;
        Ok(Self::from_value(&value))
    }

    /// Extract the known fields from an arbitrary JSON value
    ///
    /// Only strings count. A `filename` of `42` or `true` reads as absent
    /// and takes the failure branch, unlike a loose truthiness check.
    pub fn from_value(value: &Value) -> Self {
        let field = |name: &str| value.get(name).and_then(Value::as_str).map(String::from);
        Self {
            filename: field("filename"),
            error: field("error"),
        }
    }

    /// Turn the response into the identifier or a server-reported failure
    pub fn into_identifier(self) -> SubmitResult<String> {
        match self.filename {
            Some(f) if !f.is_empty() => Ok(f),
            _ => Err(SubmitError::server_reported(self.error.as_deref())),
        }
    }
}

// =============================================================================
// Submission Outcome
// =============================================================================

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    /// Identifier written to storage
    pub identifier: String,
    /// Page the browser was sent to
    pub target: String,
}

// =============================================================================
// Settings
// =============================================================================

/// The fixed values of the form's contract
///
/// Defaults match what the server and the next page expect; overriding
/// them breaks compatibility with both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSettings {
    #[serde(default = "default_upload_path")]
    pub upload_path: String,

    #[serde(default = "default_file_field")]
    pub file_field: String,

    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    #[serde(default = "default_next_page")]
    pub next_page: String,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            upload_path: default_upload_path(),
            file_field: default_file_field(),
            storage_key: default_storage_key(),
            next_page: default_next_page(),
        }
    }
}

fn default_upload_path() -> String {
    DEFAULT_UPLOAD_PATH.to_string()
}

fn default_file_field() -> String {
    DEFAULT_FILE_FIELD.to_string()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_next_page() -> String {
    DEFAULT_NEXT_PAGE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_success_body() {
        let resp = UploadResponse::from_body(br#"{"filename": "abc123"}"#).unwrap();
        assert_eq!(resp.into_identifier().unwrap(), "abc123");
    }

    #[test]
    fn test_parse_error_body() {
        let resp = UploadResponse::from_body(br#"{"error": "too large"}"#).unwrap();
        assert_eq!(resp, UploadResponse::failure("too large"));
        let err = resp.into_identifier().unwrap_err();
        assert_eq!(err.status_text(), "Error: too large");
    }

    #[test]
    fn test_empty_object_falls_back() {
        let err = UploadResponse::from_body(b"{}")
            .unwrap()
            .into_identifier()
            .unwrap_err();
        assert_eq!(err.status_text(), "Error: Upload failed.");
    }

    #[test]
    fn test_empty_filename_is_not_an_identifier() {
        let resp = UploadResponse::from_body(br#"{"filename": "", "error": "rejected"}"#).unwrap();
        assert_eq!(resp.filename.as_deref(), Some(""));
        assert_eq!(
            resp.into_identifier().unwrap_err().status_text(),
            "Error: rejected"
        );
    }

    #[test]
    fn test_non_object_json_is_a_server_failure() {
        let resp = UploadResponse::from_body(b"[1, 2, 3]").unwrap();
        assert_eq!(resp, UploadResponse::default());
    }

    #[test]
    fn test_non_string_fields_read_as_absent() {
        let resp = UploadResponse::from_body(br#"{"filename": 42, "error": null}"#).unwrap();
        assert_eq!(resp, UploadResponse::default());

        let err = UploadResponse::from_body(br#"{"filename": true}"#)
            .unwrap()
            .into_identifier()
            .unwrap_err();
        assert_eq!(err.status_text(), "Error: Upload failed.");
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let err = UploadResponse::from_body(b"<html>502</html>").unwrap_err();
        assert!(matches!(err, SubmitError::Parse(_)));
        assert!(err.status_text().starts_with("Error: "));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = HandlerSettings::default();
        assert_eq!(settings.upload_path, "/upload");
        assert_eq!(settings.file_field, "file");
        assert_eq!(settings.storage_key, "uploaded_filename");
        assert_eq!(settings.next_page, "/conversion_options.html");
    }

    #[test]
    fn test_settings_partial_override() {
        let settings: HandlerSettings =
            serde_json::from_str(r#"{"next_page": "/options.html"}"#).unwrap();
        assert_eq!(settings.next_page, "/options.html");
        assert_eq!(settings.upload_path, "/upload");
    }
}
