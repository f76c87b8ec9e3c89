//! UploadFormHandler - the form's submit handler

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::error::{SubmitError, SubmitResult, NO_FILE_MESSAGE};
use crate::models::{HandlerSettings, Redirect, SelectedFile, UploadResponse, UPLOADING_MESSAGE};
use crate::ports::{FormView, KeyValueStore, Navigator, UploadRequest, UploadTransport};

/// Handles one submission of the upload form
///
/// Each call to [`submit`](Self::submit) is an independent flow: it reads
/// the selected file, posts it, and either stores the returned identifier
/// and navigates away or writes the failure into the status element.
/// Concurrent submissions are not deduplicated; both flows run and both
/// write to the same status element and storage key.
#[derive(Clone)]
pub struct UploadFormHandler {
    view: Arc<dyn FormView>,
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    transport: Arc<dyn UploadTransport>,
    settings: HandlerSettings,
}

impl UploadFormHandler {
    pub fn new(
        view: Arc<dyn FormView>,
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        transport: Arc<dyn UploadTransport>,
    ) -> Self {
        Self {
            view,
            store,
            navigator,
            transport,
            settings: HandlerSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: HandlerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Run one submission
    ///
    /// On failure the status element already shows the error text when
    /// this returns.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> SubmitResult<Redirect> {
        let Some(file) = self.view.selected_file() else {
            debug!("Submitted without a file");
            self.view.set_status_text(NO_FILE_MESSAGE);
            return Err(SubmitError::NoFileSelected);
        };

        self.view.reveal_status();
        self.view.set_status_text(UPLOADING_MESSAGE);

        match self.upload(file).await {
            Ok(redirect) => Ok(redirect),
            Err(e) => {
                warn!("Upload failed: {}", e);
                self.view.set_status_text(&e.status_text());
                Err(e)
            }
        }
    }

    async fn upload(&self, file: SelectedFile) -> SubmitResult<Redirect> {
        info!(
            "Uploading {} ({} bytes) to {}",
            file.name,
            file.len(),
            self.settings.upload_path
        );

        let request = UploadRequest {
            path: self.settings.upload_path.clone(),
            field: self.settings.file_field.clone(),
            file,
        };
        let body = self.transport.send(request).await?;
        debug!("Received {} byte response", body.len());

        let identifier = UploadResponse::from_body(&body)?.into_identifier()?;

        self.store.set(&self.settings.storage_key, &identifier)?;
        info!("Stored identifier {} under {}", identifier, self.settings.storage_key);

        self.navigator.navigate(&self.settings.next_page);

        Ok(Redirect {
            identifier,
            target: self.settings.next_page.clone(),
        })
    }
}

impl std::fmt::Debug for UploadFormHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadFormHandler")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StorageError, TransportError};
    use crate::testing::{MemoryStore, MemoryView, RecordingNavigator, Reply, ScriptedTransport};
    use async_trait::async_trait;
    use bytes::Bytes;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Fixture {
        view: Arc<MemoryView>,
        store: Arc<MemoryStore>,
        navigator: Arc<RecordingNavigator>,
        transport: Arc<ScriptedTransport>,
        handler: UploadFormHandler,
    }

    fn fixture(file: Option<SelectedFile>, reply: Reply) -> Fixture {
        let view = Arc::new(MemoryView::new());
        view.select(file);
        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let transport = Arc::new(ScriptedTransport::always(reply));
        let handler = UploadFormHandler::new(
            view.clone(),
            store.clone(),
            navigator.clone(),
            transport.clone(),
        );
        Fixture {
            view,
            store,
            navigator,
            transport,
            handler,
        }
    }

    fn story() -> SelectedFile {
        SelectedFile::new("story.txt", "Once upon a time").with_content_type("text/plain")
    }

    #[tokio::test]
    async fn test_no_file_makes_no_request() {
        let f = fixture(None, Reply::json(json!({"filename": "abc123"})));

        let err = f.handler.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::NoFileSelected));
        assert_eq!(f.transport.request_count(), 0);
        assert_eq!(f.view.status().as_deref(), Some("Please select a file."));
        assert!(!f.view.is_revealed());
        assert_eq!(f.store.write_count(), 0);
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_request_carries_file_under_fixed_field() {
        let f = fixture(Some(story()), Reply::json(json!({"filename": "abc123"})));

        f.handler.submit().await.unwrap();

        let requests = f.transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path, "/upload");
        assert_eq!(requests[0].field, "file");
        assert_eq!(requests[0].file, story());
    }

    #[tokio::test]
    async fn test_success_stores_identifier_and_navigates() {
        let f = fixture(Some(story()), Reply::json(json!({"filename": "abc123"})));

        let redirect = f.handler.submit().await.unwrap();

        assert_eq!(
            redirect,
            Redirect {
                identifier: "abc123".into(),
                target: "/conversion_options.html".into(),
            }
        );
        assert_eq!(f.store.get("uploaded_filename").as_deref(), Some("abc123"));
        assert_eq!(f.navigator.visits(), vec!["/conversion_options.html"]);
        assert_eq!(f.view.status_history(), vec!["Uploading file..."]);
    }

    #[tokio::test]
    async fn test_server_error_message_is_shown() {
        let f = fixture(Some(story()), Reply::json(json!({"error": "too large"})));

        let err = f.handler.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::ServerReported(_)));
        assert_eq!(f.view.status().as_deref(), Some("Error: too large"));
        assert_eq!(f.store.write_count(), 0);
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_empty_response_uses_fallback_message() {
        let f = fixture(Some(story()), Reply::json(json!({})));

        f.handler.submit().await.unwrap_err();

        assert_eq!(f.view.status().as_deref(), Some("Error: Upload failed."));
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_network_failure_is_shown() {
        let f = fixture(
            Some(story()),
            Reply::NetworkFailure("Failed to fetch".into()),
        );

        let err = f.handler.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::Transport(_)));
        assert_eq!(f.view.status().as_deref(), Some("Error: Failed to fetch"));
        assert_eq!(f.store.write_count(), 0);
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_non_json_body_is_a_parse_failure() {
        let f = fixture(Some(story()), Reply::text("<html>Bad Gateway</html>"));

        let err = f.handler.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::Parse(_)));
        let status = f.view.status().unwrap();
        assert!(status.starts_with("Error: "), "status was {status:?}");
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_storage_failure_prevents_navigation() {
        let f = fixture(Some(story()), Reply::json(json!({"filename": "abc123"})));
        f.store.fail_writes("quota exceeded");

        let err = f.handler.submit().await.unwrap_err();

        assert!(matches!(err, SubmitError::Storage(StorageError::Write(_))));
        assert_eq!(
            f.view.status().as_deref(),
            Some("Error: Storage write failed: quota exceeded")
        );
        assert!(f.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_success_is_stable() {
        let f = fixture(Some(story()), Reply::json(json!({"filename": "abc123"})));

        let first = f.handler.submit().await.unwrap();
        let second = f.handler.submit().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(f.store.get("uploaded_filename").as_deref(), Some("abc123"));
        assert_eq!(
            f.navigator.visits(),
            vec!["/conversion_options.html", "/conversion_options.html"]
        );
    }

    #[tokio::test]
    async fn test_failure_then_resubmit_succeeds() {
        let view = Arc::new(MemoryView::with_file(story()));
        let store = Arc::new(MemoryStore::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let transport = Arc::new(ScriptedTransport::script(vec![
            Reply::NetworkFailure("offline".into()),
            Reply::json(json!({"filename": "abc123"})),
        ]));
        let handler =
            UploadFormHandler::new(view.clone(), store.clone(), navigator.clone(), transport);

        assert!(handler.submit().await.is_err());
        assert!(handler.submit().await.is_ok());

        assert_eq!(
            view.status_history(),
            vec!["Uploading file...", "Error: offline", "Uploading file..."]
        );
        assert_eq!(store.get("uploaded_filename").as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_custom_settings_are_used() {
        let f = fixture(Some(story()), Reply::json(json!({"filename": "abc123"})));
        let handler = f.handler.clone().with_settings(HandlerSettings {
            upload_path: "/api/upload".into(),
            file_field: "document".into(),
            storage_key: "doc_id".into(),
            next_page: "/next.html".into(),
        });

        handler.submit().await.unwrap();

        let request = &f.transport.requests()[0];
        assert_eq!(request.path, "/api/upload");
        assert_eq!(request.field, "document");
        assert_eq!(f.store.get("doc_id").as_deref(), Some("abc123"));
        assert_eq!(f.navigator.last().as_deref(), Some("/next.html"));
    }

    /// Captures the status element's state at the moment the request is sent
    struct ObservingTransport {
        view: Arc<MemoryView>,
        seen: Mutex<Option<(bool, Option<String>)>>,
    }

    #[async_trait]
    impl UploadTransport for ObservingTransport {
        async fn send(&self, _request: UploadRequest) -> Result<Bytes, TransportError> {
            *self.seen.lock() = Some((self.view.is_revealed(), self.view.status()));
            Ok(Bytes::from_static(br#"{"filename": "abc123"}"#))
        }
    }

    #[tokio::test]
    async fn test_status_revealed_before_request() {
        let view = Arc::new(MemoryView::with_file(story()));
        let transport = Arc::new(ObservingTransport {
            view: view.clone(),
            seen: Mutex::new(None),
        });
        let handler = UploadFormHandler::new(
            view,
            Arc::new(MemoryStore::new()),
            Arc::new(RecordingNavigator::new()),
            transport.clone(),
        );

        handler.submit().await.unwrap();

        let seen = transport.seen.lock().clone();
        assert_eq!(seen, Some((true, Some("Uploading file...".to_string()))));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_are_not_deduplicated() {
        let f = fixture(Some(story()), Reply::json(json!({"filename": "abc123"})));

        let (a, b) = tokio::join!(f.handler.submit(), f.handler.submit());

        assert!(a.is_ok() && b.is_ok());
        assert_eq!(f.transport.request_count(), 2);
        assert_eq!(f.navigator.visits().len(), 2);
    }
}
