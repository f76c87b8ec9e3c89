//! Test utilities for upload-client
//!
//! [`UploadStub`] serves a stand-in `/upload` endpoint on a local port and
//! records every multipart request it receives, so the client, the form
//! handler and the CLI can be exercised over real HTTP.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::json;
use tokio::net::TcpListener;
use upload_core::DEFAULT_UPLOAD_PATH;

use crate::{Result, UploadClient};

pub use axum::http::StatusCode;

/// One multipart part as the stub saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// How the stub answers an upload
#[derive(Debug, Clone)]
pub enum StubReply {
    /// Accept a `file` part and answer `{"filename": "<uuid>_<name>"}`;
    /// answer 400 `{"error": "No file uploaded"}` when there is none
    Store,
    /// Fixed status and body
    Fixed(StatusCode, String),
    /// Wait, then answer like [`StubReply::Store`]
    Slow(Duration),
}

impl StubReply {
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self::Fixed(status, body.to_string())
    }
}

type Requests = Arc<Mutex<Vec<Vec<ReceivedPart>>>>;

#[derive(Clone)]
struct StubState {
    reply: StubReply,
    requests: Requests,
}

/// A local upload endpoint that shuts down when dropped
pub struct UploadStub {
    pub addr: SocketAddr,
    /// Client pointed at the stub
    pub client: UploadClient,
    requests: Requests,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl UploadStub {
    /// Start a stub whose client has no timeouts
    pub async fn start(reply: StubReply) -> Result<Self> {
        Self::start_with_timeout(reply, None).await
    }

    /// Start a stub whose client gives up after `timeout`
    pub async fn start_with_timeout(reply: StubReply, timeout: Option<Duration>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let requests = Requests::default();
        let router = Router::new()
            .route(DEFAULT_UPLOAD_PATH, post(receive_upload))
            .with_state(StubState {
                reply,
                requests: requests.clone(),
            });

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let client = UploadClient::with_config(&format!("http://{}", addr), timeout, None)?;

        Ok(Self {
            addr,
            client,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Parts of every request received so far, oldest first
    pub fn requests(&self) -> Vec<Vec<ReceivedPart>> {
        self.requests.lock().clone()
    }
}

impl Drop for UploadStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn receive_upload(State(state): State<StubState>, mut multipart: Multipart) -> Response {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(String::from);
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let data = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(ReceivedPart {
            name,
            file_name,
            content_type,
            data,
        });
    }
    state.requests.lock().push(parts.clone());

    match state.reply {
        StubReply::Store => store(&parts),
        StubReply::Fixed(status, body) => (status, body).into_response(),
        StubReply::Slow(delay) => {
            tokio::time::sleep(delay).await;
            store(&parts)
        }
    }
}

fn store(parts: &[ReceivedPart]) -> Response {
    let Some(file) = parts.iter().find(|p| p.name.as_deref() == Some("file")) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "No file uploaded"})),
        )
            .into_response();
    };
    let saved = format!(
        "{}_{}",
        uuid::Uuid::new_v4().simple(),
        file.file_name.as_deref().unwrap_or_default()
    );
    Json(json!({ "filename": saved })).into_response()
}
