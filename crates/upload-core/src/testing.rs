//! In-memory implementations of the form seams
//!
//! Used by this crate's tests and by downstream crates that want to drive
//! [`UploadFormHandler`](crate::UploadFormHandler) without a terminal, a
//! disk or a server.

use std::collections::HashMap;
use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;

use crate::error::{StorageError, TransportError};
use crate::models::SelectedFile;
use crate::ports::{FormView, KeyValueStore, Navigator, UploadRequest, UploadTransport};

// =============================================================================
// Form View
// =============================================================================

/// A form whose file input and status element live in memory
#[derive(Debug, Default)]
pub struct MemoryView {
    file: Mutex<Option<SelectedFile>>,
    status: Mutex<Vec<String>>,
    revealed: Mutex<bool>,
}

impl MemoryView {
    /// An empty form (no file selected, status hidden)
    pub fn new() -> Self {
        Self::default()
    }

    /// A form with `file` already selected
    pub fn with_file(file: SelectedFile) -> Self {
        let view = Self::default();
        view.select(Some(file));
        view
    }

    /// Change the selection in the file input
    pub fn select(&self, file: Option<SelectedFile>) {
        *self.file.lock() = file;
    }

    /// Current status text, if any was ever set
    pub fn status(&self) -> Option<String> {
        self.status.lock().last().cloned()
    }

    /// Every status text written, oldest first
    pub fn status_history(&self) -> Vec<String> {
        self.status.lock().clone()
    }

    pub fn is_revealed(&self) -> bool {
        *self.revealed.lock()
    }
}

impl FormView for MemoryView {
    fn selected_file(&self) -> Option<SelectedFile> {
        self.file.lock().clone()
    }

    fn set_status_text(&self, text: &str) {
        self.status.lock().push(text.to_string());
    }

    fn reveal_status(&self) {
        *self.revealed.lock() = true;
    }
}

// =============================================================================
// Key-Value Store
// =============================================================================

/// A key-value store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<usize>,
    fail_writes: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail with `message`
    pub fn fail_writes(&self, message: impl Into<String>) {
        *self.fail_writes.lock() = Some(message.into());
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

impl KeyValueStore for MemoryStore {
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(message) = self.fail_writes.lock().clone() {
            return Err(StorageError::Write(message));
        }
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
        *self.writes.lock() += 1;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Records navigation targets instead of leaving the page
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visits.lock().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, target: &str) {
        self.visits.lock().push(target.to_string());
    }
}

// =============================================================================
// Transport
// =============================================================================

/// A canned transport reply
#[derive(Debug, Clone)]
pub enum Reply {
    /// Return this body
    Body(Bytes),
    /// Fail before any response arrives
    NetworkFailure(String),
}

impl Reply {
    /// Reply with a JSON body
    pub fn json(value: serde_json::Value) -> Self {
        Self::Body(Bytes::from(value.to_string()))
    }

    /// Reply with a raw text body
    pub fn text(body: impl Into<String>) -> Self {
        Self::Body(Bytes::from(body.into()))
    }
}

/// A transport that answers from a script and records what it was sent
///
/// Replies are consumed in order; the last one repeats once the script
/// runs out.
#[derive(Debug)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    requests: Mutex<Vec<UploadRequest>>,
}

impl ScriptedTransport {
    /// Always answer with `reply`
    pub fn always(reply: Reply) -> Self {
        Self::script(vec![reply])
    }

    /// Answer with `replies` in order
    pub fn script(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<UploadRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    fn next_reply(&self) -> Option<Reply> {
        let mut replies = self.replies.lock();
        let mut last = self.last.lock();
        if let Some(reply) = replies.pop_front() {
            *last = Some(reply);
        }
        last.clone()
    }
}

#[async_trait]
impl UploadTransport for ScriptedTransport {
    async fn send(&self, request: UploadRequest) -> Result<Bytes, TransportError> {
        self.requests.lock().push(request);
        match self.next_reply() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::NetworkFailure(message)) => Err(TransportError::Network(message)),
            None => Err(TransportError::Network("no scripted reply".into())),
        }
    }
}
