//! upload-core - Core types and the submit handler for the upload form
//!
//! This crate holds the form's behaviour independent of any UI toolkit,
//! storage backend or HTTP stack. The handler talks to its surroundings
//! through four seams:
//!
//! - [`FormView`]: the file input and the status element
//! - [`KeyValueStore`]: durable client-side storage
//! - [`Navigator`]: page navigation
//! - [`UploadTransport`]: the multipart POST
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use upload_core::{HandlerSettings, UploadFormHandler};
//!
//! let handler = UploadFormHandler::new(view, store, navigator, transport);
//! match handler.submit().await {
//!     Ok(redirect) => println!("stored {}", redirect.identifier),
//!     Err(e) => eprintln!("{}", e.status_text()),
//! }
//! ```

pub mod error;
pub mod handler;
pub mod models;
pub mod ports;
pub mod testing;

pub use error::{StorageError, SubmitError, SubmitResult, TransportError};
pub use handler::UploadFormHandler;
pub use models::*;
pub use ports::{FormView, KeyValueStore, Navigator, UploadRequest, UploadTransport};
