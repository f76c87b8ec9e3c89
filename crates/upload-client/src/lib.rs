//! Upload Client Library
//!
//! Posts the upload form's file to the server as `multipart/form-data` and
//! hands the raw response body back to the form handler.
//!
//! # Example
//!
//! ```rust,no_run
//! use upload_client::UploadClient;
//! use upload_core::SelectedFile;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = UploadClient::new("http://localhost:5000")?;
//!
//!     let file = SelectedFile::new("story.txt", "Once upon a time");
//!     let body = client.post_multipart("/upload", "file", &file).await?;
//!     println!("{}", String::from_utf8_lossy(&body));
//!
//!     Ok(())
//! }
//! ```
//!
//! `UploadClient` implements [`upload_core::UploadTransport`], so it plugs
//! straight into [`upload_core::UploadFormHandler`].

mod client;
pub mod config;
mod error;
pub mod testing;

pub use client::UploadClient;
pub use config::{ClientConfig, TimeoutsConfig};
pub use error::{Result, UploadClientError};
