//! Multipart upload client

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, instrument};
use upload_core::{SelectedFile, TransportError, UploadRequest, UploadTransport};
use url::Url;

use crate::config::{ClientConfig, TimeoutsConfig};
use crate::error::{Result, UploadClientError};

/// HTTP client that posts the form's file as `multipart/form-data`
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: Client,
    base_url: Url,
}

impl UploadClient {
    /// Create a client for `base_url` without timeouts
    pub fn new(base_url: &str) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url))
    }

    /// Create a client with custom timeouts; `None` leaves one unset
    pub fn with_config(
        base_url: &str,
        timeout: Option<Duration>,
        connect_timeout: Option<Duration>,
    ) -> Result<Self> {
        let timeouts = TimeoutsConfig {
            request_ms: timeout.map(millis).transpose()?,
            connect_ms: connect_timeout.map(millis).transpose()?,
        };
        Self::from_config(ClientConfig::builder(base_url).timeouts(timeouts).build())
    }

    /// Create a client from configuration
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeouts.request() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.timeouts.connect() {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(&config.connection.base_url)?;

        debug!("Upload client created for {}", base_url);

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a page or endpoint path against the base URL
    pub fn resolve(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(Into::into)
    }

    /// POST `file` as the single part named `field`
    ///
    /// Returns the response body for any status code. Only failures to
    /// send the request or read the body are errors.
    #[instrument(skip(self, file), fields(file = %file.name))]
    pub async fn post_multipart(
        &self,
        path: &str,
        field: &str,
        file: &SelectedFile,
    ) -> Result<Bytes> {
        let url = self.resolve(path)?;
        info!("Uploading {} bytes to {}", file.len(), url);

        let mut part = Part::bytes(file.data.to_vec()).file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = Form::new().part(field.to_string(), part);

        let response = self.client.post(url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!("Upload endpoint answered {}", status);
        }

        Ok(response.bytes().await?)
    }
}

fn millis(duration: Duration) -> Result<u64> {
    u64::try_from(duration.as_millis()).map_err(|_| UploadClientError::InvalidTimeout(duration))
}

#[async_trait]
impl UploadTransport for UploadClient {
    async fn send(&self, request: UploadRequest) -> std::result::Result<Bytes, TransportError> {
        self.post_multipart(&request.path, &request.field, &request.file)
            .await
            .map_err(Into::into)
    }
}
