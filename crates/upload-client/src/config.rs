//! Upload client configuration

use serde::{Deserialize, Serialize};

/// Upload client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Connection settings
    pub connection: ConnectionConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
}

/// Connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URL the form's relative paths resolve against
    pub base_url: String,
}

/// Timeout configuration
///
/// An upload runs until it completes or fails, so there is no whole-request
/// timeout unless one is asked for. Zero means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Whole-request timeout in milliseconds (default: none)
    #[serde(default)]
    pub request_ms: Option<u64>,

    /// Connect timeout in milliseconds (default: none)
    #[serde(default)]
    pub connect_ms: Option<u64>,
}

impl TimeoutsConfig {
    /// The request timeout, if set to something other than zero
    pub fn request(&self) -> Option<std::time::Duration> {
        non_zero_millis(self.request_ms)
    }

    /// The connect timeout, if set to something other than zero
    pub fn connect(&self) -> Option<std::time::Duration> {
        non_zero_millis(self.connect_ms)
    }
}

fn non_zero_millis(ms: Option<u64>) -> Option<std::time::Duration> {
    ms.filter(|ms| *ms > 0).map(std::time::Duration::from_millis)
}

impl ClientConfig {
    /// Configuration with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder(base_url).build()
    }

    /// Create a builder for programmatic configuration
    pub fn builder(base_url: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(base_url)
    }
}

/// Builder for ClientConfig
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Create a new builder with the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: ClientConfig {
                connection: ConnectionConfig {
                    base_url: base_url.into(),
                },
                timeouts: TimeoutsConfig::default(),
            },
        }
    }

    /// Replace all timeout settings
    pub fn timeouts(mut self, timeouts: TimeoutsConfig) -> Self {
        self.config.timeouts = timeouts;
        self
    }

    /// Set request timeout in milliseconds
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.request_ms = Some(ms);
        self
    }

    /// Set connect timeout in milliseconds
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.timeouts.connect_ms = Some(ms);
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults_have_no_timeouts() {
        let config = ClientConfig::new("http://localhost:5000");
        assert_eq!(config.timeouts, TimeoutsConfig::default());
        assert_eq!(config.timeouts.request(), None);
        assert_eq!(config.timeouts.connect(), None);
    }

    #[test]
    fn test_zero_timeouts_read_as_unset() {
        let config = ClientConfig::builder("http://localhost:5000")
            .request_timeout_ms(0)
            .connect_timeout_ms(0)
            .build();
        assert_eq!(config.timeouts.request(), None);
        assert_eq!(config.timeouts.connect(), None);
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder("http://localhost:9080")
            .request_timeout_ms(120_000)
            .connect_timeout_ms(500)
            .build();

        assert_eq!(config.connection.base_url, "http://localhost:9080");
        assert_eq!(config.timeouts.request(), Some(Duration::from_secs(120)));
        assert_eq!(config.timeouts.connect(), Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_timeouts_deserialize_partially() {
        let timeouts: TimeoutsConfig = serde_json::from_str(r#"{"connect_ms": 2000}"#).unwrap();
        assert_eq!(timeouts.request_ms, None);
        assert_eq!(timeouts.connect_ms, Some(2000));
    }
}
