//! Client configuration

use crate::error::{ClientError, ClientResult};
use crate::gateway::HttpGateway;

/// Configuration for connecting to the remote catalog gateway
///
/// # Environment variables
///
/// | Variable | Default |
/// |----------|---------|
/// | CATALOG_API_URL | http://localhost:8080 |
/// | CATALOG_MERCHANT_ID | (empty) |
/// | CATALOG_API_TOKEN | (none) |
/// | CATALOG_REQUEST_TIMEOUT_SECS | 30 |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Gateway base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Merchant whose catalog is loaded
    pub merchant_id: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a configuration for the given gateway URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            merchant_id: String::new(),
            token: None,
            timeout: 30,
        }
    }

    /// Load from the environment, reading `.env` first when present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let mut config = Self::new(
            std::env::var("CATALOG_API_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
        );
        config.merchant_id = std::env::var("CATALOG_MERCHANT_ID").unwrap_or_default();
        config.token = std::env::var("CATALOG_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        config.timeout = std::env::var("CATALOG_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);
        config
    }

    /// Set the merchant id
    pub fn with_merchant(mut self, merchant_id: impl Into<String>) -> Self {
        self.merchant_id = merchant_id.into();
        self
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Check the values a store needs before it can talk to the gateway
    pub fn validate(&self) -> ClientResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::Config("base_url must not be empty".into()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        if self.merchant_id.trim().is_empty() {
            return Err(ClientError::Config("merchant_id must not be empty".into()));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be at least one second".into()));
        }
        Ok(())
    }

    /// Create an HTTP gateway from this configuration
    pub fn build_gateway(&self) -> ClientResult<HttpGateway> {
        HttpGateway::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
