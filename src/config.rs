use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_ROOT_URL: &str = "https://api.documentextractor.ai";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the DocumentExtractor API.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub root_url: String,
    /// API key, sent as a bearer token on every request.
    pub api_key: String,
    /// Per-request timeout; the only cancellation mechanism the client has.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

impl ClientConfig {
    pub fn new(root_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let root_url: String = root_url.into();
        Self {
            root_url: root_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout: default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the environment (and a `.env` file if present).
    ///
    /// * `DOCUMENTEXTRACTOR_API_URL` (defaults to the hosted API)
    /// * `DOCUMENTEXTRACTOR_API_KEY` (required)
    /// * `DOCUMENTEXTRACTOR_TIMEOUT_SECS` (defaults to 30)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let root_url = env::var("DOCUMENTEXTRACTOR_API_URL")
            .unwrap_or_else(|_| DEFAULT_ROOT_URL.to_string());
        let api_key = env::var("DOCUMENTEXTRACTOR_API_KEY")
            .map_err(|_| Error::Config("DOCUMENTEXTRACTOR_API_KEY must be set".to_string()))?;
        let timeout_secs: u64 = env::var("DOCUMENTEXTRACTOR_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .map_err(|e| Error::Config(format!("invalid DOCUMENTEXTRACTOR_TIMEOUT_SECS: {e}")))?;

        Ok(Self::new(root_url, api_key).with_timeout(Duration::from_secs(timeout_secs)))
    }
}
