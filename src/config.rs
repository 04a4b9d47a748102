use crate::error::{Error, Result};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.aiornot.com";

/// Default timeout for report requests, in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 180;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "AIORNOT_API_KEY";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "AIORNOT_BASE_URL";

const API_KEY_ERR: &str =
    "API key required. Set AIORNOT_API_KEY env var or pass api_key in Config";

/// Configuration for the AIORNOT clients
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// API key for authentication
    pub api_key: String,

    /// Base URL for the API
    pub base_url: Option<String>,

    /// Timeout in seconds for HTTP requests
    pub timeout_seconds: Option<u64>,
}

impl Config {
    /// Build a configuration from `AIORNOT_API_KEY` and `AIORNOT_BASE_URL`
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).unwrap_or_default(),
            base_url: std::env::var(BASE_URL_ENV)
                .ok()
                .filter(|url| !url.trim().is_empty()),
            timeout_seconds: None,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::InvalidConfig(API_KEY_ERR.to_string()));
        }

        if let Some(url) = &self.base_url {
            if url.trim().is_empty() {
                return Err(Error::InvalidConfig("Base URL cannot be empty".to_string()));
            }
            if url::Url::parse(url).is_err() {
                return Err(Error::InvalidConfig(format!("Invalid base URL: {url}")));
            }
        }

        if self.timeout_seconds == Some(0) {
            return Err(Error::InvalidConfig(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the base URL, falling back to the default if not set
    pub fn get_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string()
    }

    /// Get the timeout in seconds, falling back to the default if not set
    pub fn get_timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}
