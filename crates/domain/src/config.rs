//! Configuration management

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, NEXT_LINK_FIELD};
use crate::errors::{DirectoryError, Result};

/// Client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Directory service endpoint and credentials
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub tenant: String,
    #[serde(default, skip_serializing)]
    pub access_token: String,
    #[serde(default = "default_next_link_field")]
    pub next_link_field: String,
}

/// Transport tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_seconds: u64,
    /// Total attempts per request (initial try + retries).
    pub max_attempts: usize,
    pub base_backoff_ms: u64,
    pub user_agent: String,
}

/// Logging output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_next_link_field() -> String {
    NEXT_LINK_FIELD.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tenant: String::new(),
            access_token: String::new(),
            next_link_field: default_next_link_field(),
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("tenant", &self.tenant)
            .field("access_token", &"<redacted>")
            .field("next_link_field", &self.next_link_field)
            .finish()
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_attempts: 3,
            base_backoff_ms: 200,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

impl Config {
    /// Check the fields every session needs before any request is made.
    ///
    /// # Errors
    /// Returns `DirectoryError::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(DirectoryError::config("api.base_url must not be empty"));
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(DirectoryError::config(format!(
                "api.base_url must be an http(s) URL: {}",
                self.api.base_url
            )));
        }
        if self.api.tenant.trim().is_empty() {
            return Err(DirectoryError::config("api.tenant must not be empty"));
        }
        if self.api.access_token.trim().is_empty() {
            return Err(DirectoryError::config("api.access_token must not be empty"));
        }
        if self.api.next_link_field.is_empty() {
            return Err(DirectoryError::config("api.next_link_field must not be empty"));
        }
        if self.http.max_attempts == 0 {
            return Err(DirectoryError::config("http.max_attempts must be at least 1"));
        }
        Ok(())
    }
}
