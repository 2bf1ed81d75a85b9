//! ============================================================================
//! Market Configuration
//! ============================================================================
//! Where the marketplace API lives and which user the profile belongs to.
//! Values come from the environment, falling back to the built-in defaults:
//!   GIFTMARKET_API_URL       base URL of the marketplace function
//!   GIFTMARKET_USER_ID       user whose snapshot is loaded (default "1")
//!   GIFTMARKET_TIMEOUT_SECS  per-request timeout (default 10)
//! ============================================================================

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{MarketError, Result};

/// Hosted marketplace function used when nothing else is configured
pub const DEFAULT_API_URL: &str = "https://functions.poehali.dev/5d77d8b7-4f38-4cfd-bda5-d4d3725aa24c";

pub const DEFAULT_USER_ID: &str = "1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketConfig {
    pub api_url: String,
    pub user_id: String,
    pub request_timeout_secs: u64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl MarketConfig {
    /// Build from environment variables; unset variables keep their defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("GIFTMARKET_API_URL") {
            config.api_url = url;
        }
        if let Some(user_id) = lookup("GIFTMARKET_USER_ID") {
            config.user_id = user_id;
        }
        if let Some(raw) = lookup("GIFTMARKET_TIMEOUT_SECS") {
            config.request_timeout_secs = raw.trim().parse().map_err(|_| {
                MarketError::InvalidConfig(format!("GIFTMARKET_TIMEOUT_SECS is not a number: {}", raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the base URL parses as http(s) and the rest is usable
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.user_id.trim().is_empty() {
            return Err(MarketError::InvalidConfig("user id must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(MarketError::InvalidConfig("request timeout must be positive".into()));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| MarketError::InvalidConfig(format!("invalid API URL '{}': {}", self.api_url, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(MarketError::InvalidConfig(format!(
                "unsupported URL scheme '{}' in '{}'",
                other, self.api_url
            ))),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
