//! ============================================================================
//! Error Types - Failures surfaced by the market client
//! ============================================================================
//! Reads only ever fail with `FetchFailed`. The store logs those and keeps
//! its previous snapshot; nothing here is shown to the user as an error.
//! ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

/// Query discriminator of an API call (`?action=...`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiAction {
    Nfts,
    Stats,
    User,
    Purchase,
}

impl ApiAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiAction::Nfts => "nfts",
            ApiAction::Stats => "stats",
            ApiAction::User => "user",
            ApiAction::Purchase => "purchase",
        }
    }
}

impl fmt::Display for ApiAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a fetch failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchCause {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Decode(String),
}

/// Error types for the market client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarketError {
    #[error("Fetch '{action}' failed: {cause}")]
    FetchFailed { action: ApiAction, cause: FetchCause },

    #[error("Backend rejected '{action}' ({status}): {message}")]
    Rejected {
        action: ApiAction,
        status: u16,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MarketError {
    pub fn network(action: ApiAction, err: impl fmt::Display) -> Self {
        MarketError::FetchFailed {
            action,
            cause: FetchCause::Network(err.to_string()),
        }
    }

    pub fn status(action: ApiAction, status: u16) -> Self {
        MarketError::FetchFailed {
            action,
            cause: FetchCause::Status(status),
        }
    }

    pub fn decode(action: ApiAction, err: impl fmt::Display) -> Self {
        MarketError::FetchFailed {
            action,
            cause: FetchCause::Decode(err.to_string()),
        }
    }

    /// Action the error belongs to, if it came from an API call
    pub fn action(&self) -> Option<ApiAction> {
        match self {
            MarketError::FetchFailed { action, .. } | MarketError::Rejected { action, .. } => {
                Some(*action)
            }
            MarketError::InvalidConfig(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
