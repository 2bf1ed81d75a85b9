//! ============================================================================
//! Market API Client - HTTP reads against the marketplace function
//! ============================================================================
//! One base URL, one `action` query discriminator:
//! - GET  ?action=nfts[&rarity=R]   catalog
//! - GET  ?action=stats             platform counters
//! - GET  ?action=user&userId=ID    balance, collection, history
//! - POST ?action=purchase          buy one item for a user
//! ============================================================================

use std::collections::HashSet;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::MarketSource;
use crate::config::MarketConfig;
use crate::error::{ApiAction, MarketError, Result};
use crate::types::{AggregateStats, Item, ItemId, PurchaseReceipt, Rarity, Transaction, UserSnapshot};

/// HTTP client for the marketplace backend
pub struct MarketApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl MarketApiClient {
    /// Create a client for the configured base URL and timeout
    pub fn new(config: &MarketConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| MarketError::InvalidConfig(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Catalog filtered server-side to one rarity
    pub async fn fetch_catalog_by_rarity(&self, rarity: Rarity) -> Result<Vec<Item>> {
        let url = self.action_url(ApiAction::Nfts, &[("rarity", rarity.as_str())]);
        let body = self.get_text(ApiAction::Nfts, url).await?;
        decode_catalog(&body)
    }

    /// Buy one item for a user. The backend debits the balance, records the
    /// ownership and appends a purchase entry to the ledger.
    pub async fn purchase(&self, user_id: &str, nft_id: ItemId) -> Result<PurchaseReceipt> {
        let action = ApiAction::Purchase;
        let url = self.action_url(action, &[]);
        let request = PurchaseRequest { user_id, nft_id };

        info!("Purchasing NFT {} for user {}", nft_id, user_id);

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| MarketError::network(action, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| MarketError::network(action, e))?;

        if status.is_client_error() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(MarketError::Rejected {
                action,
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(MarketError::status(action, status.as_u16()));
        }

        let receipt: PurchaseReceipt =
            serde_json::from_str(&body).map_err(|e| MarketError::decode(action, e))?;

        info!("Purchase of NFT {} completed: {}", nft_id, receipt.message);
        Ok(receipt)
    }

    fn action_url(&self, action: ApiAction, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("action", action.as_str());
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        url
    }

    async fn get_text(&self, action: ApiAction, url: Url) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MarketError::network(action, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketError::status(action, status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| MarketError::network(action, e))
    }
}

#[async_trait]
impl MarketSource for MarketApiClient {
    async fn fetch_catalog(&self) -> Result<Vec<Item>> {
        let url = self.action_url(ApiAction::Nfts, &[]);
        let body = self.get_text(ApiAction::Nfts, url).await?;
        decode_catalog(&body)
    }

    async fn fetch_stats(&self) -> Result<AggregateStats> {
        let url = self.action_url(ApiAction::Stats, &[]);
        let body = self.get_text(ApiAction::Stats, url).await?;
        decode_stats(&body)
    }

    async fn fetch_user(&self, user_id: &str) -> Result<UserSnapshot> {
        let url = self.action_url(ApiAction::User, &[("userId", user_id)]);
        let body = self.get_text(ApiAction::User, url).await?;
        decode_user(user_id, &body)
    }
}

// ============================================================================
// Response Decoding
// ============================================================================

/// Decode `{ nfts: Item[] }`. A missing list or a repeated id is malformed.
pub fn decode_catalog(body: &str) -> Result<Vec<Item>> {
    let envelope: CatalogResponse =
        serde_json::from_str(body).map_err(|e| MarketError::decode(ApiAction::Nfts, e))?;

    let mut seen = HashSet::with_capacity(envelope.nfts.len());
    for item in &envelope.nfts {
        if !seen.insert(item.id) {
            return Err(MarketError::decode(
                ApiAction::Nfts,
                format!("duplicate item id {}", item.id),
            ));
        }
    }

    Ok(envelope.nfts)
}

/// Decode the four platform counters; absent fields are zero
pub fn decode_stats(body: &str) -> Result<AggregateStats> {
    serde_json::from_str(body).map_err(|e| MarketError::decode(ApiAction::Stats, e))
}

/// Decode `{ user: { balance }, owned_nfts, transactions }`
pub fn decode_user(user_id: &str, body: &str) -> Result<UserSnapshot> {
    let envelope: UserResponse =
        serde_json::from_str(body).map_err(|e| MarketError::decode(ApiAction::User, e))?;

    let user = envelope
        .user
        .ok_or_else(|| MarketError::decode(ApiAction::User, format!("unknown user {}", user_id)))?;

    let owned_items = envelope
        .owned_nfts
        .unwrap_or_default()
        .into_iter()
        .map(|mut item| {
            item.owned_by_current_user = true;
            item
        })
        .collect();

    Ok(UserSnapshot {
        user_id: user_id.to_string(),
        balance: user.balance,
        owned_items,
        transactions: envelope.transactions.unwrap_or_default(),
    })
}

// ============================================================================
// Marketplace API Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    nfts: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: Option<UserRecord>,
    #[serde(default)]
    owned_nfts: Option<Vec<Item>>,
    #[serde(default)]
    transactions: Option<Vec<Transaction>>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    balance: u64,
}

#[derive(Debug, Serialize)]
struct PurchaseRequest<'a> {
    #[serde(rename = "userId")]
    user_id: &'a str,
    #[serde(rename = "nftId")]
    nft_id: ItemId,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}
