//! ============================================================================
//! API Module - Reads against the marketplace backend
//! ============================================================================
//! `MarketSource` is the seam the catalog store reads through:
//! - MarketApiClient: HTTP implementation over the `?action=` endpoints
//! - any other implementor (fixtures, fakes) can stand in for it
//! ============================================================================

mod client;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AggregateStats, Item, UserSnapshot};

pub use client::{decode_catalog, decode_stats, decode_user, MarketApiClient};

/// Source of the three independent snapshots the store holds.
/// Each call performs exactly one outbound read.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Full catalog, server order
    async fn fetch_catalog(&self) -> Result<Vec<Item>>;

    /// Platform counters
    async fn fetch_stats(&self) -> Result<AggregateStats>;

    /// Balance, collection and history of one user
    async fn fetch_user(&self, user_id: &str) -> Result<UserSnapshot>;
}
