//! ============================================================================
//! MARKET-CORE: Gift Market client logic
//! ============================================================================
//! Everything between the marketplace API and whatever draws the screens:
//! - Catalog store holding catalog, user and platform-counter snapshots
//! - HTTP client for the `?action=` marketplace endpoints
//! - Marketplace search/rarity projection
//! - Immutable UI state with a pure reducer, and per-page screen derivation
//! ============================================================================

pub mod api;
pub mod config;
pub mod error;
pub mod projection;
pub mod screens;
pub mod store;
pub mod types;
pub mod ui_state;

// Re-export main types for convenience
pub use api::{MarketApiClient, MarketSource};
pub use config::MarketConfig;
pub use error::{ApiAction, FetchCause, MarketError};
pub use projection::{project, Projection, RarityFilter};
pub use screens::{render, Screen};
pub use store::{seed_catalog, CatalogStore, LoadReport, StoreSnapshot};
pub use types::*;
pub use ui_state::{reduce, Page, UiEvent, UiState};
