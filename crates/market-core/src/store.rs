//! ============================================================================
//! Catalog Store - Snapshots of catalog, user and platform counters
//! ============================================================================
//! Holds the three independently fetched snapshots and replaces each one
//! wholesale when its read succeeds. A failed read is logged and the previous
//! snapshot stays in place: a flaky backend must never blank the screen.
//!
//! Before anything loads the store serves a built-in seed catalog, no user
//! and all-zero counters, so a renderer can draw immediately.
//! ============================================================================

use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::api::MarketSource;
use crate::error::{MarketError, Result};
use crate::types::{AggregateStats, Item, Rarity, UserSnapshot};

/// Built-in catalog shown until the first successful catalog read.
/// Two items of each rarity.
pub fn seed_catalog() -> Vec<Item> {
    vec![
        Item::new(1, "🎉", "Party Gift", 100, Rarity::Common, "bg-gradient-to-br from-pink-400 to-purple-500"),
        Item::new(2, "🎂", "Birthday Cake", 250, Rarity::Rare, "bg-gradient-to-br from-yellow-400 to-orange-500"),
        Item::new(3, "💎", "Diamond", 500, Rarity::Epic, "bg-gradient-to-br from-blue-400 to-cyan-500"),
        Item::new(4, "👑", "Crown", 1000, Rarity::Legendary, "bg-gradient-to-br from-yellow-300 to-yellow-600"),
        Item::new(5, "🚀", "Rocket", 150, Rarity::Common, "bg-gradient-to-br from-indigo-400 to-purple-600"),
        Item::new(6, "🌟", "Star", 300, Rarity::Rare, "bg-gradient-to-br from-yellow-400 to-pink-500"),
        Item::new(7, "🎨", "Art Palette", 400, Rarity::Epic, "bg-gradient-to-br from-red-400 to-pink-500"),
        Item::new(8, "🏆", "Trophy", 800, Rarity::Legendary, "bg-gradient-to-br from-amber-400 to-orange-600"),
    ]
}

#[derive(Debug, Clone)]
struct CatalogState {
    items: Vec<Item>,
    /// False while `items` is still the seed (or an empty initial catalog)
    loaded: bool,
}

/// Point-in-time copy of everything the store holds
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSnapshot {
    pub items: Vec<Item>,
    pub catalog_loaded: bool,
    pub user: Option<UserSnapshot>,
    pub stats: AggregateStats,
    pub revision: u64,
}

impl Default for StoreSnapshot {
    fn default() -> Self {
        Self {
            items: seed_catalog(),
            catalog_loaded: false,
            user: None,
            stats: AggregateStats::default(),
            revision: 0,
        }
    }
}

/// Outcome of the three initial reads. Each succeeds or fails on its own.
#[derive(Debug)]
pub struct LoadReport {
    pub catalog: Result<()>,
    pub user: Result<()>,
    pub stats: Result<()>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.catalog.is_ok() && self.user.is_ok() && self.stats.is_ok()
    }

    pub fn failures(&self) -> Vec<&MarketError> {
        [&self.catalog, &self.user, &self.stats]
            .into_iter()
            .filter_map(|r| r.as_ref().err())
            .collect()
    }
}

/// Sole owner and writer of the market snapshots
pub struct CatalogStore<S> {
    source: S,
    catalog: RwLock<CatalogState>,
    user: RwLock<Option<UserSnapshot>>,
    stats: RwLock<AggregateStats>,
    /// Bumped once per successful snapshot replacement
    revision: watch::Sender<u64>,
}

impl<S: MarketSource> CatalogStore<S> {
    /// Store seeded with the built-in catalog
    pub fn new(source: S) -> Self {
        Self::with_catalog(source, seed_catalog())
    }

    /// Store starting from a caller-provided catalog instead of the seed
    pub fn with_catalog(source: S, items: Vec<Item>) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            source,
            catalog: RwLock::new(CatalogState { items, loaded: false }),
            user: RwLock::new(None),
            stats: RwLock::new(AggregateStats::default()),
            revision,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Receiver that observes a new revision after every snapshot replacement
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    // ========================================================================
    // Loads
    // ========================================================================

    /// Read the full catalog and replace the stored list on success
    pub async fn load_catalog(&self) -> Result<()> {
        match self.source.fetch_catalog().await {
            Ok(items) => {
                let count = items.len();
                {
                    let mut catalog = self.catalog.write().await;
                    catalog.items = items;
                    catalog.loaded = true;
                }
                self.bump();
                info!("Catalog replaced: {} items", count);
                Ok(())
            }
            Err(e) => {
                warn!("Catalog load failed, keeping previous list: {}", e);
                Err(e)
            }
        }
    }

    /// Read one user's balance, collection and history and replace the
    /// stored snapshot on success
    pub async fn load_user_snapshot(&self, user_id: &str) -> Result<()> {
        match self.source.fetch_user(user_id).await {
            Ok(snapshot) => {
                info!(
                    "User {} snapshot replaced: balance {}, {} owned, {} transactions",
                    user_id,
                    snapshot.balance,
                    snapshot.owned_items.len(),
                    snapshot.transactions.len()
                );
                *self.user.write().await = Some(snapshot);
                self.bump();
                Ok(())
            }
            Err(e) => {
                warn!("User {} load failed, keeping previous snapshot: {}", user_id, e);
                Err(e)
            }
        }
    }

    /// Read the platform counters and replace them on success
    pub async fn load_aggregate_stats(&self) -> Result<()> {
        match self.source.fetch_stats().await {
            Ok(stats) => {
                *self.stats.write().await = stats;
                self.bump();
                info!(
                    "Stats replaced: {} sales, {} users, {} nfts, {} transactions",
                    stats.total_sales, stats.total_users, stats.total_nfts, stats.total_transactions
                );
                Ok(())
            }
            Err(e) => {
                warn!("Stats load failed, keeping previous counters: {}", e);
                Err(e)
            }
        }
    }

    /// Issue all three reads at once. Each result lands in the store as soon
    /// as it completes; nothing waits for the others.
    pub async fn load_all(&self, user_id: &str) -> LoadReport {
        let (catalog, user, stats) = tokio::join!(
            self.load_catalog(),
            self.load_user_snapshot(user_id),
            self.load_aggregate_stats(),
        );

        let report = LoadReport { catalog, user, stats };
        if report.is_complete() {
            info!("Initial load complete");
        } else {
            warn!(
                "Initial load finished with {} failed read(s); showing last known data",
                report.failures().len()
            );
        }
        report
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub async fn items(&self) -> Vec<Item> {
        self.catalog.read().await.items.clone()
    }

    pub async fn has_loaded_catalog(&self) -> bool {
        self.catalog.read().await.loaded
    }

    pub async fn user(&self) -> Option<UserSnapshot> {
        self.user.read().await.clone()
    }

    pub async fn stats(&self) -> AggregateStats {
        *self.stats.read().await
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        let catalog = self.catalog.read().await.clone();
        StoreSnapshot {
            items: catalog.items,
            catalog_loaded: catalog.loaded,
            user: self.user().await,
            stats: self.stats().await,
            revision: self.revision(),
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiAction;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Canned responses plus call counters
    #[derive(Default)]
    struct StubSource {
        catalog: Mutex<Option<Result<Vec<Item>>>>,
        user: Mutex<Option<Result<UserSnapshot>>>,
        stats: Mutex<Option<Result<AggregateStats>>>,
        catalog_gate: Option<Arc<Notify>>,
        catalog_calls: AtomicUsize,
        user_calls: AtomicUsize,
        stats_calls: AtomicUsize,
    }

    fn take<T>(slot: &Mutex<Option<Result<T>>>, action: ApiAction) -> Result<T> {
        slot.lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(MarketError::network(action, "connection refused")))
    }

    #[async_trait]
    impl MarketSource for StubSource {
        async fn fetch_catalog(&self) -> Result<Vec<Item>> {
            self.catalog_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.catalog_gate {
                gate.notified().await;
            }
            take(&self.catalog, ApiAction::Nfts)
        }

        async fn fetch_stats(&self) -> Result<AggregateStats> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            take(&self.stats, ApiAction::Stats)
        }

        async fn fetch_user(&self, _user_id: &str) -> Result<UserSnapshot> {
            self.user_calls.fetch_add(1, Ordering::SeqCst);
            take(&self.user, ApiAction::User)
        }
    }

    fn user(balance: u64) -> UserSnapshot {
        UserSnapshot {
            user_id: "1".into(),
            balance,
            owned_items: vec![],
            transactions: vec![],
        }
    }

    fn stats(sales: u64) -> AggregateStats {
        AggregateStats {
            total_sales: sales,
            ..AggregateStats::default()
        }
    }

    #[test]
    fn test_seed_catalog_shape() {
        let seed = seed_catalog();
        assert_eq!(seed.len(), 8);
        for rarity in Rarity::ALL {
            assert_eq!(seed.iter().filter(|i| i.rarity == rarity).count(), 2);
        }
        let ids: Vec<_> = seed.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[tokio::test]
    async fn test_default_state() {
        let store = CatalogStore::new(StubSource::default());
        let snapshot = store.snapshot().await;

        assert_eq!(snapshot.items, seed_catalog());
        assert!(!snapshot.catalog_loaded);
        assert!(snapshot.user.is_none());
        assert_eq!(snapshot.stats, AggregateStats::default());
        assert_eq!(snapshot.revision, 0);
    }

    #[tokio::test]
    async fn test_catalog_replaced_wholesale() {
        let source = StubSource::default();
        let fresh = vec![Item::new(42, "🎁", "Gift Box", 75, Rarity::Rare, "g")];
        *source.catalog.lock().unwrap() = Some(Ok(fresh.clone()));

        let store = CatalogStore::new(source);
        store.load_catalog().await.unwrap();

        assert_eq!(store.items().await, fresh);
        assert!(store.has_loaded_catalog().await);
        assert_eq!(store.revision(), 1);
        assert_eq!(store.source().catalog_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_catalog_keeps_previous_list() {
        let store = CatalogStore::new(StubSource::default());
        let before = store.items().await;

        let result = store.load_catalog().await;

        assert!(matches!(result, Err(MarketError::FetchFailed { action: ApiAction::Nfts, .. })));
        assert_eq!(store.items().await, before);
        assert!(!store.has_loaded_catalog().await);
        assert_eq!(store.revision(), 0);
    }

    #[tokio::test]
    async fn test_failed_user_load_keeps_previous_snapshot() {
        let source = StubSource::default();
        *source.user.lock().unwrap() = Some(Ok(user(300)));
        let store = CatalogStore::new(source);

        store.load_user_snapshot("1").await.unwrap();
        assert!(store.load_user_snapshot("1").await.is_err());

        assert_eq!(store.user().await.map(|u| u.balance), Some(300));
    }

    #[tokio::test]
    async fn test_user_snapshot_replaced_not_merged() {
        let source = StubSource::default();
        let mut first = user(300);
        first.owned_items = seed_catalog();
        *source.user.lock().unwrap() = Some(Ok(first));
        let store = CatalogStore::new(source);
        store.load_user_snapshot("1").await.unwrap();

        *store.source().user.lock().unwrap() = Some(Ok(user(50)));
        store.load_user_snapshot("1").await.unwrap();

        let current = store.user().await.unwrap();
        assert_eq!(current.balance, 50);
        assert!(current.owned_items.is_empty());
    }

    #[tokio::test]
    async fn test_failed_stats_keep_previous_counters() {
        let source = StubSource::default();
        *source.stats.lock().unwrap() = Some(Ok(stats(9)));
        let store = CatalogStore::new(source);

        store.load_aggregate_stats().await.unwrap();
        assert!(store.load_aggregate_stats().await.is_err());
        assert_eq!(store.stats().await.total_sales, 9);
    }

    #[tokio::test]
    async fn test_load_all_failures_are_independent() {
        let source = StubSource::default();
        *source.stats.lock().unwrap() = Some(Ok(stats(3)));
        *source.user.lock().unwrap() = Some(Ok(user(10)));
        let store = CatalogStore::new(source);

        let report = store.load_all("1").await;

        assert!(report.catalog.is_err());
        assert!(report.user.is_ok());
        assert!(report.stats.is_ok());
        assert!(!report.is_complete());
        assert_eq!(report.failures().len(), 1);

        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.items, seed_catalog());
        assert_eq!(snapshot.stats.total_sales, 3);
        assert_eq!(snapshot.user.map(|u| u.balance), Some(10));
        assert_eq!(snapshot.revision, 2);

        let s = store.source();
        assert_eq!(s.catalog_calls.load(Ordering::SeqCst), 1);
        assert_eq!(s.user_calls.load(Ordering::SeqCst), 1);
        assert_eq!(s.stats_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_completions_land_without_waiting_for_slow_read() {
        let gate = Arc::new(Notify::new());
        let source = StubSource {
            catalog_gate: Some(gate.clone()),
            ..StubSource::default()
        };
        *source.catalog.lock().unwrap() = Some(Ok(vec![Item::new(9, "🎁", "Box", 5, Rarity::Common, "g")]));
        *source.stats.lock().unwrap() = Some(Ok(stats(1)));
        *source.user.lock().unwrap() = Some(Ok(user(1)));

        let store = Arc::new(CatalogStore::new(source));
        let mut changes = store.subscribe();

        let loader = {
            let store = store.clone();
            tokio::spawn(async move { store.load_all("1").await })
        };

        // user + stats land while the catalog read is still parked
        while *changes.borrow_and_update() < 2 {
            changes.changed().await.unwrap();
        }
        assert_eq!(store.stats().await.total_sales, 1);
        assert!(store.user().await.is_some());
        assert!(!store.has_loaded_catalog().await);

        gate.notify_one();
        let report = loader.await.unwrap();
        assert!(report.is_complete());
        assert_eq!(store.items().await.len(), 1);
        assert_eq!(store.revision(), 3);
    }
}
