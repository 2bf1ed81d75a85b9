//! ============================================================================
//! Screens - What each page shows
//! ============================================================================
//! Pure functions from a store snapshot plus UI state to the data a renderer
//! draws for the home dashboard, marketplace, profile and admin pages.
//! ============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::projection::{project, Projection};
use crate::store::StoreSnapshot;
use crate::types::{AggregateStats, Item, ItemId, Rarity, Transaction, TransactionType};
use crate::ui_state::{Page, UiState};

/// Items featured on the home page
pub const POPULAR_COUNT: usize = 4;

/// Items listed in the admin management panel
pub const ADMIN_LIST_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum Screen {
    Home(HomeScreen),
    Marketplace(MarketplaceScreen),
    Profile(ProfileScreen),
    Admin(AdminScreen),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeScreen {
    pub popular: Vec<Item>,
    pub stats: AggregateStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketplaceScreen {
    pub search_text: String,
    pub rarity_filter: String,
    /// A catalog read has succeeded at least once
    pub catalog_loaded: bool,
    pub projection: Projection,
}

impl MarketplaceScreen {
    /// Nothing to show because no catalog has arrived yet, as opposed to a
    /// loaded catalog that is empty or matched nothing
    pub fn awaiting_data(&self) -> bool {
        !self.catalog_loaded && self.projection.source_len == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileScreen {
    /// False until a user snapshot has loaded; counters then read zero
    pub loaded: bool,
    pub balance: u64,
    pub owned_count: usize,
    pub gifts_sent: usize,
    pub owned_items: Vec<Item>,
    pub history: Vec<TransactionRow>,
    pub balance_dialog_open: bool,
    pub card_number_copied: bool,
}

/// One line of the transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub kind: TransactionType,
    pub label: &'static str,
    /// `"<emoji> <name>"` when the entry refers to an item
    pub item_caption: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Signed amount, only for monetary entries
    pub amount: Option<String>,
    pub is_credit: bool,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        let item_caption = tx.emoji.as_ref().map(|emoji| match &tx.nft_name {
            Some(name) => format!("{} {}", emoji, name),
            None => emoji.clone(),
        });

        Self {
            id: tx.id,
            kind: tx.transaction_type,
            label: tx.transaction_type.label(),
            item_caption,
            created_at: tx.created_at,
            amount: tx.amount_display(),
            is_credit: tx.monetary_amount().map(|a| a > 0).unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminScreen {
    pub managed: Vec<AdminRow>,
    pub create_nft_dialog_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminRow {
    pub id: ItemId,
    pub emoji: String,
    pub name: String,
    pub rarity: Rarity,
    pub price_in_coins: u64,
}

pub fn home(snapshot: &StoreSnapshot) -> HomeScreen {
    HomeScreen {
        popular: snapshot.items.iter().take(POPULAR_COUNT).cloned().collect(),
        stats: snapshot.stats,
    }
}

pub fn marketplace(snapshot: &StoreSnapshot, ui: &UiState) -> MarketplaceScreen {
    MarketplaceScreen {
        search_text: ui.search_text.clone(),
        rarity_filter: ui.rarity_filter.to_string(),
        catalog_loaded: snapshot.catalog_loaded,
        projection: project(&snapshot.items, &ui.search_text, ui.rarity_filter),
    }
}

pub fn profile(snapshot: &StoreSnapshot, ui: &UiState) -> ProfileScreen {
    let (balance, owned_items, history, gifts_sent) = match &snapshot.user {
        Some(user) => (
            user.balance,
            user.owned_items.clone(),
            user.transactions.iter().map(TransactionRow::from).collect(),
            user.gifts_sent(),
        ),
        None => (0, Vec::new(), Vec::new(), 0),
    };

    ProfileScreen {
        loaded: snapshot.user.is_some(),
        balance,
        owned_count: owned_items.len(),
        gifts_sent,
        owned_items,
        history,
        balance_dialog_open: ui.balance_dialog_open,
        card_number_copied: ui.card_number_copied,
    }
}

pub fn admin(snapshot: &StoreSnapshot, ui: &UiState) -> AdminScreen {
    AdminScreen {
        managed: snapshot
            .items
            .iter()
            .take(ADMIN_LIST_COUNT)
            .map(|item| AdminRow {
                id: item.id,
                emoji: item.visual_theme.emoji.clone(),
                name: item.name.clone(),
                rarity: item.rarity,
                price_in_coins: item.price_in_coins,
            })
            .collect(),
        create_nft_dialog_open: ui.create_nft_dialog_open,
    }
}

/// Screen for the page currently selected in `ui`
pub fn render(snapshot: &StoreSnapshot, ui: &UiState) -> Screen {
    match ui.page {
        Page::Home => Screen::Home(home(snapshot)),
        Page::Marketplace => Screen::Marketplace(marketplace(snapshot, ui)),
        Page::Profile => Screen::Profile(profile(snapshot, ui)),
        Page::Admin => Screen::Admin(admin(snapshot, ui)),
    }
}
