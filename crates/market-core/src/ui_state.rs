//! ============================================================================
//! UI State - Immutable screen state and its reducer
//! ============================================================================
//! Everything the presentation layer used to keep in loose mutable variables
//! (current page, search box, rarity selector, dialog flags) lives in one
//! `UiState` value. User intents arrive as `UiEvent`s and `reduce` returns
//! the next state; the renderer only ever draws the latest one.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::projection::RarityFilter;

/// Top-level pages of the app
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    Marketplace,
    Profile,
    Admin,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Marketplace, Page::Profile, Page::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Marketplace => "marketplace",
            Page::Profile => "profile",
            Page::Admin => "admin",
        }
    }

    /// Navigation bar label
    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Marketplace => "Market",
            Page::Profile => "Profile",
            Page::Admin => "Admin",
        }
    }

    /// Route lookup; unknown names land on the home page
    pub fn from_route(route: &str) -> Self {
        route.parse().unwrap_or_default()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Page {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "home" => Ok(Page::Home),
            "marketplace" | "market" => Ok(Page::Marketplace),
            "profile" => Ok(Page::Profile),
            "admin" => Ok(Page::Admin),
            other => Err(format!("Unknown page '{}'", other)),
        }
    }
}

/// Complete UI state at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    pub page: Page,
    pub search_text: String,
    pub rarity_filter: RarityFilter,
    pub balance_dialog_open: bool,
    /// "Copied!" notice after copying the top-up card number
    pub card_number_copied: bool,
    pub create_nft_dialog_open: bool,
}

/// User intents forwarded by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UiEvent {
    Navigate(Page),
    SearchChanged(String),
    RarityFilterChanged(RarityFilter),
    BalanceDialogOpened,
    BalanceDialogClosed,
    CardNumberCopied,
    /// Fired by the renderer's timer once the "copied" notice has been shown
    CopyNoticeExpired,
    CreateNftDialogOpened,
    CreateNftDialogClosed,
}

/// Next state for `event`. Pure: the input state is left untouched.
pub fn reduce(state: &UiState, event: UiEvent) -> UiState {
    let mut next = state.clone();
    match event {
        UiEvent::Navigate(page) => next.page = page,
        UiEvent::SearchChanged(text) => next.search_text = text,
        UiEvent::RarityFilterChanged(filter) => next.rarity_filter = filter,
        UiEvent::BalanceDialogOpened => next.balance_dialog_open = true,
        UiEvent::BalanceDialogClosed => {
            next.balance_dialog_open = false;
            next.card_number_copied = false;
        }
        UiEvent::CardNumberCopied => next.card_number_copied = true,
        UiEvent::CopyNoticeExpired => next.card_number_copied = false,
        UiEvent::CreateNftDialogOpened => next.create_nft_dialog_open = true,
        UiEvent::CreateNftDialogClosed => next.create_nft_dialog_open = false,
    }
    next
}

/// Fold a sequence of events over a starting state
pub fn replay(state: &UiState, events: impl IntoIterator<Item = UiEvent>) -> UiState {
    events
        .into_iter()
        .fold(state.clone(), |acc, event| reduce(&acc, event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rarity;

    #[test]
    fn test_default_state() {
        let state = UiState::default();
        assert_eq!(state.page, Page::Home);
        assert!(state.search_text.is_empty());
        assert_eq!(state.rarity_filter, RarityFilter::All);
        assert!(!state.balance_dialog_open);
        assert!(!state.create_nft_dialog_open);
    }

    #[test]
    fn test_reduce_does_not_mutate_input() {
        let state = UiState::default();
        let next = reduce(&state, UiEvent::Navigate(Page::Admin));
        assert_eq!(state.page, Page::Home);
        assert_eq!(next.page, Page::Admin);
    }

    #[test]
    fn test_navigation_keeps_search_and_filter() {
        let state = replay(
            &UiState::default(),
            [
                UiEvent::Navigate(Page::Marketplace),
                UiEvent::SearchChanged("star".into()),
                UiEvent::RarityFilterChanged(RarityFilter::Only(Rarity::Rare)),
                UiEvent::Navigate(Page::Profile),
                UiEvent::Navigate(Page::Marketplace),
            ],
        );
        assert_eq!(state.page, Page::Marketplace);
        assert_eq!(state.search_text, "star");
        assert_eq!(state.rarity_filter, RarityFilter::Only(Rarity::Rare));
    }

    #[test]
    fn test_balance_dialog_flow() {
        let open = replay(
            &UiState::default(),
            [UiEvent::BalanceDialogOpened, UiEvent::CardNumberCopied],
        );
        assert!(open.balance_dialog_open);
        assert!(open.card_number_copied);

        let expired = reduce(&open, UiEvent::CopyNoticeExpired);
        assert!(expired.balance_dialog_open);
        assert!(!expired.card_number_copied);

        let closed = reduce(&open, UiEvent::BalanceDialogClosed);
        assert!(!closed.balance_dialog_open);
        assert!(!closed.card_number_copied);
    }

    #[test]
    fn test_create_dialog_toggle() {
        let open = reduce(&UiState::default(), UiEvent::CreateNftDialogOpened);
        assert!(open.create_nft_dialog_open);
        assert!(!reduce(&open, UiEvent::CreateNftDialogClosed).create_nft_dialog_open);
    }

    #[test]
    fn test_unknown_route_is_home() {
        assert_eq!(Page::from_route("marketplace"), Page::Marketplace);
        assert_eq!(Page::from_route("market"), Page::Marketplace);
        assert_eq!(Page::from_route("ADMIN"), Page::Admin);
        assert_eq!(Page::from_route("settings"), Page::Home);
    }

    #[test]
    fn test_event_wire_format() {
        let json = serde_json::to_string(&UiEvent::SearchChanged("crown".into())).unwrap();
        assert_eq!(json, r#"{"type":"search_changed","value":"crown"}"#);

        let event: UiEvent = serde_json::from_str(r#"{"type":"navigate","value":"profile"}"#).unwrap();
        assert_eq!(event, UiEvent::Navigate(Page::Profile));
    }

    #[test]
    fn test_rarity_filter_event_wire_format() {
        let json = serde_json::to_string(&UiEvent::RarityFilterChanged(RarityFilter::Only(Rarity::Rare)))
            .unwrap();
        assert_eq!(json, r#"{"type":"rarity_filter_changed","value":"rare"}"#);

        let rare: UiEvent =
            serde_json::from_str(r#"{"type":"rarity_filter_changed","value":"rare"}"#).unwrap();
        assert_eq!(rare, UiEvent::RarityFilterChanged(RarityFilter::Only(Rarity::Rare)));

        let unknown: UiEvent =
            serde_json::from_str(r#"{"type":"rarity_filter_changed","value":"mythic"}"#).unwrap();
        assert_eq!(unknown, UiEvent::RarityFilterChanged(RarityFilter::All));

        let all: UiEvent =
            serde_json::from_str(r#"{"type":"rarity_filter_changed","value":"all"}"#).unwrap();
        assert_eq!(all, UiEvent::RarityFilterChanged(RarityFilter::All));
    }
}
