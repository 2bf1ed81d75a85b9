//! ============================================================================
//! Core Types for the Gift Market
//! ============================================================================
//! Catalog items, user snapshots, ledger entries and platform counters.
//! Field names follow the marketplace API's JSON wire format.
//! ============================================================================

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Catalog item identifier (server-assigned, immutable)
pub type ItemId = i64;

// ============================================================================
// Rarity
// ============================================================================

/// Rarity tier of a gift. Ordered `Common < Rare < Epic < Legendary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Every tier, lowest first
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    /// Badge shown next to an item name: upper-case label plus colour token
    pub fn badge(&self) -> RarityBadge {
        let color = match self {
            Rarity::Common => "gray-500",
            Rarity::Rare => "blue-500",
            Rarity::Epic => "purple-500",
            Rarity::Legendary => "yellow-500",
        };
        RarityBadge {
            label: self.as_str().to_uppercase(),
            color,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a rarity string is not one of the four known tiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown rarity '{0}'")]
pub struct UnknownRarity(pub String);

impl FromStr for Rarity {
    type Err = UnknownRarity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "rare" => Ok(Rarity::Rare),
            "epic" => Ok(Rarity::Epic),
            "legendary" => Ok(Rarity::Legendary),
            _ => Err(UnknownRarity(s.to_string())),
        }
    }
}

/// Display data for a rarity badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RarityBadge {
    pub label: String,
    pub color: &'static str,
}

// ============================================================================
// Catalog Items
// ============================================================================

/// Presentation token for an item card. Never interpreted by the logic layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualTheme {
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub gradient: String,
}

/// A purchasable gift in the marketplace catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "price")]
    pub price_in_coins: u64,
    pub rarity: Rarity,
    #[serde(flatten)]
    pub visual_theme: VisualTheme,
    #[serde(default)]
    pub description: Option<String>,
    /// Only present on items returned as part of a user's collection
    #[serde(default, with = "timestamp::option")]
    pub acquired_at: Option<DateTime<Utc>>,
    /// Set locally for items decoded from a user's collection
    #[serde(skip)]
    pub owned_by_current_user: bool,
}

impl Item {
    pub fn new(
        id: ItemId,
        emoji: &str,
        name: &str,
        price_in_coins: u64,
        rarity: Rarity,
        gradient: &str,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            price_in_coins,
            rarity,
            visual_theme: VisualTheme {
                emoji: emoji.to_string(),
                gradient: gradient.to_string(),
            },
            description: None,
            acquired_at: None,
            owned_by_current_user: false,
        }
    }
}

// ============================================================================
// User Ledger
// ============================================================================

/// Kind of ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Purchase,
    Deposit,
    /// Gift received from another user
    Gift,
    /// Gift sent to another user
    Transfer,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "purchase",
            TransactionType::Deposit => "deposit",
            TransactionType::Gift => "gift",
            TransactionType::Transfer => "transfer",
        }
    }

    /// Human-readable label for history rows
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "NFT purchase",
            TransactionType::Deposit => "Balance top-up",
            TransactionType::Gift => "Gift received",
            TransactionType::Transfer => "Gift sent",
        }
    }
}

/// One entry in a user's transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub transaction_type: TransactionType,
    /// Positive = credit, negative = debit, absent or zero = non-monetary
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub nft_name: Option<String>,
}

impl Transaction {
    /// Non-zero amount, if any
    pub fn monetary_amount(&self) -> Option<i64> {
        self.amount.filter(|a| *a != 0)
    }

    /// Signed amount for display (`+250`, `-100`), None for non-monetary entries
    pub fn amount_display(&self) -> Option<String> {
        self.monetary_amount().map(|a| {
            if a > 0 {
                format!("+{}", a)
            } else {
                a.to_string()
            }
        })
    }
}

/// Complete picture of one user at fetch time. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub user_id: String,
    pub balance: u64,
    /// Server order, not re-sorted
    pub owned_items: Vec<Item>,
    /// Server order, not re-sorted
    pub transactions: Vec<Transaction>,
}

impl UserSnapshot {
    /// Number of gifts this user has sent to others
    pub fn gifts_sent(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.transaction_type == TransactionType::Transfer)
            .count()
    }
}

// ============================================================================
// Platform Counters
// ============================================================================

/// Platform-wide counters. Independent of the catalog and user snapshots;
/// any field missing from a response is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateStats {
    pub total_sales: u64,
    pub total_users: u64,
    pub total_nfts: u64,
    pub total_transactions: u64,
}

/// Result of a successful purchase call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// Timestamp Wire Format
// ============================================================================

/// The API emits RFC 3339 for zoned columns and bare ISO-8601 for naive
/// ones; naive values are taken as UTC.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        super::parse_timestamp(raw)
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => super::serialize(v, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw))),
                None => Ok(None),
            }
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_rarity_ordering() {
        assert!(Rarity::Common < Rarity::Rare);
        assert!(Rarity::Rare < Rarity::Epic);
        assert!(Rarity::Epic < Rarity::Legendary);
    }

    #[test]
    fn test_rarity_from_str() {
        assert_eq!("legendary".parse::<Rarity>(), Ok(Rarity::Legendary));
        assert_eq!("EPIC".parse::<Rarity>(), Ok(Rarity::Epic));
        assert!("mythic".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_unknown_rarity_rejected_on_decode() {
        let json = r#"{"id": 1, "name": "X", "price": 10, "rarity": "mythic", "emoji": "x", "gradient": "g"}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }

    #[test]
    fn test_badge_is_uppercase() {
        let badge = Rarity::Legendary.badge();
        assert_eq!(badge.label, "LEGENDARY");
        assert_eq!(badge.color, "yellow-500");
    }

    #[test]
    fn test_item_wire_format() {
        let json = r#"{
            "id": 4, "emoji": "👑", "name": "Crown", "description": "",
            "price": 1000, "rarity": "legendary",
            "gradient": "bg-gradient-to-br from-yellow-300 to-yellow-600",
            "created_at": "2025-01-10T08:00:00"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, 4);
        assert_eq!(item.price_in_coins, 1000);
        assert_eq!(item.rarity, Rarity::Legendary);
        assert_eq!(item.visual_theme.emoji, "👑");
        assert!(!item.owned_by_current_user);
        assert!(item.acquired_at.is_none());
    }

    #[test]
    fn test_negative_price_rejected() {
        let json = r#"{"id": 1, "name": "X", "price": -5, "rarity": "rare"}"#;
        assert!(serde_json::from_str::<Item>(json).is_err());
    }

    #[test]
    fn test_naive_and_zoned_timestamps() {
        let naive = timestamp::parse("2025-03-01T12:30:45.123456").unwrap();
        assert_eq!(naive.day(), 1);
        assert_eq!(naive.hour(), 12);

        let zoned = timestamp::parse("2025-03-01T12:30:45+03:00").unwrap();
        assert_eq!(zoned.hour(), 9);

        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_transaction_amount_display() {
        let mut tx: Transaction = serde_json::from_str(
            r#"{"id": 1, "transaction_type": "deposit", "amount": 500, "created_at": "2025-03-01T10:00:00"}"#,
        )
        .unwrap();
        assert_eq!(tx.amount_display().as_deref(), Some("+500"));

        tx.amount = Some(-250);
        assert_eq!(tx.amount_display().as_deref(), Some("-250"));

        tx.amount = Some(0);
        assert_eq!(tx.amount_display(), None);

        tx.amount = None;
        assert_eq!(tx.amount_display(), None);
    }

    #[test]
    fn test_stats_missing_fields_default_to_zero() {
        let stats: AggregateStats = serde_json::from_str(r#"{"total_users": 12}"#).unwrap();
        assert_eq!(stats.total_users, 12);
        assert_eq!(stats.total_sales, 0);
        assert_eq!(stats.total_nfts, 0);
        assert_eq!(stats.total_transactions, 0);
    }

    #[test]
    fn test_gifts_sent_counts_transfers_only() {
        let tx = |id: i64, kind: &str| -> Transaction {
            serde_json::from_str(&format!(
                r#"{{"id": {}, "transaction_type": "{}", "created_at": "2025-03-01T10:00:00"}}"#,
                id, kind
            ))
            .unwrap()
        };
        let user = UserSnapshot {
            user_id: "1".into(),
            balance: 0,
            owned_items: vec![],
            transactions: vec![tx(1, "transfer"), tx(2, "gift"), tx(3, "transfer"), tx(4, "purchase")],
        };
        assert_eq!(user.gifts_sent(), 2);
    }
}
