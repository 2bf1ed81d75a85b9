//! ============================================================================
//! View Projection - Marketplace search and rarity filter
//! ============================================================================
//! Pure derivation from (items, search text, rarity filter) to the items the
//! marketplace shows. Deterministic, side-effect free, safe to recompute on
//! every keystroke.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Item, Rarity};

/// Rarity selector of the marketplace screen. On the wire it is the plain
/// selector string (`"all"`, `"rare"`, ...); unknown values decode as `All`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RarityFilter {
    #[default]
    All,
    Only(Rarity),
}

impl RarityFilter {
    /// Permissive parse: "all", empty or anything unrecognized means `All`
    pub fn parse(raw: &str) -> Self {
        raw.trim()
            .parse::<Rarity>()
            .map(RarityFilter::Only)
            .unwrap_or(RarityFilter::All)
    }

    pub fn admits(&self, rarity: Rarity) -> bool {
        match self {
            RarityFilter::All => true,
            RarityFilter::Only(wanted) => *wanted == rarity,
        }
    }
}

impl From<&str> for RarityFilter {
    fn from(raw: &str) -> Self {
        RarityFilter::parse(raw)
    }
}

impl From<String> for RarityFilter {
    fn from(raw: String) -> Self {
        RarityFilter::parse(&raw)
    }
}

impl From<RarityFilter> for String {
    fn from(filter: RarityFilter) -> Self {
        filter.to_string()
    }
}

impl fmt::Display for RarityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RarityFilter::All => f.write_str("all"),
            RarityFilter::Only(rarity) => write!(f, "{}", rarity),
        }
    }
}

/// Items the marketplace displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub items: Vec<Item>,
    /// The catalog had items but none passed the filter
    pub matched_none: bool,
    /// Size of the list the filter ran over
    pub source_len: usize,
}

/// Keep items passing both the rarity filter and the case-insensitive name
/// search, in their original order.
pub fn project(items: &[Item], search_text: &str, rarity_filter: RarityFilter) -> Projection {
    let needle = search_text.to_lowercase();

    let retained: Vec<Item> = items
        .iter()
        .filter(|item| rarity_filter.admits(item.rarity))
        .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    Projection {
        matched_none: !items.is_empty() && retained.is_empty(),
        source_len: items.len(),
        items: retained,
    }
}
