use std::str::FromStr;

use mint_chain::{U256, parse_price};
use mint_core::MarketError;

use crate::item::NftItem;

/// Ordering for the home listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest token first.
    #[default]
    Recent,
    PriceLow,
    PriceHigh,
}

impl FromStr for SortOrder {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" | "recently-added" => Ok(Self::Recent),
            "price-low" | "low" => Ok(Self::PriceLow),
            "price-high" | "high" => Ok(Self::PriceHigh),
            other => Err(MarketError::InvalidInput(format!(
                "unknown sort order `{other}` (expected recent, price-low or price-high)"
            ))),
        }
    }
}

/// Search and sort options applied client-side to fetched listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl ListingQuery {
    pub fn apply(&self, mut items: Vec<NftItem>) -> Vec<NftItem> {
        if let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = needle.to_lowercase();
            items.retain(|item| item.name.to_lowercase().contains(&needle));
        }

        match self.sort {
            SortOrder::Recent => items.sort_by(|a, b| b.token_id.cmp(&a.token_id)),
            SortOrder::PriceLow => items.sort_by_key(price_key),
            SortOrder::PriceHigh => {
                items.sort_by_key(price_key);
                items.reverse();
            }
        }
        items
    }
}

// Unparseable prices sort as zero rather than failing the whole page.
fn price_key(item: &NftItem) -> U256 {
    parse_price(&item.price).unwrap_or(U256::ZERO)
}
