//! Auction state - listings, bids, trades, and the per-outpost market.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use starbazaar_logic::pricing::PricingGuide;

/// One unit of an item offered for sale. Immutable once created; a
/// multi-unit sale is several listings. The unit itself sits escrowed
/// in the outpost's market storage until sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub item: String,
    /// Wallet paid when the unit sells.
    pub owner_wallet: u32,
    /// Storage the unit came from (informational; unsold units stay
    /// escrowed and the listing carries forward).
    pub source_storage: u32,
    /// Reference price shown to bidders.
    pub starting_bid: u64,
}

/// An offer to buy `quantity` units at `unit_price` each, backed by a
/// wallet and delivered to a destination storage. Immutable; consumed
/// by the next clearing pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bid {
    pub item: String,
    pub quantity: u32,
    pub unit_price: u64,
    pub wallet: u32,
    pub storage: u32,
}

/// An executed trade, recorded for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub item: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub buyer_wallet: u32,
}

/// Per-outpost market state: pricing history, demand signals, and the
/// listing/bid sets the clearing pass operates on.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Market {
    /// Rolling-average trade prices per item.
    pub pricing: PricingGuide,
    /// Signed demand score per item category.
    pub popularity: BTreeMap<String, i32>,
    /// Listings posted this cycle; promoted to `open` when the next
    /// clearing pass starts.
    pub new_listings: Vec<Listing>,
    /// Listings open for bidding. Unsold listings carry forward.
    pub open_listings: Vec<Listing>,
    /// Bids awaiting the next clearing pass.
    pub bids: Vec<Bid>,
    /// Executed trades, for the operator report.
    pub trade_log: Vec<Trade>,
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn popularity_of(&self, category: &str) -> i32 {
        self.popularity.get(category).copied().unwrap_or(0)
    }

    pub fn bump_popularity(&mut self, category: &str, delta: i32) {
        *self.popularity.entry(category.to_string()).or_insert(0) += delta;
    }

    /// Open listings for one item.
    pub fn open_listings_of<'a>(&'a self, item: &'a str) -> impl Iterator<Item = &'a Listing> + 'a {
        self.open_listings.iter().filter(move |l| l.item == item)
    }

    /// Whether a wallet has any listing (new or open) on this market.
    pub fn has_listing_by(&self, wallet: u32) -> bool {
        self.open_listings.iter().any(|l| l.owner_wallet == wallet)
            || self.new_listings.iter().any(|l| l.owner_wallet == wallet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popularity_defaults_to_zero() {
        let mut market = Market::new();
        assert_eq!(market.popularity_of("Food"), 0);
        market.bump_popularity("Food", 2);
        market.bump_popularity("Food", -5);
        assert_eq!(market.popularity_of("Food"), -3);
    }

    #[test]
    fn test_open_listings_filter() {
        let mut market = Market::new();
        market.open_listings.push(Listing {
            item: "Food.Wheat".into(),
            owner_wallet: 1,
            source_storage: 2,
            starting_bid: 90,
        });
        market.open_listings.push(Listing {
            item: "Ore.Iron".into(),
            owner_wallet: 1,
            source_storage: 2,
            starting_bid: 50,
        });
        assert_eq!(market.open_listings_of("Food.Wheat").count(), 1);
        assert!(market.has_listing_by(1));
        assert!(!market.has_listing_by(9));
    }
}
