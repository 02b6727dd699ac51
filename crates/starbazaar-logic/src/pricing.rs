//! Rolling-average pricing guide.
//!
//! Every outpost keeps a ledger of what each item has traded for. The
//! suggested value of an item is the rolling average of its trades,
//! seeded at [`STARTING_PRICE`] the first time anyone asks about an
//! item that has never traded.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seed price for an item with no trade history.
pub const STARTING_PRICE: u64 = 100;

/// Per-item trade history: how many units have traded and at what
/// rolling average unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerItem {
    /// Units traded so far. A seeded-but-untraded entry has 0 here.
    pub traded: u64,
    /// Rolling average unit price.
    pub price: u64,
}

impl LedgerItem {
    pub fn new() -> Self {
        Self { traded: 0, price: 0 }
    }

    fn seeded() -> Self {
        Self {
            traded: 0,
            price: STARTING_PRICE,
        }
    }

    /// Fold one observed unit price into the rolling average.
    ///
    /// At `traded == 0` the observed price replaces whatever seed was
    /// there, so the placeholder never drags on the real average.
    pub fn add(&mut self, price: u64) {
        self.price = (self.price * self.traded + price) / (self.traded + 1);
        self.traded += 1;
    }
}

impl Default for LedgerItem {
    fn default() -> Self {
        Self::new()
    }
}

/// The set of ledger items for one outpost. Entries are created lazily
/// and never removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingGuide {
    entries: BTreeMap<String, LedgerItem>,
}

impl PricingGuide {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suggested value of an item. An item that has never traded is
    /// seeded at [`STARTING_PRICE`]; repeat calls keep returning that
    /// constant until a real trade folds in.
    pub fn suggested_value(&mut self, item: &str) -> u64 {
        let entry = self
            .entries
            .entry(item.to_string())
            .or_insert_with(LedgerItem::seeded);
        entry.price
    }

    /// Read-only quote: the current average if known, otherwise
    /// [`STARTING_PRICE`] without creating an entry. Used for net-worth
    /// valuation so reporting never mutates market state.
    pub fn quote(&self, item: &str) -> u64 {
        self.entries
            .get(item)
            .map(|l| l.price)
            .unwrap_or(STARTING_PRICE)
    }

    /// Fold one executed trade into the item's rolling average. The
    /// first recorded trade replaces the seed, if any.
    pub fn record_trade(&mut self, item: &str, price: u64) {
        self.entries
            .entry(item.to_string())
            .or_insert_with(LedgerItem::seeded)
            .add(price);
    }

    /// Trade count for an item (0 if never quoted or traded).
    pub fn trade_count(&self, item: &str) -> u64 {
        self.entries.get(item).map(|l| l.traded).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_first_fold_seeds() {
        let mut ledger = LedgerItem::new();
        ledger.add(80);
        assert_eq!(ledger.price, 80);
        assert_eq!(ledger.traded, 1);
    }

    #[test]
    fn test_ledger_rolling_average() {
        let mut ledger = LedgerItem::new();
        ledger.add(100);
        ledger.add(50);
        // (100 * 1 + 50) / 2 = 75
        assert_eq!(ledger.price, 75);
        assert_eq!(ledger.traded, 2);
    }

    #[test]
    fn test_suggested_value_seed_idempotent() {
        let mut guide = PricingGuide::new();
        let first = guide.suggested_value("Food.Wheat");
        assert_eq!(first, STARTING_PRICE);
        // repeated calls return the same constant until a trade occurs
        assert_eq!(guide.suggested_value("Food.Wheat"), first);
        assert_eq!(guide.suggested_value("Food.Wheat"), first);
    }

    #[test]
    fn test_record_trade_replaces_seed() {
        let mut guide = PricingGuide::new();
        assert_eq!(guide.suggested_value("Ore.Iron"), STARTING_PRICE);
        guide.record_trade("Ore.Iron", 200);
        assert_eq!(guide.suggested_value("Ore.Iron"), 200);
        assert_eq!(guide.trade_count("Ore.Iron"), 1);
        guide.record_trade("Ore.Iron", 100);
        assert_eq!(guide.suggested_value("Ore.Iron"), 150);
        assert_eq!(guide.trade_count("Ore.Iron"), 2);
    }

    #[test]
    fn test_quote_does_not_mutate() {
        let guide = PricingGuide::new();
        assert_eq!(guide.quote("Tech.Servo"), STARTING_PRICE);
        assert!(guide.is_empty());
    }
}
