//! Inventory and currency containers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A capacity-bounded multiset of items. Outposts own a production
/// storage and a market (escrow) storage plus warehouses; ships own a
/// cargo hold.
///
/// Invariants: every stored quantity is ≥ 1 (zero entries are pruned),
/// and the total never exceeds `capacity` when one is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Storage {
    /// Stable id of this storage entity.
    pub id: u32,
    /// Outpost id this storage is currently located at. Transfers are
    /// only valid between storages at the same location.
    pub location: Option<u32>,
    /// Maximum total items; `None` = unbounded.
    pub capacity: Option<u32>,
    items: BTreeMap<String, u32>,
}

impl Storage {
    pub fn new(id: u32, location: Option<u32>, capacity: Option<u32>) -> Self {
        Self {
            id,
            location,
            capacity,
            items: BTreeMap::new(),
        }
    }

    /// Add up to `amount` units, clamped to remaining capacity. Returns
    /// the amount actually added; never fails.
    pub fn add(&mut self, item: &str, amount: u32) -> u32 {
        let amount = amount.min(self.free_space());
        if amount == 0 {
            return 0;
        }
        *self.items.entry(item.to_string()).or_insert(0) += amount;
        amount
    }

    /// Remove exactly `amount` units. Rejects (no mutation) when the
    /// item is absent or held in a smaller quantity, since over-removal
    /// would un-conserve goods.
    pub fn remove(&mut self, item: &str, amount: u32) -> bool {
        match self.items.get_mut(item) {
            Some(held) if *held >= amount => {
                *held -= amount;
                if *held == 0 {
                    self.items.remove(item);
                }
                true
            }
            _ => false,
        }
    }

    /// Remove up to `amount` units, returning how many were removed.
    pub fn remove_up_to(&mut self, item: &str, amount: u32) -> u32 {
        let take = amount.min(self.amount_of(item));
        if take > 0 {
            self.remove(item, take);
        }
        take
    }

    /// Whether at least `amount` units of `item` are held.
    pub fn contains(&self, item: &str, amount: u32) -> bool {
        self.amount_of(item) >= amount.max(1)
    }

    pub fn amount_of(&self, item: &str) -> u32 {
        self.items.get(item).copied().unwrap_or(0)
    }

    /// Total units held across all items.
    pub fn total(&self) -> u32 {
        self.items.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remaining space; `u32::MAX` when unbounded.
    pub fn free_space(&self) -> u32 {
        match self.capacity {
            Some(cap) => cap.saturating_sub(self.total()),
            None => u32::MAX,
        }
    }

    /// Item → quantity view, for snapshots and iteration.
    pub fn items(&self) -> &BTreeMap<String, u32> {
        &self.items
    }
}

/// A non-negative currency balance ("bits"). The balance type makes
/// negative values unrepresentable; transfer logic keeps every step
/// non-overdrawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    /// Stable id of this wallet entity.
    pub id: u32,
    /// Outpost id this wallet is currently located at.
    pub location: Option<u32>,
    bits: u64,
}

impl Wallet {
    pub fn new(id: u32, location: Option<u32>) -> Self {
        Self { id, location, bits: 0 }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    /// Unconditional credit. World seeding only; runtime currency moves
    /// through `transfer_bits`.
    pub fn add_bits(&mut self, amount: u64) {
        self.bits += amount;
    }

    /// Debit that refuses to overdraw.
    pub(crate) fn debit(&mut self, amount: u64) -> bool {
        if self.bits >= amount {
            self.bits -= amount;
            true
        } else {
            false
        }
    }

    pub(crate) fn credit(&mut self, amount: u64) {
        self.bits += amount;
    }
}
