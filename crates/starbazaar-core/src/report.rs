//! Operator-facing wealth and activity report.

use std::fmt;

use hecs::World;

use crate::components::{Market, Outpost, Ship, Wallet};
use crate::ids::IdIndex;
use crate::systems::transfer;

/// A point-in-time snapshot of where the bits and goods are. Cargo is
/// valued at the owning location's ledger prices (unseen items at the
/// starting price).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WealthReport {
    pub ship_count: usize,
    pub ship_bits: u64,
    pub ship_cargo_value: u64,
    pub outpost_count: usize,
    pub outpost_bits: u64,
    pub outpost_stock_value: u64,
    /// Bits held by market wallets pending payout.
    pub escrow_bits: u64,
    /// Valuation of goods escrowed for auction.
    pub escrow_cargo_value: u64,
    pub open_listings: usize,
    pub pending_bids: usize,
    /// Quantity-weighted average over every recorded trade.
    pub average_sale_price: u64,
    pub average_bid: u64,
}

impl WealthReport {
    pub fn collect(world: &World, ids: &IdIndex) -> Self {
        let mut report = WealthReport::default();
        let mut sale_total: u128 = 0;
        let mut sale_units: u64 = 0;
        let mut bid_total: u128 = 0;

        for (_, (outpost, market)) in world.query::<(&Outpost, &Market)>().iter() {
            report.outpost_count += 1;

            if let Some(wallet) = ids.get(outpost.wallet) {
                if let Ok(w) = world.get::<&Wallet>(wallet) {
                    report.outpost_bits += w.bits();
                }
            }
            if let Some(wallet) = ids.get(outpost.market_wallet) {
                if let Ok(w) = world.get::<&Wallet>(wallet) {
                    report.escrow_bits += w.bits();
                }
            }
            if let Some(storage) = ids.get(outpost.storage) {
                report.outpost_stock_value += transfer::cargo_value(world, storage, market);
            }
            if let Some(storage) = ids.get(outpost.market_storage) {
                report.escrow_cargo_value += transfer::cargo_value(world, storage, market);
            }

            report.open_listings += market.open_listings.len();
            report.pending_bids += market.bids.len();
            for trade in &market.trade_log {
                sale_total += trade.unit_price as u128 * trade.quantity as u128;
                sale_units += trade.quantity as u64;
            }
            for bid in &market.bids {
                bid_total += bid.unit_price as u128;
            }
        }

        for (_, ship) in world.query::<&Ship>().iter() {
            report.ship_count += 1;
            if let Some(wallet) = ids.get(ship.wallet) {
                if let Ok(w) = world.get::<&Wallet>(wallet) {
                    report.ship_bits += w.bits();
                }
            }
            // value the hold at the ship's current port
            let market_entity = ids.get(ship.outpost);
            let cargo_entity = ids.get(ship.cargo);
            if let (Some(outpost), Some(cargo)) = (market_entity, cargo_entity) {
                if let Ok(market) = world.get::<&Market>(outpost) {
                    report.ship_cargo_value += transfer::cargo_value(world, cargo, &market);
                }
            }
        }

        if sale_units > 0 {
            report.average_sale_price = (sale_total / sale_units as u128) as u64;
        }
        if report.pending_bids > 0 {
            report.average_bid = (bid_total / report.pending_bids as u128) as u64;
        }
        report
    }

    /// Every bit in the economy, wherever it sits.
    pub fn total_bits(&self) -> u64 {
        self.ship_bits + self.outpost_bits + self.escrow_bits
    }

    pub fn average_ship_bits(&self) -> u64 {
        if self.ship_count == 0 {
            0
        } else {
            self.ship_bits / self.ship_count as u64
        }
    }

    pub fn average_outpost_bits(&self) -> u64 {
        if self.outpost_count == 0 {
            0
        } else {
            self.outpost_bits / self.outpost_count as u64
        }
    }
}

impl fmt::Display for WealthReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ships: {} ({} bits, cargo worth {})",
            self.ship_count, self.ship_bits, self.ship_cargo_value
        )?;
        writeln!(
            f,
            "outposts: {} ({} bits, stock worth {})",
            self.outpost_count, self.outpost_bits, self.outpost_stock_value
        )?;
        writeln!(
            f,
            "escrow: {} bits, goods worth {}",
            self.escrow_bits, self.escrow_cargo_value
        )?;
        write!(
            f,
            "market: {} open listings, {} pending bids, avg sale {}, avg bid {}",
            self.open_listings, self.pending_bids, self.average_sale_price, self.average_bid
        )
    }
}
