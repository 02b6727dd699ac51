//! The outpost market engine: listing creation, bid placement, and the
//! daily clearing pass.
//!
//! Clearing runs once per simulated day per outpost. Promotion happens
//! first (this cycle's new listings open for business), then each item
//! with escrowed supply is auctioned: bids are shuffled for fair
//! tie-breaks, stable-sorted by unit price, and filled until supply
//! runs out; sellers are then paid from the market wallet in shuffled
//! order. Every mutation either completes or rolls back; goods and
//! bits are conserved across the pass.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use starbazaar_logic::{auction, item};

use crate::components::{Bid, Listing, Market, Outpost, Storage, Trade, Wallet};
use crate::ids::IdIndex;
use crate::systems::transfer;

/// Post `amount` units (`0` = all available) of `item` from
/// `source` for auction at `outpost`. Units move into market escrow
/// immediately; a `starting_bid` of 0 substitutes the suggested value.
/// Returns one listing per unit actually escrowed, empty when nothing
/// moved.
pub fn create_listing(
    world: &mut World,
    ids: &IdIndex,
    outpost: Entity,
    item: &str,
    amount: u32,
    source: Entity,
    starting_bid: u64,
    owner_wallet: u32,
) -> Vec<Listing> {
    let market_storage = match world.get::<&Outpost>(outpost) {
        Ok(o) => o.market_storage,
        Err(_) => return Vec::new(),
    };
    let Some(escrow) = ids.get(market_storage) else {
        return Vec::new();
    };

    let moved = transfer::transfer_cargo(world, source, escrow, item, amount);
    if moved == 0 {
        return Vec::new();
    }

    let source_id = world
        .get::<&Storage>(source)
        .map(|s| s.id)
        .unwrap_or(0);

    let mut market = match world.get::<&mut Market>(outpost) {
        Ok(m) => m,
        Err(_) => return Vec::new(),
    };
    let price = if starting_bid == 0 {
        market.pricing.suggested_value(item)
    } else {
        starting_bid
    };

    let listings: Vec<Listing> = (0..moved)
        .map(|_| Listing {
            item: item.to_string(),
            owner_wallet,
            source_storage: source_id,
            starting_bid: price,
        })
        .collect();
    market.new_listings.extend(listings.iter().cloned());

    listings
}

/// Queue a bid for the next clearing pass at `outpost`. Rejects bids
/// with zero quantity or price, or dangling wallet/storage references.
pub fn place_bid(world: &mut World, ids: &IdIndex, outpost: Entity, bid: Bid) -> bool {
    if bid.quantity == 0 || bid.unit_price == 0 {
        return false;
    }
    if ids.get(bid.wallet).is_none() || ids.get(bid.storage).is_none() {
        return false;
    }
    match world.get::<&mut Market>(outpost) {
        Ok(mut market) => {
            market.bids.push(bid);
            true
        }
        Err(_) => false,
    }
}

/// Suggested value of an item at an outpost, seeding the ledger entry
/// on first ask.
pub fn suggested_value(world: &mut World, outpost: Entity, item: &str) -> u64 {
    match world.get::<&mut Market>(outpost) {
        Ok(mut market) => market.pricing.suggested_value(item),
        Err(_) => starbazaar_logic::pricing::STARTING_PRICE,
    }
}

/// Snapshot of the open listings at an outpost, optionally filtered to
/// one item.
pub fn open_listings(world: &World, outpost: Entity, filter: Option<&str>) -> Vec<Listing> {
    match world.get::<&Market>(outpost) {
        Ok(market) => market
            .open_listings
            .iter()
            .filter(|l| filter.map_or(true, |item| l.item == item))
            .cloned()
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// The daily clearing pass for one outpost.
pub fn run_clearing(world: &mut World, ids: &IdIndex, outpost: Entity, rng: &mut StdRng) {
    let (outpost_name, production_id, market_storage_id, market_wallet_id) =
        match world.get::<&Outpost>(outpost) {
            Ok(o) => (o.name.clone(), o.storage, o.market_storage, o.market_wallet),
            Err(_) => return,
        };
    let Some(escrow_storage) = ids.get(market_storage_id) else {
        return;
    };
    let Some(market_wallet) = ids.get(market_wallet_id) else {
        return;
    };
    let production_storage = ids.get(production_id);

    // promote this cycle's listings and take the working sets; bids are
    // consumed by this pass whether or not they win
    let (mut open, bids) = match world.get::<&mut Market>(outpost) {
        Ok(mut market) => {
            let new: Vec<Listing> = market.new_listings.drain(..).collect();
            market.open_listings.extend(new);
            (
                std::mem::take(&mut market.open_listings),
                std::mem::take(&mut market.bids),
            )
        }
        Err(_) => return,
    };

    let supply_snapshot: Vec<(String, u32)> = world
        .get::<&Storage>(escrow_storage)
        .map(|s| s.items().iter().map(|(k, v)| (k.clone(), *v)).collect())
        .unwrap_or_default();

    // deferred market mutations, applied once the transfers are done
    let mut ledger_folds: Vec<(String, u64, u32)> = Vec::new();
    let mut popularity_deltas: Vec<(String, i32)> = Vec::new();
    let mut trades: Vec<Trade> = Vec::new();
    let mut units_sold: u32 = 0;

    for (item_key, supply) in supply_snapshot {
        let mut item_bids: Vec<&Bid> = bids.iter().filter(|b| b.item == item_key).collect();
        if item_bids.is_empty() {
            continue;
        }
        // shuffle so equal prices don't always favor the same bidder,
        // then stable-sort highest price first
        item_bids.shuffle(rng);
        item_bids.sort_by(|a, b| b.unit_price.cmp(&a.unit_price));

        let mut remaining = supply;
        let mut wins: Vec<u64> = Vec::new();

        for bid in item_bids {
            if remaining == 0 {
                break;
            }
            let (Some(destination), Some(bidder_wallet)) =
                (ids.get(bid.storage), ids.get(bid.wallet))
            else {
                continue;
            };
            let funds = world
                .get::<&Wallet>(bidder_wallet)
                .map(|w| w.bits())
                .unwrap_or(0);
            let want = auction::fillable(remaining, bid.quantity, funds, bid.unit_price);
            if want == 0 {
                continue;
            }

            // goods leg first; a full destination shrinks the fill
            let moved = transfer::transfer_cargo(world, escrow_storage, destination, &item_key, want);
            if moved == 0 {
                continue;
            }
            // currency leg; roll the goods back if it cannot complete
            let cost = bid.unit_price * moved as u64;
            if !transfer::transfer_bits(world, bidder_wallet, market_wallet, cost) {
                transfer::transfer_cargo(world, destination, escrow_storage, &item_key, moved);
                continue;
            }

            for _ in 0..moved {
                wins.push(bid.unit_price);
            }
            trades.push(Trade {
                item: item_key.clone(),
                unit_price: bid.unit_price,
                quantity: moved,
                buyer_wallet: bid.wallet,
            });
            ledger_folds.push((item_key.clone(), bid.unit_price, moved));
            remaining -= moved;
            units_sold += moved;

            // the outpost buying for its own stock means local demand
            // was satisfied locally: cool the category and consume the
            // covering stock (warehouse deeds are markers, not goods)
            if bid.storage == production_id {
                popularity_deltas.push((item::category(&item_key).to_string(), -(moved as i32)));
                if !item::is_warehouse_deed(&item_key) {
                    if let Some(production) = production_storage {
                        if let Ok(mut storage) = world.get::<&mut Storage>(production) {
                            storage.remove_up_to(&item_key, moved);
                        }
                    }
                }
            }
        }

        if wins.is_empty() {
            continue;
        }

        // pay sellers in shuffled order, one winning allocation each;
        // skip any the market wallet cannot cover; debits matched 1:1
        // so this should not happen, but never overdraw escrow
        let mut seller_indices: Vec<usize> = open
            .iter()
            .enumerate()
            .filter(|(_, l)| l.item == item_key)
            .map(|(i, _)| i)
            .collect();
        seller_indices.shuffle(rng);

        let mut paid: Vec<usize> = Vec::new();
        for index in seller_indices {
            let Some(price) = wins.first().copied() else {
                break;
            };
            let Some(owner) = ids.get(open[index].owner_wallet) else {
                continue;
            };
            if !transfer::transfer_bits(world, market_wallet, owner, price) {
                continue;
            }
            wins.remove(0);
            paid.push(index);
        }
        // drop paid listings, highest index first so positions hold
        paid.sort_unstable_by(|a, b| b.cmp(a));
        for index in paid {
            open.remove(index);
        }
    }

    // write back: survivors carry forward, trades fold into the ledger
    if let Ok(mut market) = world.get::<&mut Market>(outpost) {
        market.open_listings = open;
        for (item_key, price, units) in ledger_folds {
            for _ in 0..units {
                market.pricing.record_trade(&item_key, price);
            }
        }
        for (category, delta) in popularity_deltas {
            market.bump_popularity(&category, delta);
        }
        market.trade_log.extend(trades);
    }

    if units_sold > 0 {
        log::debug!("{}: cleared {} units", outpost_name, units_sold);
    }
}
