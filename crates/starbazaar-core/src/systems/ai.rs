//! Evening outpost bidding and the AI trader ships.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::Rng;

use starbazaar_logic::{item, popularity};

use crate::components::{Bid, Market, Outpost, Ship, Storage};
use crate::ids::IdIndex;
use crate::systems::{market, travel};

/// Evening pass: the outpost bids on every open listing it does not
/// own, pricing by local demand. Quantity scales with the category's
/// popularity score, destination is the outpost's own stock.
pub fn outpost_bids(world: &mut World, outpost: Entity) {
    let (wallet_id, storage_id) = match world.get::<&Outpost>(outpost) {
        Ok(o) => (o.wallet, o.storage),
        Err(_) => return,
    };

    let Ok(mut mkt) = world.get::<&mut Market>(outpost) else {
        return;
    };
    let Market {
        pricing,
        popularity: scores,
        open_listings,
        bids,
        ..
    } = &mut *mkt;

    for listing in open_listings.iter() {
        if listing.owner_wallet == wallet_id {
            continue;
        }
        let category = item::category(&listing.item);
        let score = scores.get(category).copied().unwrap_or(0);
        let suggested = pricing.suggested_value(&listing.item);
        let unit_price = (popularity::bid_multiplier(score) * suggested as f64) as u64;
        let quantity = score.max(1) as u32;
        bids.push(Bid {
            item: listing.item.clone(),
            quantity,
            unit_price: unit_price.max(1),
            wallet: wallet_id,
            storage: storage_id,
        });
    }
}

/// AI trader tick. In the morning a ship with no skin in the local
/// market either moves on (1 in 10) or lists its cargo at a price near
/// suggested value; at midday it bids on whatever is open, as long as
/// there is hold space left.
pub fn ship_update(world: &mut World, ids: &IdIndex, rng: &mut StdRng, ship: Entity, hour: u64) {
    let (human, outpost_id, cargo_id, wallet_id) = match world.get::<&Ship>(ship) {
        Ok(s) => (s.human, s.outpost, s.cargo, s.wallet),
        Err(_) => return,
    };
    if human {
        return;
    }
    let Some(outpost) = ids.get(outpost_id) else {
        // adrift; find a port
        travel::warp_ship(world, ids, rng, ship, None);
        return;
    };
    let Some(cargo) = ids.get(cargo_id) else {
        return;
    };

    if hour == 6 {
        let has_listings = world
            .get::<&Market>(outpost)
            .map(|m| m.has_listing_by(wallet_id))
            .unwrap_or(false);
        if !has_listings {
            if rng.gen_range(0..10) == 0 {
                travel::warp_ship(world, ids, rng, ship, None);
                return;
            }
            let held: Vec<(String, u32)> = world
                .get::<&Storage>(cargo)
                .map(|s| s.items().iter().map(|(k, v)| (k.clone(), *v)).collect())
                .unwrap_or_default();
            for (item_key, amount) in held {
                let suggested = market::suggested_value(world, outpost, &item_key);
                let price = ((rng.gen_range(0.8..=1.2) * suggested as f64) as u64).max(1);
                let lot = rng.gen_range(0..=amount);
                market::create_listing(
                    world, ids, outpost, &item_key, lot, cargo, price, wallet_id,
                );
            }
        }
    }

    if hour == 12 {
        let has_space = world
            .get::<&Storage>(cargo)
            .map(|s| s.free_space() > 0)
            .unwrap_or(false);
        if !has_space {
            return;
        }
        let listings = market::open_listings(world, outpost, None);
        for listing in listings {
            let unit_price =
                ((rng.gen_range(1.0..=1.2) * listing.starting_bid as f64) as u64).max(1);
            let quantity = rng.gen_range(1..5);
            market::place_bid(
                world,
                ids,
                outpost,
                Bid {
                    item: listing.item,
                    quantity,
                    unit_price,
                    wallet: wallet_id,
                    storage: cargo_id,
                },
            );
        }
    }
}
