//! Outpost-side economy: the weekly news/production cycle and the
//! morning listing pass.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::Rng;

use starbazaar_logic::headline;

use crate::catalog::Catalog;
use crate::components::{Market, Outpost, Storage};
use crate::ids::IdIndex;
use crate::systems::market;

/// Weekly refresh for one outpost: roll a fresh headline, let its
/// sentiment push the production rate, drift popularity upward for a
/// few random categories, and manufacture this week's output.
pub fn weekly_update(
    world: &mut World,
    ids: &IdIndex,
    catalog: &Catalog,
    rng: &mut StdRng,
    outpost: Entity,
) {
    let (name, size, main_export, old_headline, old_rate, storage_id) =
        match world.get::<&Outpost>(outpost) {
            Ok(o) => (
                o.name.clone(),
                o.size,
                o.main_export.clone(),
                o.headline.clone(),
                o.production_rate,
                o.storage,
            ),
            Err(_) => return,
        };

    // a repeated headline is stale news; retry a few times, then accept
    let mut new_headline = catalog.pick_headline(rng).to_string();
    for _ in 0..8 {
        if new_headline != old_headline {
            break;
        }
        new_headline = catalog.pick_headline(rng).to_string();
    }
    let sentiment = headline::sentiment(&new_headline);
    let new_rate = headline::adjust_production_rate(old_rate, sentiment, size.value());

    if let Ok(mut o) = world.get::<&mut Outpost>(outpost) {
        o.headline = new_headline.clone();
        o.production_rate = new_rate;
    }

    let points = rng.gen_range(0..=size.value());
    if let Ok(mut mkt) = world.get::<&mut Market>(outpost) {
        for _ in 0..points {
            let category = catalog.pick_item_type(rng).to_string();
            mkt.bump_popularity(&category, 1);
        }
    }

    if new_rate > 0 {
        if let Some(item) = catalog.generate_item(rng, &main_export) {
            if let Some(entity) = ids.get(storage_id) {
                if let Ok(mut storage) = world.get::<&mut Storage>(entity) {
                    storage.add(&item, new_rate);
                }
            }
        }
    }

    log::debug!(
        "{}: headline {:?} ({:?}), production {} -> {}",
        name,
        headline::text(&new_headline),
        sentiment,
        old_rate,
        new_rate
    );
}

/// Morning listing pass: everything sitting in production storage goes
/// up for auction at 90% of suggested value.
pub fn post_listings(world: &mut World, ids: &IdIndex, outpost: Entity) {
    let (storage_id, wallet_id) = match world.get::<&Outpost>(outpost) {
        Ok(o) => (o.storage, o.wallet),
        Err(_) => return,
    };
    let Some(storage) = ids.get(storage_id) else {
        return;
    };

    let items: Vec<String> = match world.get::<&Storage>(storage) {
        Ok(s) => s.items().keys().cloned().collect(),
        Err(_) => return,
    };

    for item in items {
        let suggested = market::suggested_value(world, outpost, &item);
        let price = (suggested * 9 / 10).max(1);
        market::create_listing(world, ids, outpost, &item, 0, storage, price, wallet_id);
    }
}
