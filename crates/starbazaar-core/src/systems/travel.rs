//! Ship movement between outposts.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::components::{Outpost, Planet, Ship, StarSystem, Storage, Wallet};
use crate::ids::IdIndex;

/// Pick a destination outpost: random star system, random planet,
/// then an outpost weighted by size so larger markets see more
/// traffic. Returns `None` in an empty galaxy.
pub fn pick_outpost(world: &World, ids: &IdIndex, rng: &mut StdRng) -> Option<u32> {
    let systems: Vec<u32> = world
        .query::<&StarSystem>()
        .iter()
        .map(|(_, s)| s.id)
        .collect();
    let system_id = *systems.choose(rng)?;
    let system_entity = ids.get(system_id)?;

    let planet_id = {
        let system = world.get::<&StarSystem>(system_entity).ok()?;
        *system.planets.choose(rng)?
    };
    let planet_entity = ids.get(planet_id)?;
    let outpost_ids: Vec<u32> = world.get::<&Planet>(planet_entity).ok()?.outposts.clone();

    let mut weighted: Vec<(u32, u32)> = Vec::new();
    for outpost_id in outpost_ids {
        if let Some(entity) = ids.get(outpost_id) {
            if let Ok(outpost) = world.get::<&Outpost>(entity) {
                weighted.push((outpost_id, outpost.size.value()));
            }
        }
    }
    if weighted.is_empty() {
        return None;
    }

    let total: u32 = weighted.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (outpost_id, weight) in weighted {
        if roll < weight {
            return Some(outpost_id);
        }
        roll -= weight;
    }
    None
}

/// Move a ship to `destination` (or a random outpost when `None`).
/// The ship's cargo and wallet follow it so location checks still
/// hold. Returns the destination id, or `None` if nothing moved.
pub fn warp_ship(
    world: &mut World,
    ids: &IdIndex,
    rng: &mut StdRng,
    ship: Entity,
    destination: Option<u32>,
) -> Option<u32> {
    let target = match destination {
        Some(id) => {
            ids.get(id)?;
            id
        }
        None => pick_outpost(world, ids, rng)?,
    };

    let (cargo_id, wallet_id) = {
        let mut ship = world.get::<&mut Ship>(ship).ok()?;
        ship.outpost = target;
        (ship.cargo, ship.wallet)
    };
    if let Some(entity) = ids.get(cargo_id) {
        if let Ok(mut storage) = world.get::<&mut Storage>(entity) {
            storage.location = Some(target);
        }
    }
    if let Some(entity) = ids.get(wallet_id) {
        if let Ok(mut wallet) = world.get::<&mut Wallet>(entity) {
            wallet.location = Some(target);
        }
    }
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{OutpostSize, ShipClass};
    use rand::SeedableRng;

    fn spawn_world() -> (World, IdIndex, Entity, u32, u32) {
        let mut world = World::new();
        let mut ids = IdIndex::new();

        let system_id = ids.alloc();
        let planet_id = ids.alloc();
        let outpost_a = ids.alloc();
        let outpost_b = ids.alloc();

        for (outpost_id, name, size) in [
            (outpost_a, "Haven Port", OutpostSize::Small),
            (outpost_b, "Granite Spire", OutpostSize::Large),
        ] {
            let entity = world.spawn((Outpost {
                id: outpost_id,
                name: name.into(),
                planet: planet_id,
                size,
                main_export: "Ore".into(),
                production_rate: 1,
                headline: String::new(),
                storage: 0,
                market_storage: 0,
                wallet: 0,
                market_wallet: 0,
                warehouses: Vec::new(),
            },));
            ids.bind(outpost_id, entity);
        }
        let planet = world.spawn((Planet {
            id: planet_id,
            name: "Kestrel".into(),
            star_system: system_id,
            outposts: vec![outpost_a, outpost_b],
        },));
        ids.bind(planet_id, planet);
        let system = world.spawn((StarSystem {
            id: system_id,
            name: "Vega Drift".into(),
            planets: vec![planet_id],
        },));
        ids.bind(system_id, system);

        let cargo_id = ids.alloc();
        let wallet_id = ids.alloc();
        let cargo = world.spawn((Storage::new(cargo_id, Some(outpost_a), Some(50)),));
        ids.bind(cargo_id, cargo);
        let wallet = world.spawn((Wallet::new(wallet_id, Some(outpost_a)),));
        ids.bind(wallet_id, wallet);
        let ship_id = ids.alloc();
        let ship = world.spawn((Ship {
            id: ship_id,
            name: "Venture".into(),
            class: ShipClass::Light,
            human: false,
            outpost: outpost_a,
            cargo: cargo_id,
            wallet: wallet_id,
        },));
        ids.bind(ship_id, ship);

        (world, ids, ship, outpost_a, outpost_b)
    }

    #[test]
    fn test_warp_moves_ship_cargo_and_wallet() {
        let (mut world, ids, ship, _, outpost_b) = spawn_world();
        let mut rng = StdRng::seed_from_u64(7);

        let dest = warp_ship(&mut world, &ids, &mut rng, ship, Some(outpost_b));
        assert_eq!(dest, Some(outpost_b));

        let (cargo_id, wallet_id) = {
            let s = world.get::<&Ship>(ship).unwrap();
            assert_eq!(s.outpost, outpost_b);
            (s.cargo, s.wallet)
        };
        let cargo = ids.get(cargo_id).unwrap();
        assert_eq!(
            world.get::<&Storage>(cargo).unwrap().location,
            Some(outpost_b)
        );
        let wallet = ids.get(wallet_id).unwrap();
        assert_eq!(
            world.get::<&Wallet>(wallet).unwrap().location,
            Some(outpost_b)
        );
    }

    #[test]
    fn test_warp_to_unknown_outpost_is_noop() {
        let (mut world, ids, ship, outpost_a, _) = spawn_world();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(warp_ship(&mut world, &ids, &mut rng, ship, Some(9999)), None);
        assert_eq!(world.get::<&Ship>(ship).unwrap().outpost, outpost_a);
    }

    #[test]
    fn test_pick_outpost_weighted_by_size() {
        let (world, ids, _, outpost_a, outpost_b) = spawn_world();
        let mut rng = StdRng::seed_from_u64(11);
        let mut counts = [0u32; 2];
        for _ in 0..400 {
            match pick_outpost(&world, &ids, &mut rng) {
                Some(id) if id == outpost_a => counts[0] += 1,
                Some(id) if id == outpost_b => counts[1] += 1,
                _ => panic!("empty galaxy"),
            }
        }
        // Large (weight 3) should clearly dominate Small (weight 1)
        assert!(counts[1] > counts[0]);
    }
}
