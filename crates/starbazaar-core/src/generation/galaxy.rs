//! Spawners for the galaxy graph. Each spawner allocates stable ids,
//! binds them in the [`IdIndex`], and returns the new entity's id.

use hecs::World;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::Catalog;
use crate::components::{
    Mailbox, Market, Outpost, OutpostSize, Planet, Ship, ShipClass, StarSystem, Storage, Wallet,
    SEED_BITS, WAREHOUSE_SPACE,
};
use crate::generation::names::NamePool;
use crate::ids::IdIndex;

/// How much galaxy to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalaxyConfig {
    pub star_systems: u32,
    pub planets_per_system: (u32, u32),
    pub outposts_per_planet: (u32, u32),
    pub ai_ships: u32,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            star_systems: 2,
            planets_per_system: (1, 3),
            outposts_per_planet: (1, 3),
            ai_ships: 6,
        }
    }
}

fn range_pick(rng: &mut StdRng, (lo, hi): (u32, u32)) -> u32 {
    if lo >= hi {
        lo
    } else {
        rng.gen_range(lo..=hi)
    }
}

/// Spawn a star system and its planets.
pub fn spawn_star_system(
    world: &mut World,
    ids: &mut IdIndex,
    catalog: &Catalog,
    rng: &mut StdRng,
    names: &mut NamePool,
    config: &GalaxyConfig,
) -> u32 {
    let system_id = ids.alloc();
    let name = names.draw(catalog, rng, &catalog.location_names, "Location");

    let planet_count = range_pick(rng, config.planets_per_system);
    let mut planets = Vec::with_capacity(planet_count as usize);
    for _ in 0..planet_count {
        planets.push(spawn_planet(
            world, ids, catalog, rng, names, config, system_id,
        ));
    }

    let entity = world.spawn((StarSystem {
        id: system_id,
        name,
        planets,
    },));
    ids.bind(system_id, entity);
    system_id
}

/// Spawn a planet and its outposts under an existing star system id.
pub fn spawn_planet(
    world: &mut World,
    ids: &mut IdIndex,
    catalog: &Catalog,
    rng: &mut StdRng,
    names: &mut NamePool,
    config: &GalaxyConfig,
    star_system: u32,
) -> u32 {
    let planet_id = ids.alloc();
    let name = names.draw(catalog, rng, &catalog.location_names, "Location");

    let outpost_count = range_pick(rng, config.outposts_per_planet);
    let mut outposts = Vec::with_capacity(outpost_count as usize);
    for _ in 0..outpost_count {
        outposts.push(spawn_outpost(world, ids, catalog, rng, names, planet_id));
    }

    let entity = world.spawn((Planet {
        id: planet_id,
        name,
        star_system,
        outposts,
    },));
    ids.bind(planet_id, entity);
    planet_id
}

/// Spawn a complete outpost: production and escrow storages, trading
/// and escrow wallets, warehouses with their deed items, and a market
/// with the popularity index zeroed for every known category.
pub fn spawn_outpost(
    world: &mut World,
    ids: &mut IdIndex,
    catalog: &Catalog,
    rng: &mut StdRng,
    names: &mut NamePool,
    planet: u32,
) -> u32 {
    let outpost_id = ids.alloc();
    let name = names.draw(catalog, rng, &catalog.location_names, "Location");
    let size = *OutpostSize::ALL.choose(rng).unwrap_or(&OutpostSize::Small);
    let main_export = catalog.pick_item_type(rng).to_string();

    let storage_id = ids.alloc();
    let market_storage_id = ids.alloc();
    let wallet_id = ids.alloc();
    let market_wallet_id = ids.alloc();

    let mut storage = Storage::new(storage_id, Some(outpost_id), None);

    // one warehouse per point of size, each with a deed item the
    // outpost can sell
    let mut warehouses = Vec::new();
    for i in 0..size.value() {
        let warehouse_id = ids.alloc();
        let warehouse = world.spawn((Storage::new(
            warehouse_id,
            Some(outpost_id),
            Some(WAREHOUSE_SPACE),
        ),));
        ids.bind(warehouse_id, warehouse);
        warehouses.push(warehouse_id);
        storage.add(&format!("Other.{} Warehouse {}", name, i + 1), 1);
    }

    let storage_entity = world.spawn((storage,));
    ids.bind(storage_id, storage_entity);
    let escrow = world.spawn((Storage::new(market_storage_id, Some(outpost_id), None),));
    ids.bind(market_storage_id, escrow);

    let mut wallet = Wallet::new(wallet_id, Some(outpost_id));
    wallet.add_bits(SEED_BITS);
    let wallet_entity = world.spawn((wallet,));
    ids.bind(wallet_id, wallet_entity);
    let market_wallet = world.spawn((Wallet::new(market_wallet_id, Some(outpost_id)),));
    ids.bind(market_wallet_id, market_wallet);

    let mut market = Market::new();
    for category in &catalog.item_types {
        market.bump_popularity(category, 0);
    }

    let entity = world.spawn((
        Outpost {
            id: outpost_id,
            name,
            planet,
            size,
            main_export,
            production_rate: size.value(),
            headline: catalog.pick_headline(rng).to_string(),
            storage: storage_id,
            market_storage: market_storage_id,
            wallet: wallet_id,
            market_wallet: market_wallet_id,
            warehouses,
        },
        market,
    ));
    ids.bind(outpost_id, entity);
    outpost_id
}

/// Spawn a ship docked at `outpost`. Human ships get a mailbox for
/// command replies; AI ships run their own tick handler instead.
pub fn spawn_ship(
    world: &mut World,
    ids: &mut IdIndex,
    catalog: &Catalog,
    rng: &mut StdRng,
    names: &mut NamePool,
    outpost: u32,
    class: ShipClass,
    human: bool,
) -> u32 {
    let ship_id = ids.alloc();
    let name = names.draw(catalog, rng, &catalog.ship_names, "Ship");

    let cargo_id = ids.alloc();
    let wallet_id = ids.alloc();
    let cargo = world.spawn((Storage::new(
        cargo_id,
        Some(outpost),
        Some(class.cargo_capacity()),
    ),));
    ids.bind(cargo_id, cargo);
    let mut wallet = Wallet::new(wallet_id, Some(outpost));
    wallet.add_bits(SEED_BITS);
    let wallet_entity = world.spawn((wallet,));
    ids.bind(wallet_id, wallet_entity);

    let ship = Ship {
        id: ship_id,
        name,
        class,
        human,
        outpost,
        cargo: cargo_id,
        wallet: wallet_id,
    };
    let entity = if human {
        world.spawn((ship, Mailbox::default()))
    } else {
        world.spawn((ship,))
    };
    ids.bind(ship_id, entity);
    ship_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_spawned_outpost_is_complete() {
        let mut world = World::new();
        let mut ids = IdIndex::new();
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(21);
        let mut names = NamePool::new();

        let outpost_id = spawn_outpost(&mut world, &mut ids, &catalog, &mut rng, &mut names, 1);
        let entity = ids.get(outpost_id).unwrap();
        let outpost = world.get::<&Outpost>(entity).unwrap();

        assert!(catalog.item_types.contains(&outpost.main_export));
        assert_eq!(outpost.production_rate, outpost.size.value());
        assert_eq!(outpost.warehouses.len(), outpost.size.value() as usize);
        for warehouse_id in &outpost.warehouses {
            let warehouse = ids.get(*warehouse_id).unwrap();
            assert_eq!(
                world.get::<&Storage>(warehouse).unwrap().free_space(),
                WAREHOUSE_SPACE
            );
        }

        // deed items sit in production storage, one per warehouse
        let storage = ids.get(outpost.storage).unwrap();
        let storage = world.get::<&Storage>(storage).unwrap();
        assert_eq!(storage.total(), outpost.size.value());
        assert!(storage
            .items()
            .keys()
            .all(|k| starbazaar_logic::item::is_warehouse_deed(k)));

        let wallet = ids.get(outpost.wallet).unwrap();
        assert_eq!(world.get::<&Wallet>(wallet).unwrap().bits(), SEED_BITS);
    }

    #[test]
    fn test_spawned_system_links_children() {
        let mut world = World::new();
        let mut ids = IdIndex::new();
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(22);
        let mut names = NamePool::new();
        let config = GalaxyConfig::default();

        let system_id = spawn_star_system(
            &mut world, &mut ids, &catalog, &mut rng, &mut names, &config,
        );
        let system = ids.get(system_id).unwrap();
        let planets = world.get::<&StarSystem>(system).unwrap().planets.clone();
        assert!(!planets.is_empty() || config.planets_per_system.0 == 0);

        for planet_id in planets {
            let planet = ids.get(planet_id).unwrap();
            let planet = world.get::<&Planet>(planet).unwrap();
            assert_eq!(planet.star_system, system_id);
            for outpost_id in &planet.outposts {
                let outpost = ids.get(*outpost_id).unwrap();
                assert_eq!(world.get::<&Outpost>(outpost).unwrap().planet, planet_id);
            }
        }
    }

    #[test]
    fn test_human_ship_gets_mailbox() {
        let mut world = World::new();
        let mut ids = IdIndex::new();
        let catalog = Catalog::builtin();
        let mut rng = StdRng::seed_from_u64(23);
        let mut names = NamePool::new();

        let human = spawn_ship(
            &mut world, &mut ids, &catalog, &mut rng, &mut names, 1, ShipClass::Medium, true,
        );
        let ai = spawn_ship(
            &mut world, &mut ids, &catalog, &mut rng, &mut names, 1, ShipClass::Light, false,
        );

        assert!(world.get::<&Mailbox>(ids.get(human).unwrap()).is_ok());
        assert!(world.get::<&Mailbox>(ids.get(ai).unwrap()).is_err());
        let cargo = world.get::<&Ship>(ids.get(human).unwrap()).unwrap().cargo;
        assert_eq!(
            world
                .get::<&Storage>(ids.get(cargo).unwrap())
                .unwrap()
                .free_space(),
            ShipClass::Medium.cargo_capacity()
        );
    }
}
