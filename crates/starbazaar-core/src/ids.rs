//! Stable entity ids and the id → entity index.
//!
//! Components never hold `hecs::Entity` references to one another:
//! relations are stable `u32` ids allocated at spawn time, which survive
//! serialization. The engine resolves ids through this index, and
//! rebuilds it from component data after a load.

use hecs::{Entity, World};
use std::collections::HashMap;

use crate::components::{Outpost, Planet, Ship, StarSystem, Storage, Wallet};

/// Allocator and lookup table for stable ids.
#[derive(Debug, Default)]
pub struct IdIndex {
    next: u32,
    map: HashMap<u32, Entity>,
}

impl IdIndex {
    pub fn new() -> Self {
        // id 0 is reserved as "no entity"
        Self { next: 1, map: HashMap::new() }
    }

    /// Allocate a fresh id. The caller binds it once the entity exists.
    pub fn alloc(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    pub fn bind(&mut self, id: u32, entity: Entity) {
        self.map.insert(id, entity);
    }

    pub fn unbind(&mut self, id: u32) {
        self.map.remove(&id);
    }

    pub fn get(&self, id: u32) -> Option<Entity> {
        self.map.get(&id).copied()
    }

    /// Rebuild the index by scanning every id-bearing component in the
    /// world. Used after deserializing a snapshot, where entity handles
    /// are fresh but component ids are authoritative.
    pub fn rebuild(world: &World) -> Self {
        let mut index = Self::new();
        let mut bind = |id: u32, entity: Entity| {
            index.map.insert(id, entity);
            if id >= index.next {
                index.next = id + 1;
            }
        };

        for (entity, system) in world.query::<&StarSystem>().iter() {
            bind(system.id, entity);
        }
        for (entity, planet) in world.query::<&Planet>().iter() {
            bind(planet.id, entity);
        }
        for (entity, outpost) in world.query::<&Outpost>().iter() {
            bind(outpost.id, entity);
        }
        for (entity, ship) in world.query::<&Ship>().iter() {
            bind(ship.id, entity);
        }
        for (entity, storage) in world.query::<&Storage>().iter() {
            bind(storage.id, entity);
        }
        for (entity, wallet) in world.query::<&Wallet>().iter() {
            bind(wallet.id, entity);
        }

        index
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
