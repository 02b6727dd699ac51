//! Save/Load functionality for persisting simulation state
//!
//! Uses bincode for a binary snapshot of the whole world. Components
//! are serialized individually and respawned on load; the id index is
//! rebuilt from the stable ids carried inside the components, so
//! `hecs::Entity` values never hit the disk.

use hecs::World;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::components::{
    Mailbox, Market, Outpost, Planet, Ship, StarSystem, Storage, Wallet,
};

/// Version number for save file format (increment when format changes)
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of the simulation state
#[derive(Serialize, Deserialize)]
pub struct SaveData {
    /// Save format version
    pub version: u32,
    /// Simulated hours elapsed
    pub total_hours: u64,
    /// Hours advanced per tick
    pub hours_per_tick: u64,
    /// All entities with their components
    pub entities: Vec<SerializableEntity>,
}

/// All possible components for an entity, serialized as optionals
#[derive(Serialize, Deserialize, Default)]
pub struct SerializableEntity {
    pub star_system: Option<StarSystem>,
    pub planet: Option<Planet>,
    pub outpost: Option<Outpost>,
    pub market: Option<Market>,
    pub ship: Option<Ship>,
    pub storage: Option<Storage>,
    pub wallet: Option<Wallet>,
    pub mailbox: Option<Mailbox>,
}

/// Extract all entities from a world into serializable form
fn serialize_entities(world: &World) -> Vec<SerializableEntity> {
    let mut entities = Vec::new();

    for entity in world.iter() {
        let mut se = SerializableEntity::default();

        if let Some(c) = entity.get::<&StarSystem>() {
            se.star_system = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Planet>() {
            se.planet = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Outpost>() {
            se.outpost = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Market>() {
            se.market = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Ship>() {
            se.ship = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Storage>() {
            se.storage = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Wallet>() {
            se.wallet = Some((*c).clone());
        }
        if let Some(c) = entity.get::<&Mailbox>() {
            se.mailbox = Some((*c).clone());
        }

        entities.push(se);
    }

    entities
}

/// Rebuild a world from serialized entities
fn deserialize_entities(world: &mut World, entities: Vec<SerializableEntity>) {
    for se in entities {
        spawn_entity(world, se);
    }
}

/// Spawn an entity with all its components
fn spawn_entity(world: &mut World, se: SerializableEntity) {
    let entity = world.spawn(());

    if let Some(c) = se.star_system {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.planet {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.outpost {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.market {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.ship {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.storage {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.wallet {
        let _ = world.insert_one(entity, c);
    }
    if let Some(c) = se.mailbox {
        let _ = world.insert_one(entity, c);
    }
}

/// Save the complete simulation to a writer
pub fn save_simulation<W: Write>(
    writer: W,
    world: &World,
    total_hours: u64,
    hours_per_tick: u64,
) -> Result<(), SaveError> {
    let save_data = SaveData {
        version: SAVE_VERSION,
        total_hours,
        hours_per_tick,
        entities: serialize_entities(world),
    };

    bincode::serialize_into(writer, &save_data)?;
    Ok(())
}

/// Load a simulation from a reader
pub fn load_simulation<R: Read>(reader: R) -> Result<LoadedSimulation, SaveError> {
    let save_data: SaveData = bincode::deserialize_from(reader)?;

    if save_data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: save_data.version,
        });
    }

    let mut world = World::new();
    deserialize_entities(&mut world, save_data.entities);

    Ok(LoadedSimulation {
        world,
        total_hours: save_data.total_hours,
        hours_per_tick: save_data.hours_per_tick,
    })
}

/// Result of loading a simulation
pub struct LoadedSimulation {
    pub world: World,
    pub total_hours: u64,
    pub hours_per_tick: u64,
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SaveError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for SaveError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        SaveError::Bincode(e)
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Bincode(e) => write!(f, "Serialization error: {}", e),
            SaveError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Save version mismatch: expected {}, found {}",
                    expected, found
                )
            }
        }
    }
}

impl std::error::Error for SaveError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineConfig, SimulationEngine};
    use crate::generation::GalaxyConfig;
    use crate::report::WealthReport;

    #[test]
    fn test_save_load_roundtrip() {
        let mut engine = SimulationEngine::new(EngineConfig {
            seed: 42,
            ..EngineConfig::default()
        });
        engine.generate(GalaxyConfig::default());

        // run a couple of simulated days
        for _ in 0..8 {
            engine.tick();
        }

        let original_hours = engine.total_hours();
        let original_report = WealthReport::collect(engine.world(), engine.ids());

        let mut save_buffer = Vec::new();
        engine.save(&mut save_buffer).expect("Save failed");

        let mut loaded = SimulationEngine::new(EngineConfig::default());
        loaded.load(&save_buffer[..]).expect("Load failed");

        assert_eq!(loaded.total_hours(), original_hours);
        let loaded_report = WealthReport::collect(loaded.world(), loaded.ids());
        assert_eq!(loaded_report, original_report);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let save_data = SaveData {
            version: SAVE_VERSION + 1,
            total_hours: 0,
            hours_per_tick: 6,
            entities: Vec::new(),
        };
        let bytes = bincode::serialize(&save_data).unwrap();
        assert!(matches!(
            load_simulation(&bytes[..]),
            Err(SaveError::VersionMismatch { .. })
        ));
    }
}
