//! Simulation engine - main entry point for running the simulation

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use hecs::World;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::catalog::Catalog;
use crate::clock::{SimClock, DAYS_PER_WEEK, HOURS_PER_DAY};
use crate::commands::{Command, CommandError, CommandSender};
use crate::components::{Bid, Mailbox, Outpost, Ship, ShipClass, Storage, Wallet};
use crate::generation::{
    spawn_ship, spawn_star_system, GalaxyConfig, NamePool,
};
use crate::ids::IdIndex;
use crate::persistence::{self, SaveError};
use crate::systems::{ai, market, production, transfer, travel};

/// Engine construction parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed; the same seed and command sequence replays the same
    /// economy.
    pub seed: u64,
    /// Simulated hours per tick. Each tick runs every daily phase its
    /// hours cross, so any value is safe; larger values just batch more
    /// phases into one call.
    pub hours_per_tick: u64,
    /// Content catalog; `None` uses the embedded default. Operator
    /// catalogs are parsed (and rejected) up front via
    /// [`Catalog::from_json`].
    pub catalog: Option<Catalog>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            hours_per_tick: 6,
            catalog: None,
        }
    }
}

/// Main simulation engine
pub struct SimulationEngine {
    world: World,
    clock: SimClock,
    rng: StdRng,
    catalog: Catalog,
    ids: IdIndex,
    names: NamePool,
    command_tx: mpsc::Sender<Command>,
    command_rx: mpsc::Receiver<Command>,
}

impl SimulationEngine {
    /// Create a new empty simulation.
    pub fn new(config: EngineConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel();
        Self {
            world: World::new(),
            clock: SimClock::new(config.hours_per_tick),
            rng: StdRng::seed_from_u64(config.seed),
            catalog: config.catalog.unwrap_or_else(Catalog::builtin),
            ids: IdIndex::new(),
            names: NamePool::new(),
            command_tx,
            command_rx,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn ids(&self) -> &IdIndex {
        &self.ids
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn total_hours(&self) -> u64 {
        self.clock.total_hours()
    }

    pub fn hours_per_tick(&self) -> u64 {
        self.clock.hours_per_tick()
    }

    pub fn day(&self) -> u64 {
        self.clock.day()
    }

    /// Handle for submitting player commands from other threads.
    pub fn command_sender(&self) -> CommandSender {
        CommandSender::new(self.command_tx.clone())
    }

    /// Generate a galaxy and its AI trader fleet.
    pub fn generate(&mut self, config: GalaxyConfig) {
        for _ in 0..config.star_systems {
            spawn_star_system(
                &mut self.world,
                &mut self.ids,
                &self.catalog,
                &mut self.rng,
                &mut self.names,
                &config,
            );
        }

        for _ in 0..config.ai_ships {
            let Some(outpost) = travel::pick_outpost(&self.world, &self.ids, &mut self.rng)
            else {
                break;
            };
            let class = *ShipClass::ALL.choose(&mut self.rng).unwrap_or(&ShipClass::Light);
            spawn_ship(
                &mut self.world,
                &mut self.ids,
                &self.catalog,
                &mut self.rng,
                &mut self.names,
                outpost,
                class,
                false,
            );
        }

        log::info!(
            "generated galaxy: {} outposts, {} ships",
            self.world.query::<&Outpost>().iter().count(),
            self.world.query::<&Ship>().iter().count()
        );
    }

    /// Dock a human-controlled ship at a random outpost. The chosen
    /// name is made unique if a ship already carries it.
    pub fn spawn_player_ship(&mut self, name: &str, class: ShipClass) -> Option<u32> {
        let outpost = travel::pick_outpost(&self.world, &self.ids, &mut self.rng)?;
        let ship_id = spawn_ship(
            &mut self.world,
            &mut self.ids,
            &self.catalog,
            &mut self.rng,
            &mut self.names,
            outpost,
            class,
            true,
        );
        // prefer the requested name when it is still free
        if self.names.reserve(name) {
            if let Some(entity) = self.ids.get(ship_id) {
                if let Ok(mut ship) = self.world.get::<&mut Ship>(entity) {
                    ship.name = name.to_string();
                }
            }
        }
        Some(ship_id)
    }

    /// Remove a ship, repatriating its cargo into the current
    /// outpost's production storage and its bits into the outpost
    /// wallet. Goods and currency survive the owner's departure.
    pub fn despawn_ship(&mut self, ship_id: u32) -> bool {
        let Some(ship_entity) = self.ids.get(ship_id) else {
            return false;
        };
        let Ok((outpost_id, cargo_id, wallet_id)) = self
            .world
            .get::<&Ship>(ship_entity)
            .map(|s| (s.outpost, s.cargo, s.wallet))
        else {
            return false;
        };

        if let Some(outpost_entity) = self.ids.get(outpost_id) {
            if let Ok((storage_id, outpost_wallet_id)) = self
                .world
                .get::<&Outpost>(outpost_entity)
                .map(|o| (o.storage, o.wallet))
            {
                if let (Some(cargo), Some(storage)) =
                    (self.ids.get(cargo_id), self.ids.get(storage_id))
                {
                    transfer::transfer_all_cargo(&mut self.world, cargo, storage);
                }
                if let (Some(wallet), Some(outpost_wallet)) =
                    (self.ids.get(wallet_id), self.ids.get(outpost_wallet_id))
                {
                    transfer::transfer_bits(&mut self.world, wallet, outpost_wallet, 0);
                }
            }
        }

        for id in [cargo_id, wallet_id, ship_id] {
            if let Some(entity) = self.ids.get(id) {
                let _ = self.world.despawn(entity);
            }
            self.ids.unbind(id);
        }
        true
    }

    /// Drain a human ship's accumulated reply lines. Call between
    /// ticks only.
    pub fn drain_replies(&mut self, ship_id: u32) -> Vec<String> {
        self.ids
            .get(ship_id)
            .and_then(|entity| self.world.get::<&mut Mailbox>(entity).ok())
            .map(|mut mailbox| mailbox.drain())
            .unwrap_or_default()
    }

    /// One simulation step: drain the command queue, advance the
    /// clock, and run every daily phase the elapsed hours touched.
    pub fn tick(&mut self) {
        while let Ok(command) = self.command_rx.try_recv() {
            self.apply_command(command);
        }

        let start = self.clock.total_hours();
        self.clock.advance();
        let end = self.clock.total_hours();

        for absolute in (start + 1)..=end {
            match absolute % HOURS_PER_DAY {
                0 => self.run_clearing_phase(absolute),
                6 => self.run_posting_phase(),
                12 => self.run_ship_bid_phase(),
                18 => self.run_outpost_bid_phase(),
                _ => {}
            }
        }
    }

    /// Run forever at a fixed wall-clock period, until `stop` is set.
    /// The flag is checked only between ticks, so an in-flight tick
    /// always completes.
    pub fn run_realtime(&mut self, period: Duration, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            self.tick();
            std::thread::sleep(period);
        }
    }

    /// Outposts in ascending stable-id order, the iteration order for
    /// every phase.
    fn outposts(&self) -> Vec<hecs::Entity> {
        let mut ids: Vec<u32> = self
            .world
            .query::<&Outpost>()
            .iter()
            .map(|(_, o)| o.id)
            .collect();
        ids.sort_unstable();
        ids.iter().filter_map(|id| self.ids.get(*id)).collect()
    }

    fn ships(&self) -> Vec<hecs::Entity> {
        let mut ids: Vec<u32> = self
            .world
            .query::<&Ship>()
            .iter()
            .map(|(_, s)| s.id)
            .collect();
        ids.sort_unstable();
        ids.iter().filter_map(|id| self.ids.get(*id)).collect()
    }

    fn run_clearing_phase(&mut self, absolute_hour: u64) {
        let week_start = absolute_hour % (HOURS_PER_DAY * DAYS_PER_WEEK) == 0;
        for outpost in self.outposts() {
            market::run_clearing(&mut self.world, &self.ids, outpost, &mut self.rng);
            if week_start {
                production::weekly_update(
                    &mut self.world,
                    &self.ids,
                    &self.catalog,
                    &mut self.rng,
                    outpost,
                );
            }
        }
        log::debug!("cleared markets at hour {}", absolute_hour);
    }

    fn run_posting_phase(&mut self) {
        for outpost in self.outposts() {
            production::post_listings(&mut self.world, &self.ids, outpost);
        }
        for ship in self.ships() {
            ai::ship_update(&mut self.world, &self.ids, &mut self.rng, ship, 6);
        }
    }

    fn run_ship_bid_phase(&mut self) {
        for ship in self.ships() {
            ai::ship_update(&mut self.world, &self.ids, &mut self.rng, ship, 12);
        }
    }

    fn run_outpost_bid_phase(&mut self) {
        for outpost in self.outposts() {
            ai::outpost_bids(&mut self.world, outpost);
        }
    }

    fn apply_command(&mut self, command: Command) {
        let ship_id = command.ship();
        let Some(ship_entity) = self.ids.get(ship_id) else {
            log::warn!("command for unknown ship {}", ship_id);
            return;
        };
        let Ok((outpost_id, cargo_id, wallet_id)) = self
            .world
            .get::<&Ship>(ship_entity)
            .map(|s| (s.outpost, s.cargo, s.wallet))
        else {
            return;
        };

        let reply = self.execute(command, outpost_id, cargo_id, wallet_id);
        if let Ok(mut mailbox) = self.world.get::<&mut Mailbox>(ship_entity) {
            mailbox.push(reply);
        }
    }

    fn execute(
        &mut self,
        command: Command,
        outpost_id: u32,
        cargo_id: u32,
        wallet_id: u32,
    ) -> String {
        let outpost_entity = self.ids.get(outpost_id);
        match command {
            Command::CreateListing {
                item,
                amount,
                starting_bid,
                ..
            } => {
                let (Some(outpost), Some(cargo)) = (outpost_entity, self.ids.get(cargo_id))
                else {
                    return CommandError::NotFound.to_string();
                };
                let listings = market::create_listing(
                    &mut self.world,
                    &self.ids,
                    outpost,
                    &item,
                    amount,
                    cargo,
                    starting_bid,
                    wallet_id,
                );
                if listings.is_empty() {
                    CommandError::InsufficientCargo.to_string()
                } else {
                    format!("listed {} x {}", listings.len(), item)
                }
            }
            Command::PlaceBid {
                item,
                quantity,
                unit_price,
                ..
            } => {
                let Some(outpost) = outpost_entity else {
                    return CommandError::NotFound.to_string();
                };
                let accepted = market::place_bid(
                    &mut self.world,
                    &self.ids,
                    outpost,
                    Bid {
                        item: item.clone(),
                        quantity,
                        unit_price,
                        wallet: wallet_id,
                        storage: cargo_id,
                    },
                );
                if accepted {
                    format!("bid {} x {} @ {}", quantity, item, unit_price)
                } else {
                    CommandError::NotFound.to_string()
                }
            }
            Command::Warp { ship, destination } => {
                let Some(ship_entity) = self.ids.get(ship) else {
                    return CommandError::NotFound.to_string();
                };
                match travel::warp_ship(
                    &mut self.world,
                    &self.ids,
                    &mut self.rng,
                    ship_entity,
                    destination,
                ) {
                    Some(target) => {
                        let name = self
                            .ids
                            .get(target)
                            .and_then(|e| self.world.get::<&Outpost>(e).ok())
                            .map(|o| o.name.clone())
                            .unwrap_or_default();
                        format!("warped to {}", name)
                    }
                    None => CommandError::NotFound.to_string(),
                }
            }
            Command::QueryWallet { .. } => {
                let bits = self
                    .ids
                    .get(wallet_id)
                    .and_then(|e| self.world.get::<&Wallet>(e).ok())
                    .map(|w| w.bits())
                    .unwrap_or(0);
                format!("{} bits", bits)
            }
            Command::QueryCargo { .. } => {
                let lines = self
                    .ids
                    .get(cargo_id)
                    .and_then(|e| self.world.get::<&Storage>(e).ok())
                    .map(|s| {
                        s.items()
                            .iter()
                            .map(|(item, qty)| format!("{} x {}", qty, item))
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default();
                if lines.is_empty() {
                    "hold empty".to_string()
                } else {
                    lines.join("; ")
                }
            }
            Command::QueryListings { item, .. } => {
                let Some(outpost) = outpost_entity else {
                    return CommandError::NotFound.to_string();
                };
                let listings = market::open_listings(&self.world, outpost, item.as_deref());
                if listings.is_empty() {
                    "no open listings".to_string()
                } else {
                    listings
                        .iter()
                        .map(|l| format!("{} @ {}", l.item, l.starting_bid))
                        .collect::<Vec<_>>()
                        .join("; ")
                }
            }
            Command::QueryHeadline { .. } => outpost_entity
                .and_then(|e| self.world.get::<&Outpost>(e).ok())
                .map(|o| starbazaar_logic::headline::text(&o.headline).to_string())
                .unwrap_or_else(|| CommandError::NotFound.to_string()),
        }
    }

    /// Save the complete simulation to a writer.
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_simulation(
            writer,
            &self.world,
            self.clock.total_hours(),
            self.clock.hours_per_tick(),
        )
    }

    /// Load a simulation from a reader, replacing this engine's world.
    /// The id index and name pool are rebuilt from the loaded
    /// components.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = persistence::load_simulation(reader)?;
        self.world = loaded.world;
        self.clock = SimClock::restore(loaded.total_hours, loaded.hours_per_tick);
        self.ids = IdIndex::rebuild(&self.world);

        self.names = NamePool::new();
        for (_, system) in self.world.query::<&crate::components::StarSystem>().iter() {
            self.names.reserve(&system.name);
        }
        for (_, planet) in self.world.query::<&crate::components::Planet>().iter() {
            self.names.reserve(&planet.name);
        }
        for (_, outpost) in self.world.query::<&Outpost>().iter() {
            self.names.reserve(&outpost.name);
        }
        for (_, ship) in self.world.query::<&Ship>().iter() {
            self.names.reserve(&ship.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Market;

    fn small_engine(seed: u64) -> SimulationEngine {
        let mut engine = SimulationEngine::new(EngineConfig {
            seed,
            ..EngineConfig::default()
        });
        engine.generate(GalaxyConfig {
            star_systems: 1,
            planets_per_system: (1, 1),
            outposts_per_planet: (2, 2),
            ai_ships: 3,
        });
        engine
    }

    #[test]
    fn test_generate_populates_world() {
        let engine = small_engine(1);
        assert_eq!(engine.world().query::<&Outpost>().iter().count(), 2);
        assert_eq!(engine.world().query::<&Ship>().iter().count(), 3);
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut engine = small_engine(1);
        engine.tick();
        assert_eq!(engine.total_hours(), 6);
        for _ in 0..3 {
            engine.tick();
        }
        assert_eq!(engine.day(), 1);
    }

    #[test]
    fn test_odd_tick_size_misses_no_phase() {
        let mut engine = SimulationEngine::new(EngineConfig {
            seed: 3,
            hours_per_tick: 7,
            ..EngineConfig::default()
        });
        engine.generate(GalaxyConfig {
            star_systems: 1,
            planets_per_system: (1, 1),
            outposts_per_planet: (2, 2),
            ai_ships: 3,
        });

        // two 7-hour ticks cross hour 6; every outpost lists its stock
        engine.tick();
        engine.tick();
        for outpost in engine.outposts() {
            let entity = outpost;
            let market = engine.world().get::<&Market>(entity).unwrap();
            assert!(!market.new_listings.is_empty() || !market.open_listings.is_empty());
        }
    }

    #[test]
    fn test_player_commands_answered_in_mailbox() {
        let mut engine = small_engine(2);
        let player = engine
            .spawn_player_ship("Icarus Run", ShipClass::Medium)
            .unwrap();

        let sender = engine.command_sender();
        sender.send(Command::QueryWallet { ship: player }).unwrap();
        sender.send(Command::QueryCargo { ship: player }).unwrap();
        engine.tick();

        let replies = engine.drain_replies(player);
        assert_eq!(replies.len(), 2);
        assert!(replies[0].ends_with("bits"));
        assert_eq!(replies[1], "hold empty");
        // drained means drained
        assert!(engine.drain_replies(player).is_empty());
    }

    #[test]
    fn test_player_listing_flows_into_market() {
        let mut engine = small_engine(3);
        let player = engine
            .spawn_player_ship("Meridian", ShipClass::Light)
            .unwrap();

        // hand the player some cargo directly
        let (outpost_id, cargo_id) = {
            let entity = engine.ids().get(player).unwrap();
            let ship = engine.world().get::<&Ship>(entity).unwrap();
            (ship.outpost, ship.cargo)
        };
        let cargo = engine.ids().get(cargo_id).unwrap();
        engine
            .world_mut()
            .get::<&mut Storage>(cargo)
            .unwrap()
            .add("Food.Wheat", 5);

        let sender = engine.command_sender();
        sender
            .send(Command::CreateListing {
                ship: player,
                item: "Food.Wheat".into(),
                amount: 0,
                starting_bid: 0,
            })
            .unwrap();
        engine.tick();

        assert_eq!(engine.drain_replies(player), vec!["listed 5 x Food.Wheat"]);
        let outpost = engine.ids().get(outpost_id).unwrap();
        let market = engine.world().get::<&Market>(outpost).unwrap();
        assert!(market.has_listing_by(
            engine
                .world()
                .get::<&Ship>(engine.ids().get(player).unwrap())
                .unwrap()
                .wallet
        ));
    }

    #[test]
    fn test_despawn_repatriates_cargo_and_bits() {
        let mut engine = small_engine(4);
        let player = engine
            .spawn_player_ship("Nomad", ShipClass::Light)
            .unwrap();

        let (outpost_id, cargo_id, wallet_id) = {
            let entity = engine.ids().get(player).unwrap();
            let ship = engine.world().get::<&Ship>(entity).unwrap();
            (ship.outpost, ship.cargo, ship.wallet)
        };
        let cargo = engine.ids().get(cargo_id).unwrap();
        engine
            .world_mut()
            .get::<&mut Storage>(cargo)
            .unwrap()
            .add("Ore.Iron", 3);
        let ship_bits = {
            let wallet = engine.ids().get(wallet_id).unwrap();
            engine.world().get::<&Wallet>(wallet).unwrap().bits()
        };

        let (outpost_storage_id, outpost_wallet_id) = {
            let outpost = engine.ids().get(outpost_id).unwrap();
            let o = engine.world().get::<&Outpost>(outpost).unwrap();
            (o.storage, o.wallet)
        };
        let before_bits = {
            let wallet = engine.ids().get(outpost_wallet_id).unwrap();
            engine.world().get::<&Wallet>(wallet).unwrap().bits()
        };

        assert!(engine.despawn_ship(player));
        assert!(engine.ids().get(player).is_none());

        let storage = engine.ids().get(outpost_storage_id).unwrap();
        assert_eq!(
            engine
                .world()
                .get::<&Storage>(storage)
                .unwrap()
                .amount_of("Ore.Iron"),
            3
        );
        let wallet = engine.ids().get(outpost_wallet_id).unwrap();
        assert_eq!(
            engine.world().get::<&Wallet>(wallet).unwrap().bits(),
            before_bits + ship_bits
        );
    }

    #[test]
    fn test_same_seed_same_economy() {
        let run = |seed: u64| {
            let mut engine = small_engine(seed);
            for _ in 0..(4 * 7 * 2) {
                engine.tick();
            }
            crate::report::WealthReport::collect(engine.world(), engine.ids())
        };
        assert_eq!(run(7), run(7));
    }
}
