//! Starbazaar Core - Space-Trading Economy Engine
//!
//! An ECS-based simulation of a galaxy of trading outposts: each outpost
//! produces goods, escrows them at auction, and clears incoming bids once
//! per simulated day, while AI- and player-controlled ships travel between
//! outposts and trade.
//!
//! # Architecture
//!
//! The simulation uses an Entity Component System via `hecs`:
//! - **Entities**: star systems, planets, outposts, ships, storages, wallets
//! - **Components**: pure data (Storage, Wallet, Market, Outpost, Ship, ...)
//! - **Systems**: logic that queries and updates components each tick
//!
//! Cross-entity relations are stable `u32` ids, never owning references;
//! the engine keeps an id → entity index that is rebuilt after a load.
//!
//! # Example
//!
//! ```rust,no_run
//! use starbazaar_core::prelude::*;
//! use starbazaar_core::generation::GalaxyConfig;
//!
//! let mut engine = SimulationEngine::new(EngineConfig::default());
//! engine.generate(GalaxyConfig::default());
//!
//! loop {
//!     engine.tick(); // six simulated hours per call by default
//! }
//! ```

pub mod catalog;
pub mod clock;
pub mod commands;
pub mod components;
pub mod engine;
pub mod generation;
pub mod ids;
pub mod persistence;
pub mod report;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::commands::{Command, CommandSender};
    pub use crate::components::*;
    pub use crate::engine::{EngineConfig, SimulationEngine};
}
