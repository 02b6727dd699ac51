//! Inbound player commands.
//!
//! Connection threads never touch the world directly. They hold a
//! `CommandSender` and push resolved `Command` values onto an mpsc
//! queue; the engine drains the queue at the start of each tick and
//! answers through the owning ship's `Mailbox`.

use std::fmt;
use std::sync::mpsc;

/// A fully resolved player action, addressed by stable ship id.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Post cargo for auction at the ship's outpost. `amount` 0 means
    /// everything held; `starting_bid` 0 asks the market for a price.
    CreateListing {
        ship: u32,
        item: String,
        amount: u32,
        starting_bid: u64,
    },
    /// Bid on an item at the ship's outpost.
    PlaceBid {
        ship: u32,
        item: String,
        quantity: u32,
        unit_price: u64,
    },
    /// Move to another outpost, or a random one when `None`.
    Warp { ship: u32, destination: Option<u32> },
    /// Report the ship's balance.
    QueryWallet { ship: u32 },
    /// Report the ship's hold contents.
    QueryCargo { ship: u32 },
    /// Report open listings at the ship's outpost, optionally for one
    /// item.
    QueryListings { ship: u32, item: Option<String> },
    /// Report the local headline and suggested values at the outpost.
    QueryHeadline { ship: u32 },
}

impl Command {
    /// Stable id of the ship this command belongs to; replies go to
    /// its mailbox.
    pub fn ship(&self) -> u32 {
        match *self {
            Command::CreateListing { ship, .. }
            | Command::PlaceBid { ship, .. }
            | Command::Warp { ship, .. }
            | Command::QueryWallet { ship }
            | Command::QueryCargo { ship }
            | Command::QueryListings { ship, .. }
            | Command::QueryHeadline { ship } => ship,
        }
    }
}

/// Clonable handle for submitting commands from outside the
/// simulation thread.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::Sender<Command>,
}

impl CommandSender {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self { tx }
    }

    /// Queue a command for the next tick. Fails only when the engine
    /// has shut down.
    pub fn send(&self, command: Command) -> Result<(), CommandError> {
        self.tx.send(command).map_err(|_| CommandError::EngineGone)
    }
}

/// Why a command could not be fulfilled. Recoverable cases become
/// mailbox reply lines rather than errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The engine's receive side was dropped.
    EngineGone,
    /// Wallet balance cannot cover the request.
    InsufficientFunds,
    /// Storage does not hold the requested amount.
    InsufficientCargo,
    /// Source and destination are at different outposts.
    LocationMismatch,
    /// Referenced ship, outpost, item, or listing is unknown.
    NotFound,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::EngineGone => write!(f, "simulation engine is gone"),
            CommandError::InsufficientFunds => write!(f, "not enough bits"),
            CommandError::InsufficientCargo => write!(f, "not enough cargo"),
            CommandError::LocationMismatch => write!(f, "not at the same outpost"),
            CommandError::NotFound => write!(f, "no such target"),
        }
    }
}

impl std::error::Error for CommandError {}
