//! Ship components.

use serde::{Deserialize, Serialize};

/// Cargo capacity per ship-class step.
pub const CARGO_PER_CLASS: u32 = 50;

/// Ship class - determines cargo hold capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipClass {
    /// Built for traveling light.
    Light,
    /// Balanced traveler/trader.
    Medium,
    /// Built for volume trading.
    Heavy,
}

impl ShipClass {
    pub fn value(self) -> u32 {
        match self {
            ShipClass::Light => 1,
            ShipClass::Medium => 2,
            ShipClass::Heavy => 3,
        }
    }

    /// Cargo hold capacity for this class.
    pub fn cargo_capacity(self) -> u32 {
        self.value() * CARGO_PER_CLASS
    }

    pub const ALL: [ShipClass; 3] = [ShipClass::Light, ShipClass::Medium, ShipClass::Heavy];
}

/// A trading ship, human- or AI-controlled. Its cargo hold and wallet
/// are separate entities referenced by id; their `location` fields are
/// kept in step with `outpost` when the ship warps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub id: u32,
    pub name: String,
    pub class: ShipClass,
    /// Human-controlled ships skip the AI handler and get a mailbox.
    pub human: bool,
    /// Outpost the ship is docked at.
    pub outpost: u32,
    /// Cargo hold storage entity.
    pub cargo: u32,
    /// Wallet entity.
    pub wallet: u32,
}

/// Outbound reply lines for a human ship, filled during a tick and
/// drained by the network layer between ticks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mailbox {
    pub replies: Vec<String>,
}

impl Mailbox {
    pub fn push(&mut self, line: impl Into<String>) {
        self.replies.push(line.into());
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cargo_capacity_scales_with_class() {
        assert_eq!(ShipClass::Light.cargo_capacity(), 50);
        assert_eq!(ShipClass::Medium.cargo_capacity(), 100);
        assert_eq!(ShipClass::Heavy.cargo_capacity(), 150);
    }

    #[test]
    fn test_mailbox_drain_empties() {
        let mut mailbox = Mailbox::default();
        mailbox.push("docked at Halcyon Prime");
        let lines = mailbox.drain();
        assert_eq!(lines.len(), 1);
        assert!(mailbox.replies.is_empty());
    }
}
