//! Systems - logic that operates on components each tick.

pub mod ai;
pub mod market;
pub mod production;
pub mod transfer;
pub mod travel;
