//! Pure economy logic for Starbazaar.
//!
//! This crate contains the market math that is independent of the ECS
//! world, the RNG, and any runtime. Functions take plain data and return
//! results, making them unit-testable and portable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auction`] | Per-bid fill computation and allocation planning |
//! | [`headline`] | News sentiment and production-rate adjustment |
//! | [`item`] | Item-key category projection and marker detection |
//! | [`popularity`] | Exponential demand multiplier from popularity scores |
//! | [`pricing`] | Rolling-average pricing guide (ledger) |

pub mod auction;
pub mod headline;
pub mod item;
pub mod popularity;
pub mod pricing;
