//! Component definitions for the economy simulation.
//!
//! Components are pure data structs attached to entities. Behavior lives
//! in systems. Cross-entity relations are stable `u32` ids resolved
//! through [`crate::ids::IdIndex`].

mod economy;
mod location;
mod market;
mod ship;

pub use economy::*;
pub use location::*;
pub use market::*;
pub use ship::*;
