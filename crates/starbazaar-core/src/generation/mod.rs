//! World generation: star systems, planets, outposts, and the AI
//! trader fleet, all drawn from the content catalogs.

mod galaxy;
mod names;

pub use galaxy::{
    spawn_outpost, spawn_planet, spawn_ship, spawn_star_system, GalaxyConfig,
};
pub use names::NamePool;
