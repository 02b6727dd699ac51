//! World-graph components: star systems, planets, outposts.

use serde::{Deserialize, Serialize};

/// Units of space in each outpost warehouse.
pub const WAREHOUSE_SPACE: u32 = 20;

/// Bits seeded into each outpost and ship wallet at world generation.
pub const SEED_BITS: u64 = 1000;

/// Outpost size class - scales production, warehouses, and traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutpostSize {
    Small,
    Medium,
    Large,
}

impl OutpostSize {
    /// Numeric weight used in production and generation formulas
    /// (1/2/3 - every size produces something).
    pub fn value(self) -> u32 {
        match self {
            OutpostSize::Small => 1,
            OutpostSize::Medium => 2,
            OutpostSize::Large => 3,
        }
    }

    pub const ALL: [OutpostSize; 3] =
        [OutpostSize::Small, OutpostSize::Medium, OutpostSize::Large];
}

/// A star system: a name and its planets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: u32,
    pub name: String,
    pub planets: Vec<u32>,
}

/// A planet: a name and its outposts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Planet {
    pub id: u32,
    pub name: String,
    pub star_system: u32,
    pub outposts: Vec<u32>,
}

/// A trading outpost. The entity also carries a [`super::Market`]
/// component; the four economy containers and the warehouses are
/// separate entities referenced by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outpost {
    pub id: u32,
    pub name: String,
    pub planet: u32,
    pub size: OutpostSize,
    /// Category this outpost manufactures.
    pub main_export: String,
    /// Batches manufactured per week; moves with the news.
    pub production_rate: u32,
    /// This week's headline (`Sentiment.Text`), empty before the first
    /// weekly roll.
    pub headline: String,
    /// Production storage (goods awaiting listing).
    pub storage: u32,
    /// Escrow storage for goods up for auction.
    pub market_storage: u32,
    /// The outpost's own trading wallet.
    pub wallet: u32,
    /// Escrow wallet for cash pending payout to sellers.
    pub market_wallet: u32,
    /// Rentable warehouse storages, one deed item each.
    pub warehouses: Vec<u32>,
}
