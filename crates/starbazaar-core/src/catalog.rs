//! Content catalogs - item categories and names, name modifiers,
//! headlines, location and ship names.
//!
//! Catalogs are data, not code: the default set ships as embedded JSON
//! (`data/catalog.json`) and operators can substitute their own via
//! [`Catalog::from_json`]. A missing or empty required list is a fatal
//! configuration error reported before the clock ever starts.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use starbazaar_logic::item;

const BUILTIN_CATALOG: &str = include_str!("../../../data/catalog.json");

/// The finite content catalog consumed by generation and production.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Item categories (`Food`, `Ore`, ...). Every popularity index key
    /// and outpost export category comes from this list.
    pub item_types: Vec<String>,
    /// Item keys, `Category.Name`.
    pub item_names: Vec<String>,
    /// Name modifiers, `Context.Modifier`; the context selects where a
    /// modifier may apply (`Location`, `Ship`, or an item category).
    pub modifiers: Vec<String>,
    /// Weekly news headlines, `Sentiment.Text`.
    pub headlines: Vec<String>,
    /// Location names for star systems, planets, and outposts.
    pub location_names: Vec<String>,
    /// Ship names.
    pub ship_names: Vec<String>,
}

impl Catalog {
    /// The embedded default catalog. Panics only if the bundled data is
    /// itself invalid, which is a build defect, not a runtime state.
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CATALOG).expect("bundled catalog must be valid")
    }

    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check every required list is non-empty.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.item_types.is_empty() {
            return Err(CatalogError::Empty("item_types"));
        }
        if self.item_names.is_empty() {
            return Err(CatalogError::Empty("item_names"));
        }
        if self.headlines.is_empty() {
            return Err(CatalogError::Empty("headlines"));
        }
        if self.location_names.is_empty() {
            return Err(CatalogError::Empty("location_names"));
        }
        if self.ship_names.is_empty() {
            return Err(CatalogError::Empty("ship_names"));
        }
        // modifiers are optional flavor; an empty list just means plain names
        Ok(())
    }

    /// Pick a random item category.
    pub fn pick_item_type(&self, rng: &mut impl Rng) -> &str {
        self.item_types.choose(rng).map(String::as_str).unwrap_or("Other")
    }

    /// Pick a random headline.
    pub fn pick_headline(&self, rng: &mut impl Rng) -> &str {
        self.headlines.choose(rng).map(String::as_str).unwrap_or("")
    }

    /// Generate a concrete item key of the given category, with a
    /// chance of a matching modifier (`Ore.Refined Iron`).
    pub fn generate_item(&self, rng: &mut impl Rng, item_type: &str) -> Option<String> {
        let candidates: Vec<&String> = self
            .item_names
            .iter()
            .filter(|name| item::category(name) == item_type)
            .collect();
        let picked = candidates.choose(rng)?;

        // a randomly drawn modifier applies only when its context matches
        if let Some(modifier) = self.modifiers.choose(rng) {
            if item::category(modifier) == item_type {
                return Some(item::compose(
                    item_type,
                    Some(item::name(modifier)),
                    item::name(picked),
                ));
            }
        }

        Some((*picked).clone())
    }

    /// Decorate a base name with a modifier matching `context`
    /// (`Location` or `Ship`), if one is drawn.
    pub fn decorate_name(&self, rng: &mut impl Rng, base: &str, context: &str) -> String {
        if let Some(modifier) = self.modifiers.choose(rng) {
            if item::category(modifier) == context {
                return format!("{} {}", base, item::name(modifier));
            }
        }
        base.to_string()
    }
}

/// Errors raised while loading content catalogs. These are fatal at
/// startup: the simulation refuses to run on missing content.
#[derive(Debug)]
pub enum CatalogError {
    Parse(serde_json::Error),
    Empty(&'static str),
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "catalog parse error: {}", e),
            CatalogError::Empty(list) => write!(f, "catalog list '{}' is empty", list),
        }
    }
}

impl std::error::Error for CatalogError {}
