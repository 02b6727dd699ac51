//! Unique name assignment during generation.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::catalog::Catalog;

/// Tracks names handed out so far so every system, planet, outpost,
/// and ship in a galaxy reads distinctly.
#[derive(Debug, Default)]
pub struct NamePool {
    used: HashSet<String>,
}

impl NamePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a name as taken, e.g. while rebuilding from a snapshot or
    /// admitting a player-chosen ship name. Returns false if it was
    /// already in use.
    pub fn reserve(&mut self, name: &str) -> bool {
        self.used.insert(name.to_string())
    }

    /// Draw a unique name from `candidates`, decorated with a modifier
    /// of the given context (`Location` or `Ship`) when one matches.
    /// The candidate pool is finite, so after enough collisions a
    /// numeric suffix guarantees progress.
    pub fn draw(
        &mut self,
        catalog: &Catalog,
        rng: &mut StdRng,
        candidates: &[String],
        context: &str,
    ) -> String {
        for _ in 0..64 {
            let Some(base) = candidates.choose(rng) else {
                break;
            };
            let name = catalog.decorate_name(rng, base, context);
            if self.used.insert(name.clone()) {
                return name;
            }
        }

        let base = candidates
            .first()
            .map(String::as_str)
            .unwrap_or("Unnamed")
            .to_string();
        let mut n = 2;
        loop {
            let name = format!("{} {}", base, n);
            if self.used.insert(name.clone()) {
                return name;
            }
            n += 1;
        }
    }
}
