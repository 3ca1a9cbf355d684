//! Independent worlds running side by side.
//!
//! A server hosts one [`World`] per flight (bridge crew session). Flights
//! never share state, so ticking them is embarrassingly parallel; each
//! world is still advanced on one thread, keeping its own run
//! deterministic.

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::hash::hash_world;
use crate::world::World;

/// Named worlds, ticked together.
#[derive(Debug, Default)]
pub struct Flights {
    flights: BTreeMap<String, World>,
}

impl Flights {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `world` under `name`, returning any world it replaces.
    pub fn add(&mut self, name: impl Into<String>, world: World) -> Option<World> {
        let name = name.into();
        info!(flight = %name, seed = world.seed(), "flight added");
        self.flights.insert(name, world)
    }

    /// Removes a flight.
    pub fn remove(&mut self, name: &str) -> Option<World> {
        let removed = self.flights.remove(name);
        if removed.is_some() {
            info!(flight = %name, "flight removed");
        }
        removed
    }

    /// Looks up a flight.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&World> {
        self.flights.get(name)
    }

    /// Looks up a flight for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut World> {
        self.flights.get_mut(name)
    }

    /// Flight names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.flights.keys().map(String::as_str)
    }

    /// Number of flights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether no flights are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Advances every flight by one tick, in parallel.
    pub fn update_all(&mut self, elapsed_ms: f64) {
        self.flights
            .par_iter_mut()
            .for_each(|(_, world)| world.update(elapsed_ms));
    }

    /// State hash of every flight.
    ///
    /// # Errors
    ///
    /// Propagates the first [`hash_world`] failure.
    pub fn hashes(&self) -> Result<BTreeMap<String, u64>> {
        self.flights
            .iter()
            .map(|(name, world)| Ok((name.clone(), hash_world(world)?)))
            .collect()
    }
}
