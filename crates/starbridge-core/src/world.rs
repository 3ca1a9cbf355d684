//! The world: entity store plus an ordered system schedule.
//!
//! Each call to [`World::update`] is one tick. Systems run strictly in
//! registration order, each over its eligible entities in ascending id
//! order, so a later system always sees the effects of an earlier one
//! within the same tick.
//!
//! # Throttling
//!
//! A system declared with a frequency accumulates elapsed time across
//! ticks and only runs once the accumulated time reaches its interval. It
//! is then handed the whole accumulated time and the accumulator resets.
//!
//! # Determinism
//!
//! Given the same seed, the same initial entities and the same sequence of
//! elapsed times and commands, two worlds produce identical state:
//! - Entities live in `BTreeMap`s and are visited in id order
//! - Candidate sets are `BTreeSet`s
//! - All randomness comes from one `ChaCha8Rng` seeded at construction
//!
//! # Example
//!
//! ```
//! use starbridge_core::config::WorldConfig;
//! use starbridge_core::entity::Components;
//! use starbridge_core::entity::components::{Position, Velocity};
//! use starbridge_core::world::World;
//! use glam::DVec3;
//!
//! let mut world = World::from_config(&WorldConfig::with_seed(42)).unwrap();
//! let probe = world.spawn(
//!     Components::new()
//!         .with(Position::default())
//!         .with(Velocity { linear: DVec3::X }),
//! );
//!
//! for _ in 0..10 {
//!     world.update(100.0);
//! }
//!
//! assert_eq!(world.tick(), 10);
//! let x = world.store().component::<Position>(probe).unwrap().coords.x;
//! assert!((x - 1.0).abs() < 1e-9);
//! ```

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::command::{Command, CommandOutcome};
use crate::config::WorldConfig;
use crate::entity::{ComponentData, ComponentKind, ComponentMask, Components, Entity, EntityId};
use crate::error::Result;
use crate::notify::{Notifier, NullNotifier};
use crate::store::EntityStore;
use crate::system::{System, SystemContext, SystemId};
use crate::systems::default_systems;

// =============================================================================
// World
// =============================================================================

struct ScheduledSystem {
    system: Box<dyn System>,
    accumulated_ms: f64,
}

/// Entities, systems and the seeded RNG they share.
pub struct World {
    /// Every live entity.
    store: EntityStore,
    /// Single source of randomness for all systems.
    rng: ChaCha8Rng,
    /// Seed `rng` was created from.
    seed: u64,
    /// Systems in execution order.
    systems: Vec<ScheduledSystem>,
    /// Where notifications go.
    notifier: Box<dyn Notifier>,
    /// Completed ticks.
    tick: u64,
    /// Simulated milliseconds across all completed ticks.
    elapsed_ms: f64,
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("store", &self.store)
            .field("systems", &self.system_ids())
            .field("seed", &self.seed)
            .field("tick", &self.tick)
            .field("elapsed_ms", &self.elapsed_ms)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Creates an empty world with no systems.
    ///
    /// Register systems with [`World::add_system`], or use
    /// [`World::from_config`] for the standard battery.
    ///
    /// # Arguments
    ///
    /// * `seed` - Seed for the world's RNG
    ///
    /// # Example
    ///
    /// ```
    /// use starbridge_core::world::World;
    ///
    /// let world = World::new(12345);
    /// assert_eq!(world.tick(), 0);
    /// assert_eq!(world.seed(), 12345);
    /// ```
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            store: EntityStore::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            systems: Vec::new(),
            notifier: Box::new(NullNotifier),
            tick: 0,
            elapsed_ms: 0.0,
        }
    }

    /// Creates a world running the standard system battery.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`](crate::error::CoreError::InvalidConfig)
    /// if `config` fails validation.
    pub fn from_config(config: &WorldConfig) -> Result<Self> {
        config.validate()?;
        let mut world = Self::new(config.seed);
        for system in default_systems(config) {
            world.add_system(system);
        }
        info!(
            seed = config.seed,
            systems = world.systems.len(),
            phasers_hz = config.phasers_hz,
            nearby_objects_hz = config.nearby_objects_hz,
            "world created"
        );
        Ok(world)
    }

    /// Appends a system to the end of the schedule.
    pub fn add_system(&mut self, system: Box<dyn System>) {
        debug!(system = %system.declaration().id, "system registered");
        self.systems.push(ScheduledSystem {
            system,
            accumulated_ms: 0.0,
        });
    }

    /// Replaces the notification sink.
    pub fn set_notifier(&mut self, notifier: Box<dyn Notifier>) {
        self.notifier = notifier;
    }

    /// Advances the world by one tick of `elapsed_ms` simulated milliseconds.
    ///
    /// Negative or non-finite elapsed times are treated as zero.
    pub fn update(&mut self, elapsed_ms: f64) {
        let elapsed_ms = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        let tick = self.tick;
        let mut despawns = Vec::new();

        for scheduled in &mut self.systems {
            scheduled.accumulated_ms += elapsed_ms;
            let declaration = scheduled.system.declaration();
            let id = declaration.id;
            let requires = declaration.requires;
            if let Some(interval) = declaration.interval_ms() {
                if scheduled.accumulated_ms < interval {
                    continue;
                }
            }
            let pass_ms = std::mem::take(&mut scheduled.accumulated_ms);

            let eligible: Vec<EntityId> = candidates(&self.store, requires)
                .into_iter()
                .filter(|candidate| {
                    self.store
                        .get(*candidate)
                        .is_some_and(|entity| scheduled.system.test(entity))
                })
                .collect();
            debug!(system = %id, tick, entities = eligible.len(), elapsed_ms = pass_ms, "running system");

            let mut ctx = SystemContext::new(
                &mut self.store,
                &mut self.rng,
                self.notifier.as_mut(),
                &mut despawns,
                tick,
            );
            scheduled.system.pre_update(&mut ctx, pass_ms);
            for entity in eligible {
                if ctx.is_despawning(entity) || !ctx.store().contains(entity) {
                    continue;
                }
                scheduled.system.update(&mut ctx, entity, pass_ms);
            }
            scheduled.system.post_update(&mut ctx, pass_ms);

            for entity in despawns.drain(..) {
                if self.store.remove_entity(entity).is_some() {
                    debug!(system = %id, entity = %entity, "entity despawned");
                }
            }
        }

        self.tick += 1;
        self.elapsed_ms += elapsed_ms;
    }

    /// Validates and applies a console command.
    ///
    /// Any notification the command raises is sent immediately.
    ///
    /// # Errors
    ///
    /// See [`Command::execute`].
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        let (outcome, notification) = command.execute(&mut self.store)?;
        if let Some(notification) = notification {
            self.notifier.notify(notification.topic(), &notification);
        }
        Ok(outcome)
    }

    // =========================================================================
    // Entities
    // =========================================================================

    /// Creates an entity with the next free id.
    pub fn spawn(&mut self, components: Components) -> EntityId {
        self.store.spawn(components)
    }

    /// Adds a fully formed entity, keeping its id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateEntity`](crate::error::CoreError::DuplicateEntity)
    /// if the id is taken.
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId> {
        self.store.add_entity(entity)
    }

    /// Removes an entity and every component it carries.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.store.remove_entity(id)
    }

    /// Looks up an entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(id)
    }

    /// Attaches or replaces a component.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EntityNotFound`](crate::error::CoreError::EntityNotFound)
    /// for an unknown id.
    pub fn add_component<T: ComponentData>(&mut self, id: EntityId, value: T) -> Result<Option<T>> {
        self.store.add_component(id, value)
    }

    /// Detaches a component.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EntityNotFound`](crate::error::CoreError::EntityNotFound)
    /// for an unknown id.
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> Result<bool> {
        self.store.remove_component(id, kind)
    }

    /// Mutates one component in place.
    ///
    /// # Errors
    ///
    /// Fails if the entity or the component is missing.
    pub fn update_component<T, F>(&mut self, id: EntityId, f: F) -> Result<()>
    where
        T: ComponentData,
        F: FnOnce(&mut T),
    {
        self.store.update_component::<T, F>(id, f)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Read access to the entity store.
    #[must_use]
    pub const fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Write access to the entity store, for setup and tests.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Completed ticks.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed the RNG was created from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Total simulated milliseconds.
    #[must_use]
    pub const fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Registered systems, in execution order.
    #[must_use]
    pub fn system_ids(&self) -> Vec<SystemId> {
        self.systems
            .iter()
            .map(|scheduled| scheduled.system.declaration().id)
            .collect()
    }

    /// Position in the RNG stream, for state hashing.
    pub(crate) fn rng_word_pos(&self) -> u128 {
        self.rng.get_word_pos()
    }
}

/// Entities that could satisfy `requires`, drawn from the smallest index.
fn candidates(store: &EntityStore, requires: ComponentMask) -> Vec<EntityId> {
    match requires.kinds().min_by_key(|kind| store.count_with(*kind)) {
        Some(kind) => store.entities_with(kind).iter().copied().collect(),
        None => store.ids().collect(),
    }
}
