//! System trait and per-pass context.
//!
//! A system is a predicate plus a per-entity transform. Each tick the
//! [`World`](crate::world::World) hands every registered system, in order,
//! the entities its predicate accepts.
//!
//! # System Declaration
//!
//! Each system declares:
//! - Its identifier ([`SystemId`]), used in logs
//! - The component kinds an entity must carry ([`ComponentMask`])
//! - An optional invocation rate in Hz
//!
//! # Lifecycle of a pass
//!
//! 1. `pre_update` once
//! 2. `update` for each eligible entity, ascending id
//! 3. `post_update` once
//! 4. Removals requested through [`SystemContext::despawn`] are applied
//!
//! # Example
//!
//! ```
//! use starbridge_core::entity::{ComponentMask, EntityId};
//! use starbridge_core::entity::components::Hull;
//! use starbridge_core::system::{System, SystemContext, SystemDeclaration, SystemId};
//!
//! struct HullDecay {
//!     declaration: SystemDeclaration,
//! }
//!
//! impl System for HullDecay {
//!     fn declaration(&self) -> &SystemDeclaration {
//!         &self.declaration
//!     }
//!
//!     fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, elapsed_ms: f64) {
//!         if let Some(hull) = ctx.store_mut().component_mut::<Hull>(id) {
//!             hull.integrity = (hull.integrity - elapsed_ms / 1000.0).max(0.0);
//!         }
//!     }
//! }
//!
//! let decay = HullDecay {
//!     declaration: SystemDeclaration::new(SystemId::new("hull_decay"), ComponentMask::HULL),
//! };
//! assert_eq!(decay.declaration().id.as_str(), "hull_decay");
//! ```

use std::fmt;

use rand_chacha::ChaCha8Rng;

use crate::entity::{ComponentMask, Entity, EntityId};
use crate::notify::{Notification, Notifier};
use crate::store::EntityStore;

// =============================================================================
// System Identification
// =============================================================================

/// Name of a system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemId(&'static str);

impl SystemId {
    /// Creates a new `SystemId`.
    #[must_use]
    pub const fn new(id: &'static str) -> Self {
        Self(id)
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

// =============================================================================
// System Declaration
// =============================================================================

/// What a system runs on and how often.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemDeclaration {
    /// Identifier used in logs.
    pub id: SystemId,
    /// Kinds every eligible entity must carry. The narrowest of these also
    /// picks the index the scheduler draws candidates from.
    pub requires: ComponentMask,
    /// Invocation rate in Hz. `None` runs every tick.
    pub frequency: Option<f64>,
}

impl SystemDeclaration {
    /// Declaration that runs every tick.
    #[must_use]
    pub const fn new(id: SystemId, requires: ComponentMask) -> Self {
        Self {
            id,
            requires,
            frequency: None,
        }
    }

    /// Same declaration, throttled to `hz`.
    #[must_use]
    pub fn with_frequency(mut self, hz: f64) -> Self {
        self.frequency = Some(hz);
        self
    }

    /// Milliseconds that must accumulate between invocations.
    #[must_use]
    pub fn interval_ms(&self) -> Option<f64> {
        self.frequency
            .filter(|hz| *hz > 0.0)
            .map(|hz| 1000.0 / hz)
    }
}

// =============================================================================
// System Context
// =============================================================================

/// Everything a system may touch during its pass.
///
/// The store, the world's RNG and the notifier are borrowed from the world
/// for the duration of one system's pass. Entity removal is buffered here
/// and applied once the pass ends.
pub struct SystemContext<'a> {
    store: &'a mut EntityStore,
    rng: &'a mut ChaCha8Rng,
    notifier: &'a mut dyn Notifier,
    despawns: &'a mut Vec<EntityId>,
    tick: u64,
}

impl<'a> SystemContext<'a> {
    /// Bundles the world's parts for one pass.
    pub fn new(
        store: &'a mut EntityStore,
        rng: &'a mut ChaCha8Rng,
        notifier: &'a mut dyn Notifier,
        despawns: &'a mut Vec<EntityId>,
        tick: u64,
    ) -> Self {
        Self {
            store,
            rng,
            notifier,
            despawns,
            tick,
        }
    }

    /// Read access to every entity.
    #[must_use]
    pub fn store(&self) -> &EntityStore {
        self.store
    }

    /// Write access to component values.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        self.store
    }

    /// The world's seeded RNG.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        self.rng
    }

    /// Publishes a notification on its own topic.
    pub fn notify(&mut self, notification: &Notification) {
        self.notifier.notify(notification.topic(), notification);
    }

    /// Queues `id` for removal once the current pass ends.
    pub fn despawn(&mut self, id: EntityId) {
        if !self.despawns.contains(&id) {
            self.despawns.push(id);
        }
    }

    /// Whether `id` is already queued for removal.
    #[must_use]
    pub fn is_despawning(&self, id: EntityId) -> bool {
        self.despawns.contains(&id)
    }

    /// Tick being computed.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }
}

impl fmt::Debug for SystemContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemContext")
            .field("entities", &self.store.len())
            .field("despawns", &self.despawns)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// System Trait
// =============================================================================

/// Per-tick transform over a subset of entities.
///
/// Systems must be `Send` so a whole world can move between threads.
///
/// # Implementation Guidelines
///
/// - Treat every optional component as possibly absent; a missing component
///   makes `update` a no-op for that entity, never a panic.
/// - Draw randomness only from [`SystemContext::rng`].
/// - Remove entities only through [`SystemContext::despawn`].
pub trait System: Send {
    /// Returns the system's declaration.
    fn declaration(&self) -> &SystemDeclaration;

    /// Whether `entity` should be handed to [`System::update`].
    ///
    /// Defaults to carrying every kind in the declaration's `requires`.
    fn test(&self, entity: &Entity) -> bool {
        entity.mask().contains(self.declaration().requires)
    }

    /// Runs once before any entity in this pass.
    fn pre_update(&mut self, _ctx: &mut SystemContext<'_>, _elapsed_ms: f64) {}

    /// Runs once per eligible entity.
    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, elapsed_ms: f64);

    /// Runs once after every entity in this pass.
    fn post_update(&mut self, _ctx: &mut SystemContext<'_>, _elapsed_ms: f64) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::Components;
    use crate::notify::NullNotifier;
    use rand::SeedableRng;

    struct Noop {
        declaration: SystemDeclaration,
    }

    impl System for Noop {
        fn declaration(&self) -> &SystemDeclaration {
            &self.declaration
        }

        fn update(&mut self, _ctx: &mut SystemContext<'_>, _id: EntityId, _elapsed_ms: f64) {}
    }

    #[test]
    fn interval_from_frequency() {
        let decl = SystemDeclaration::new(SystemId::new("x"), ComponentMask::empty()).with_frequency(5.0);
        assert_eq!(decl.interval_ms(), Some(200.0));
        let every_tick = SystemDeclaration::new(SystemId::new("y"), ComponentMask::empty());
        assert_eq!(every_tick.interval_ms(), None);
    }

    #[test]
    fn default_test_requires_all_kinds() {
        let system = Noop {
            declaration: SystemDeclaration::new(
                SystemId::new("noop"),
                ComponentMask::POWER | ComponentMask::EFFICIENCY,
            ),
        };
        let partial = Entity::new(
            EntityId::new(1),
            Components::new().with(crate::entity::components::Power::default()),
        );
        let full = Entity::new(
            EntityId::new(2),
            Components::new()
                .with(crate::entity::components::Power::default())
                .with(crate::entity::components::Efficiency::default()),
        );
        assert!(!system.test(&partial));
        assert!(system.test(&full));
    }

    #[test]
    fn despawn_is_deduplicated() {
        let mut store = EntityStore::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut notifier = NullNotifier;
        let mut despawns = Vec::new();
        let mut ctx = SystemContext::new(&mut store, &mut rng, &mut notifier, &mut despawns, 0);

        ctx.despawn(EntityId::new(3));
        ctx.despawn(EntityId::new(3));
        assert!(ctx.is_despawning(EntityId::new(3)));
        drop(ctx);
        assert_eq!(despawns, vec![EntityId::new(3)]);
    }
}
