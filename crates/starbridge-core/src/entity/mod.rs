//! Entities: an identifier plus a sparse set of components.
//!
//! - [`EntityId`]: unique identifier, ordered for deterministic iteration
//! - [`Components`]: one optional slot per component type
//! - [`Entity`]: an id bound to its components
//!
//! Component *values* can be changed freely through [`Entity::get_mut`].
//! Adding or removing a component goes through the
//! [`EntityStore`](crate::store::EntityStore), which keeps its per-kind
//! index in step.
//!
//! # Example
//!
//! ```
//! use starbridge_core::entity::{Entity, EntityId};
//! use starbridge_core::entity::components::{Components, Hull, ComponentKind};
//!
//! let ship = Entity::new(EntityId::new(42), Components::new().with(Hull::new(500.0)));
//!
//! assert_eq!(ship.id().as_u64(), 42);
//! assert!(ship.has(ComponentKind::Hull));
//! assert!(!ship.has(ComponentKind::Torpedo));
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{ComponentData, ComponentKind, ComponentMask, Components};

/// Unique identifier for an entity.
///
/// Ids are assigned monotonically by the store and never reused while the
/// entity is alive. Ordering follows the numeric value, which fixes the
/// iteration order of every system pass.
///
/// # Example
///
/// ```
/// use starbridge_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// An entity in the simulation.
///
/// Systems decide eligibility from [`Entity::mask`] (or an explicit
/// predicate over the components) and must re-check optional components
/// before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    components: Components,
}

impl Entity {
    /// Creates an entity from an id and its components.
    ///
    /// # Arguments
    ///
    /// * `id` - Identifier, unique within the store it will join
    /// * `components` - Initial component set
    #[must_use]
    pub const fn new(id: EntityId, components: Components) -> Self {
        Self { id, components }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Read-only view of every component slot.
    #[must_use]
    pub const fn components(&self) -> &Components {
        &self.components
    }

    /// Shared access to one component.
    #[must_use]
    pub fn get<T: ComponentData>(&self) -> Option<&T> {
        self.components.get::<T>()
    }

    /// Mutable access to one component's value.
    pub fn get_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        self.components.get_mut::<T>()
    }

    /// Whether the entity carries `kind`.
    #[must_use]
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.components.has(kind)
    }

    /// Set of component kinds present.
    #[must_use]
    pub fn mask(&self) -> ComponentMask {
        self.components.mask()
    }

    pub(crate) fn insert<T: ComponentData>(&mut self, value: T) -> Option<T> {
        self.components.insert(value)
    }

    pub(crate) fn remove_kind(&mut self, kind: ComponentKind) -> bool {
        self.components.remove_kind(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::components::{Mass, Position, Velocity};
    use super::*;

    mod entity_id_tests {
        use super::*;

        #[test]
        fn new_creates_id_with_value() {
            let id = EntityId::new(42);
            assert_eq!(id.as_u64(), 42);
        }

        #[test]
        fn ordering() {
            let mut ids = vec![EntityId::new(3), EntityId::new(1), EntityId::new(2)];
            ids.sort();
            assert_eq!(ids, vec![EntityId::new(1), EntityId::new(2), EntityId::new(3)]);
        }

        #[test]
        fn debug_format() {
            assert_eq!(format!("{:?}", EntityId::new(42)), "EntityId(42)");
        }

        #[test]
        fn display_format() {
            assert_eq!(format!("{}", EntityId::new(42)), "42");
        }

        #[test]
        fn u64_conversions() {
            let id: EntityId = 42u64.into();
            let raw: u64 = id.into();
            assert_eq!(raw, 42);
        }

        #[test]
        fn serializes_as_bare_number() {
            let json = serde_json::to_string(&EntityId::new(5)).unwrap();
            assert_eq!(json, "5");
        }
    }

    mod entity_tests {
        use super::*;

        fn moving_entity() -> Entity {
            Entity::new(
                EntityId::new(1),
                Components::new()
                    .with(Position::default())
                    .with(Velocity::default()),
            )
        }

        #[test]
        fn typed_access() {
            let mut entity = moving_entity();
            assert!(entity.get::<Position>().is_some());
            assert!(entity.get::<Mass>().is_none());

            if let Some(velocity) = entity.get_mut::<Velocity>() {
                velocity.linear.x = 5.0;
            }
            assert!((entity.get::<Velocity>().unwrap().linear.x - 5.0).abs() < f64::EPSILON);
        }

        #[test]
        fn mask_matches_presence() {
            let entity = moving_entity();
            assert_eq!(entity.mask(), ComponentMask::POSITION | ComponentMask::VELOCITY);
            assert!(entity.has(ComponentKind::Velocity));
        }

        #[test]
        fn insert_and_remove() {
            let mut entity = moving_entity();
            assert!(entity.insert(Mass { mass: 3.0 }).is_none());
            assert!(entity.has(ComponentKind::Mass));
            assert!(entity.remove_kind(ComponentKind::Mass));
            assert!(!entity.has(ComponentKind::Mass));
        }
    }
}
