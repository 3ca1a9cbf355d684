//! Entity storage with a per-component-kind index.
//!
//! The store owns every entity of a world. It provides:
//! - Entity storage with deterministic iteration order (`BTreeMap`)
//! - An index from [`ComponentKind`] to the ids carrying it, so a system can
//!   fetch its candidates without scanning the whole world
//! - Lifecycle management (spawn, register, remove)
//!
//! # Index Synchronization
//!
//! The index is only touched when a component is added or removed, which
//! can only happen through the store. Component *values* may be edited in
//! place through [`EntityStore::get_mut`] without any bookkeeping.
//!
//! # Example
//!
//! ```
//! use starbridge_core::store::EntityStore;
//! use starbridge_core::entity::components::{Components, ComponentKind, Power, Reactor};
//!
//! let mut store = EntityStore::new();
//! let reactor = store.spawn(Components::new().with(Reactor::default()));
//! let console = store.spawn(Components::new().with(Power::default()));
//!
//! let reactors: Vec<_> = store.entities_with(ComponentKind::Reactor).iter().copied().collect();
//! assert_eq!(reactors, vec![reactor]);
//! assert!(store.get(console).is_some());
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::entity::{ComponentData, ComponentKind, Components, Entity, EntityId};
use crate::error::{CoreError, Result};

static EMPTY: BTreeSet<EntityId> = BTreeSet::new();

/// Container for all entities of one world.
///
/// # Determinism
///
/// Entities and index sets are `BTreeMap`/`BTreeSet` keyed by [`EntityId`],
/// so every iteration visits ids in ascending order on every platform.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Next id handed out by [`EntityStore::spawn`].
    next_id: u64,
    /// Entity storage.
    entities: BTreeMap<EntityId, Entity>,
    /// Ids carrying each component kind.
    index: BTreeMap<ComponentKind, BTreeSet<EntityId>>,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an entity with the next free id.
    ///
    /// # Returns
    ///
    /// The id assigned to the new entity.
    pub fn spawn(&mut self, components: Components) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.index_entity(id, &components);
        self.entities.insert(id, Entity::new(id, components));
        id
    }

    /// Registers an entity built elsewhere, keeping its id.
    ///
    /// The id counter is advanced past the registered id so later spawns
    /// never collide with it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateEntity`] if the id is already taken.
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityId> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(CoreError::DuplicateEntity(id));
        }
        self.next_id = self.next_id.max(id.as_u64().saturating_add(1));
        self.index_entity(id, entity.components());
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Removes an entity and drops it from every index.
    ///
    /// # Returns
    ///
    /// The removed entity, if it existed.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        for kind in entity.mask().kinds() {
            if let Some(ids) = self.index.get_mut(&kind) {
                ids.remove(&id);
            }
        }
        Some(entity)
    }

    /// Returns a reference to an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by id.
    ///
    /// Only component values can be changed through the returned reference.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Shorthand for `get(id)?.get::<T>()`.
    #[must_use]
    pub fn component<T: ComponentData>(&self, id: EntityId) -> Option<&T> {
        self.entities.get(&id)?.get::<T>()
    }

    /// Shorthand for `get_mut(id)?.get_mut::<T>()`.
    pub fn component_mut<T: ComponentData>(&mut self, id: EntityId) -> Option<&mut T> {
        self.entities.get_mut(&id)?.get_mut::<T>()
    }

    /// Whether an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Ids of every entity carrying `kind`, ascending.
    #[must_use]
    pub fn entities_with(&self, kind: ComponentKind) -> &BTreeSet<EntityId> {
        self.index.get(&kind).unwrap_or(&EMPTY)
    }

    /// Number of entities carrying `kind`.
    #[must_use]
    pub fn count_with(&self, kind: ComponentKind) -> usize {
        self.entities_with(kind).len()
    }

    /// Adds or replaces a component.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EntityNotFound`] if the entity does not exist.
    pub fn add_component<T: ComponentData>(&mut self, id: EntityId, value: T) -> Result<Option<T>> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(CoreError::EntityNotFound(id))?;
        let previous = entity.insert(value);
        self.index.entry(T::KIND).or_default().insert(id);
        Ok(previous)
    }

    /// Removes the component of `kind`.
    ///
    /// # Returns
    ///
    /// Whether the entity had the component.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EntityNotFound`] if the entity does not exist.
    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> Result<bool> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(CoreError::EntityNotFound(id))?;
        let removed = entity.remove_kind(kind);
        if removed {
            if let Some(ids) = self.index.get_mut(&kind) {
                ids.remove(&id);
            }
        }
        Ok(removed)
    }

    /// Edits a component in place.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EntityNotFound`] if the entity does not exist,
    /// or [`CoreError::MissingComponent`] if it lacks `T`.
    ///
    /// # Example
    ///
    /// ```
    /// use starbridge_core::store::EntityStore;
    /// use starbridge_core::entity::components::{Components, Power, Reactor};
    /// use starbridge_core::error::CoreError;
    ///
    /// let mut store = EntityStore::new();
    /// let console = store.spawn(Components::new().with(Power::default()));
    ///
    /// store.update_component::<Power, _>(console, |p| p.power_draw = 4).unwrap();
    ///
    /// let err = store.update_component::<Reactor, _>(console, |r| r.max_output = 1);
    /// assert!(matches!(err, Err(CoreError::MissingComponent { .. })));
    /// ```
    pub fn update_component<T, F>(&mut self, id: EntityId, f: F) -> Result<()>
    where
        T: ComponentData,
        F: FnOnce(&mut T),
    {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(CoreError::EntityNotFound(id))?;
        let component = entity
            .get_mut::<T>()
            .ok_or_else(|| CoreError::missing(id, T::KIND))?;
        f(component);
        Ok(())
    }

    /// Ids of every entity, ascending.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Every entity, ascending by id.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the store has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_entity(&mut self, id: EntityId, components: &Components) {
        for kind in components.mask().kinds() {
            self.index.entry(kind).or_default().insert(id);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
