//! Frame resolution.
//!
//! Positions are stored relative to a parent (a planet, a station, a ship
//! bay), and orbiting bodies carry orbital elements instead of coordinates.
//! This module walks those parent chains up to the enclosing
//! [`PlanetarySystem`] and accumulates the offset along the way.

use glam::DVec3;
use tracing::warn;

use crate::entity::components::{PlanetarySystem, Position, Satellite};
use crate::entity::EntityId;
use crate::store::EntityStore;

/// Longest parent chain followed before giving up.
pub const MAX_FRAME_DEPTH: usize = 16;

/// An entity's place inside its planetary system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedFrame {
    /// Enclosing planetary system.
    pub system: EntityId,
    /// Offset from the system's origin.
    pub position: DVec3,
}

/// Resolves `id` to its planetary system and system-relative position.
///
/// Returns `None` when the chain ends without reaching a planetary system:
/// an entity with no parent, a missing parent, an entity with neither
/// [`Position`] nor [`Satellite`], or a chain longer than
/// [`MAX_FRAME_DEPTH`] (logged, as it usually means a parent cycle).
///
/// A planetary system resolves to itself at the origin.
#[must_use]
pub fn resolve(store: &EntityStore, id: EntityId) -> Option<ResolvedFrame> {
    let mut offset = DVec3::ZERO;
    let mut current = id;

    for _ in 0..=MAX_FRAME_DEPTH {
        let entity = store.get(current)?;
        if entity.get::<PlanetarySystem>().is_some() {
            return Some(ResolvedFrame {
                system: current,
                position: offset,
            });
        }

        let (local, parent) = if let Some(position) = entity.get::<Position>() {
            (position.coords, position.parent_id?)
        } else if let Some(satellite) = entity.get::<Satellite>() {
            (satellite.orbit.offset(), satellite.parent_id)
        } else {
            return None;
        };

        offset += local;
        current = parent;
    }

    warn!(entity = %id, depth = MAX_FRAME_DEPTH, "frame chain too deep, possible parent cycle");
    None
}

/// Planetary system that `id` belongs to.
#[must_use]
pub fn containing_system(store: &EntityStore, id: EntityId) -> Option<EntityId> {
    resolve(store, id).map(|frame| frame.system)
}

/// Position of `id` relative to its planetary system's origin.
#[must_use]
pub fn system_relative_position(store: &EntityStore, id: EntityId) -> Option<DVec3> {
    resolve(store, id).map(|frame| frame.position)
}

/// Positions of `a` and `b` in a frame they share.
///
/// Two entities in the same planetary system are compared in
/// system-relative coordinates. Two entities that resolve to no system at
/// all (deep space) are compared by their raw coordinates. Anything else,
/// including a missing entity, yields `None`.
#[must_use]
pub fn relative_positions(store: &EntityStore, a: EntityId, b: EntityId) -> Option<(DVec3, DVec3)> {
    match (resolve(store, a), resolve(store, b)) {
        (Some(fa), Some(fb)) if fa.system == fb.system => Some((fa.position, fb.position)),
        (None, None) => Some((
            store.component::<Position>(a)?.coords,
            store.component::<Position>(b)?.coords,
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::Components;
    use crate::entity::{ComponentKind, Entity};
    use helm::OrbitalElements;

    fn sol(store: &mut EntityStore) -> EntityId {
        store.spawn(Components::new().with(PlanetarySystem {
            name: "Sol".into(),
        }))
    }

    #[test]
    fn direct_child_of_system() {
        let mut store = EntityStore::new();
        let system = sol(&mut store);
        let ship = store.spawn(
            Components::new().with(Position::in_frame(DVec3::new(1.0, 2.0, 3.0), system)),
        );

        let frame = resolve(&store, ship).unwrap();
        assert_eq!(frame.system, system);
        assert_eq!(frame.position, DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn offsets_accumulate_through_satellites() {
        let mut store = EntityStore::new();
        let system = sol(&mut store);
        let planet = store.spawn(Components::new().with(Satellite {
            parent_id: system,
            orbit: OrbitalElements {
                semi_major_axis: 100.0,
                ..OrbitalElements::default()
            },
        }));
        let station = store.spawn(
            Components::new().with(Position::in_frame(DVec3::new(0.0, 5.0, 0.0), planet)),
        );

        let position = system_relative_position(&store, station).unwrap();
        assert!((position - DVec3::new(100.0, 5.0, 0.0)).length() < 1e-9);
        assert_eq!(containing_system(&store, station), Some(system));
    }

    #[test]
    fn no_parent_has_no_system() {
        let mut store = EntityStore::new();
        let drifter = store.spawn(Components::new().with(Position::default()));
        assert!(resolve(&store, drifter).is_none());
    }

    #[test]
    fn missing_parent_has_no_system() {
        let mut store = EntityStore::new();
        let orphan = store.spawn(
            Components::new().with(Position::in_frame(DVec3::ZERO, EntityId::new(999))),
        );
        assert!(resolve(&store, orphan).is_none());
    }

    #[test]
    fn parent_cycle_terminates() {
        let mut store = EntityStore::new();
        let a = EntityId::new(0);
        let b = EntityId::new(1);
        store
            .add_entity(Entity::new(a, Components::new().with(Position::in_frame(DVec3::X, b))))
            .unwrap();
        store
            .add_entity(Entity::new(b, Components::new().with(Position::in_frame(DVec3::X, a))))
            .unwrap();

        assert!(resolve(&store, a).is_none());
    }

    #[test]
    fn pair_in_same_system() {
        let mut store = EntityStore::new();
        let system = sol(&mut store);
        let a = store.spawn(Components::new().with(Position::in_frame(DVec3::X, system)));
        let b = store.spawn(Components::new().with(Position::in_frame(DVec3::Y, system)));

        assert_eq!(relative_positions(&store, a, b), Some((DVec3::X, DVec3::Y)));
    }

    #[test]
    fn pair_across_systems_is_incomparable() {
        let mut store = EntityStore::new();
        let sol_id = sol(&mut store);
        let other = sol(&mut store);
        let a = store.spawn(Components::new().with(Position::in_frame(DVec3::X, sol_id)));
        let b = store.spawn(Components::new().with(Position::in_frame(DVec3::X, other)));
        let drifter = store.spawn(Components::new().with(Position::default()));

        assert!(relative_positions(&store, a, b).is_none());
        assert!(relative_positions(&store, a, drifter).is_none());
    }

    #[test]
    fn pair_in_deep_space_uses_raw_coords() {
        let mut store = EntityStore::new();
        let a = store.spawn(Components::new().with(Position {
            coords: DVec3::new(5.0, 0.0, 0.0),
            ..Position::default()
        }));
        let b = store.spawn(Components::new().with(Position::default()));

        assert_eq!(
            relative_positions(&store, a, b),
            Some((DVec3::new(5.0, 0.0, 0.0), DVec3::ZERO))
        );
        assert!(relative_positions(&store, a, EntityId::new(77)).is_none());
    }

    #[test]
    fn system_resolves_to_itself() {
        let mut store = EntityStore::new();
        let system = sol(&mut store);
        let frame = resolve(&store, system).unwrap();
        assert_eq!(frame.system, system);
        assert_eq!(frame.position, DVec3::ZERO);
        assert!(store.get(system).unwrap().has(ComponentKind::PlanetarySystem));
    }
}
