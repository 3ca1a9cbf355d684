//! State hashing for determinism checks.
//!
//! Two worlds built from the same seed, entities, commands and elapsed
//! times must hash identically. The harness and the determinism tests
//! compare these hashes across runs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::error::Result;
use crate::world::World;

/// Computes a deterministic hash of world state.
///
/// This hash includes:
/// - Tick, seed and total elapsed time
/// - Position in the RNG stream
/// - Every entity, in id order, with its serialized components
///
/// # Errors
///
/// Returns [`CoreError::Snapshot`](crate::error::CoreError::Snapshot) if a
/// component fails to serialize.
pub fn hash_world(world: &World) -> Result<u64> {
    let mut hasher = DefaultHasher::new();

    world.tick().hash(&mut hasher);
    world.seed().hash(&mut hasher);
    // Floats hashed as bits
    world.elapsed_ms().to_bits().hash(&mut hasher);
    world.rng_word_pos().hash(&mut hasher);

    world.store().len().hash(&mut hasher);
    for entity in world.store().entities() {
        entity.id().hash(&mut hasher);
        serde_json::to_vec(entity.components())?.hash(&mut hasher);
    }

    Ok(hasher.finish())
}

/// Serializes every entity, in id order, as a JSON array.
///
/// # Errors
///
/// Returns [`CoreError::Snapshot`](crate::error::CoreError::Snapshot) if a
/// component fails to serialize.
pub fn snapshot_json(world: &World) -> Result<String> {
    let entities: Vec<_> = world.store().entities().collect();
    Ok(serde_json::to_string_pretty(&entities)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::{Position, Velocity};
    use crate::entity::Components;
    use glam::DVec3;

    fn probe_world(seed: u64) -> World {
        let mut world = World::new(seed);
        world.spawn(
            Components::new()
                .with(Position::default())
                .with(Velocity { linear: DVec3::X }),
        );
        world
    }

    #[test]
    fn identical_worlds_hash_equal() {
        let a = probe_world(1);
        let b = probe_world(1);
        assert_eq!(hash_world(&a).unwrap(), hash_world(&b).unwrap());
    }

    #[test]
    fn seed_changes_hash() {
        assert_ne!(
            hash_world(&probe_world(1)).unwrap(),
            hash_world(&probe_world(2)).unwrap()
        );
    }

    #[test]
    fn component_change_changes_hash() {
        let a = probe_world(1);
        let mut b = probe_world(1);
        b.update_component::<Velocity, _>(crate::entity::EntityId::new(0), |v| {
            v.linear = DVec3::Y;
        })
        .unwrap();
        assert_ne!(hash_world(&a).unwrap(), hash_world(&b).unwrap());
    }

    #[test]
    fn tick_changes_hash() {
        let a = probe_world(1);
        let mut b = probe_world(1);
        b.update(0.0);
        assert_ne!(hash_world(&a).unwrap(), hash_world(&b).unwrap());
    }

    #[test]
    fn snapshot_lists_entities() {
        let json = snapshot_json(&probe_world(1)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }
}
