//! Proximity bookkeeping.
//!
//! Every entity carrying [`NearbyObjects`] gets a map of distances to all
//! other positioned entities in the same planetary system. The maps are
//! cleared at the start of each pass and rebuilt, so a pair is measured at
//! most once per pass and both sides see the same value.
//!
//! Entities are bucketed by planetary system in `pre_update`, so an anchor
//! only ever compares against its own partition. Entities outside any
//! planetary system have no neighbours.

use std::collections::{BTreeMap, BTreeSet};

use glam::DVec3;
use tracing::trace;

use crate::config::DEFAULT_SYSTEM_HZ;
use crate::entity::components::NearbyObjects;
use crate::entity::{ComponentKind, ComponentMask, EntityId};
use crate::frames::{self, ResolvedFrame};
use crate::store::EntityStore;
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

/// Maintains per-entity distance maps.
#[derive(Debug)]
pub struct NearbyObjectsSystem {
    declaration: SystemDeclaration,
    frames: BTreeMap<EntityId, ResolvedFrame>,
    partitions: BTreeMap<EntityId, Vec<(EntityId, DVec3)>>,
}

impl NearbyObjectsSystem {
    /// Creates the system, invoked `frequency` times per simulated second.
    #[must_use]
    pub fn new(frequency: f64) -> Self {
        let frequency = if frequency.is_finite() && frequency > 0.0 {
            frequency
        } else {
            DEFAULT_SYSTEM_HZ
        };
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("nearby_objects"),
                ComponentMask::NEARBY_OBJECTS,
            )
            .with_frequency(frequency),
            frames: BTreeMap::new(),
            partitions: BTreeMap::new(),
        }
    }
}

impl Default for NearbyObjectsSystem {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_HZ)
    }
}

impl System for NearbyObjectsSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn pre_update(&mut self, ctx: &mut SystemContext<'_>, _elapsed_ms: f64) {
        let anchors: Vec<EntityId> = ctx
            .store()
            .entities_with(ComponentKind::NearbyObjects)
            .iter()
            .copied()
            .collect();
        for id in anchors {
            if let Some(nearby) = ctx.store_mut().component_mut::<NearbyObjects>(id) {
                nearby.objects.clear();
            }
        }

        self.frames.clear();
        self.partitions.clear();
        for id in positioned(ctx.store()) {
            if let Some(frame) = frames::resolve(ctx.store(), id) {
                self.frames.insert(id, frame);
                self.partitions
                    .entry(frame.system)
                    .or_default()
                    .push((id, frame.position));
            }
        }
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, _elapsed_ms: f64) {
        let Some(frame) = self.frames.get(&id) else {
            return;
        };
        let Some(members) = self.partitions.get(&frame.system) else {
            return;
        };

        let store = ctx.store_mut();
        for &(other, other_position) in members {
            if other == id || measured(store, id, other) || measured(store, other, id) {
                continue;
            }
            let distance = frame.position.distance(other_position);
            if let Some(nearby) = store.component_mut::<NearbyObjects>(id) {
                nearby.objects.insert(other, distance);
            }
            if let Some(nearby) = store.component_mut::<NearbyObjects>(other) {
                nearby.objects.insert(id, distance);
            }
        }
    }

    fn post_update(&mut self, _ctx: &mut SystemContext<'_>, _elapsed_ms: f64) {
        trace!(partitions = self.partitions.len(), "proximity rebuilt");
        self.frames.clear();
        self.partitions.clear();
    }
}

/// Every entity with a position or an orbit, ascending.
fn positioned(store: &EntityStore) -> BTreeSet<EntityId> {
    store
        .entities_with(ComponentKind::Position)
        .union(store.entities_with(ComponentKind::Satellite))
        .copied()
        .collect()
}

fn measured(store: &EntityStore, anchor: EntityId, other: EntityId) -> bool {
    store
        .component::<NearbyObjects>(anchor)
        .is_some_and(|nearby| nearby.objects.contains_key(&other))
}
