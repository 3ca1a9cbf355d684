//! Physics-engine placement.
//!
//! An external rigid-body engine simulates at a coarser scale than the
//! bridge and in fixed-size sectors. This system publishes each entity's
//! scaled location and decides which entities the engine should simulate:
//! the lowest-id entity in each (planetary system, sector) cell is enabled
//! and the others in that cell are disabled.

use std::collections::BTreeSet;

use helm::SectorKey;
use tracing::debug;

use crate::config::PhysicsWorldConfig;
use crate::entity::components::PhysicsWorld;
use crate::entity::{ComponentKind, ComponentMask, Entity, EntityId};
use crate::frames;
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

/// Maps entities into physics-engine coordinates and sectors.
#[derive(Debug)]
pub struct PhysicsWorldPositionSystem {
    declaration: SystemDeclaration,
    config: PhysicsWorldConfig,
    placed: Vec<(EntityId, EntityId, SectorKey)>,
}

impl PhysicsWorldPositionSystem {
    /// Creates the system with the given scale and sector size.
    #[must_use]
    pub fn new(config: PhysicsWorldConfig) -> Self {
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("physics_world_position"),
                ComponentMask::PHYSICS_WORLD,
            ),
            config,
            placed: Vec::new(),
        }
    }
}

impl Default for PhysicsWorldPositionSystem {
    fn default() -> Self {
        Self::new(PhysicsWorldConfig::default())
    }
}

impl System for PhysicsWorldPositionSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn test(&self, entity: &Entity) -> bool {
        entity.has(ComponentKind::PhysicsWorld)
            && (entity.has(ComponentKind::Position) || entity.has(ComponentKind::Satellite))
    }

    fn pre_update(&mut self, _ctx: &mut SystemContext<'_>, _elapsed_ms: f64) {
        self.placed.clear();
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, _elapsed_ms: f64) {
        let frame = frames::resolve(ctx.store(), id);
        let Some(physics) = ctx.store_mut().component_mut::<PhysicsWorld>(id) else {
            return;
        };
        let Some(frame) = frame else {
            physics.enabled = false;
            return;
        };

        physics.location = frame.position / self.config.scale;
        let sector = SectorKey::from_location(physics.location, self.config.sector_size);
        self.placed.push((id, frame.system, sector));
    }

    fn post_update(&mut self, ctx: &mut SystemContext<'_>, _elapsed_ms: f64) {
        let mut occupied = BTreeSet::new();
        let mut enabled = 0usize;
        for &(id, system, sector) in &self.placed {
            let first = occupied.insert((system, sector));
            if let Some(physics) = ctx.store_mut().component_mut::<PhysicsWorld>(id) {
                physics.enabled = first;
            }
            enabled += usize::from(first);
        }
        debug!(placed = self.placed.len(), enabled, "physics placement");
    }
}
