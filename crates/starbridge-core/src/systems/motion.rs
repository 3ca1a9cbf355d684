//! Kinematic integration.

use crate::entity::components::{Position, Velocity};
use crate::entity::{ComponentKind, ComponentMask, Entity, EntityId};
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

use super::MS_PER_SECOND;

/// Advances `Position` by `Velocity` (explicit Euler).
///
/// Orbiting bodies are placed by their orbital elements and are skipped.
#[derive(Debug)]
pub struct MotionSystem {
    declaration: SystemDeclaration,
}

impl MotionSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("motion"),
                ComponentMask::POSITION | ComponentMask::VELOCITY,
            ),
        }
    }
}

impl Default for MotionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MotionSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn test(&self, entity: &Entity) -> bool {
        entity.mask().contains(self.declaration.requires) && !entity.has(ComponentKind::Satellite)
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, elapsed_ms: f64) {
        let Some(velocity) = ctx.store().component::<Velocity>(id).map(|v| v.linear) else {
            return;
        };
        if let Some(position) = ctx.store_mut().component_mut::<Position>(id) {
            position.coords += velocity * (elapsed_ms / MS_PER_SECOND);
        }
    }
}
