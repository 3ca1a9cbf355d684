//! Torpedo guidance.

use glam::DVec3;
use helm::steering;

use crate::entity::components::{Mass, Torpedo, Velocity, EPSILON};
use crate::entity::{ComponentMask, EntityId};
use crate::frames;
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

use super::MS_PER_SECOND;

/// Kilonewtons to newtons.
const KN_TO_N: f64 = 1000.0;

/// Steers torpedoes toward the predicted position of their target.
///
/// Only velocity is changed here; positions are advanced by the
/// [`MotionSystem`](super::MotionSystem) later in the tick. A torpedo whose
/// target is gone or unreachable keeps its velocity and coasts.
#[derive(Debug)]
pub struct TorpedoMovementSystem {
    declaration: SystemDeclaration,
}

impl TorpedoMovementSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("torpedo_movement"),
                ComponentMask::TORPEDO | ComponentMask::POSITION | ComponentMask::VELOCITY,
            ),
        }
    }
}

impl Default for TorpedoMovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TorpedoMovementSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, elapsed_ms: f64) {
        let dt = elapsed_ms / MS_PER_SECOND;
        let store = ctx.store();
        let Some(torpedo) = store.component::<Torpedo>(id).copied() else {
            return;
        };
        let Some(mut velocity) = store.component::<Velocity>(id).map(|v| v.linear) else {
            return;
        };
        let mass = store
            .component::<Mass>(id)
            .map_or(1.0, |m| m.mass)
            .max(EPSILON);

        let guidance = torpedo.target_id.and_then(|target| {
            let (position, target_position) = frames::relative_positions(store, id, target)?;
            let target_velocity = store
                .component::<Velocity>(target)
                .map_or(DVec3::ZERO, |v| v.linear);
            Some((position, target_position, target_velocity))
        });

        if let Some((position, target_position, target_velocity)) = guidance {
            let t = steering::intercept_time(position, target_position, torpedo.speed);
            let desired =
                steering::pursue(position, target_position, target_velocity, t) * torpedo.speed;
            let acceleration = torpedo.max_force * KN_TO_N / mass;
            velocity += (desired - velocity).normalize_or_zero() * acceleration * dt;
        }

        let store = ctx.store_mut();
        if let Some(v) = store.component_mut::<Velocity>(id) {
            v.linear = velocity;
        }
        if let Some(torpedo) = store.component_mut::<Torpedo>(id) {
            torpedo.distance_traveled += velocity.length() * dt;
        }
    }
}
