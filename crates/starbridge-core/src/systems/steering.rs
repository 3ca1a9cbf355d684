//! Ship AI steering.

use glam::{DQuat, DVec3};
use helm::steering;

use crate::entity::components::{Behavior, BehaviorKind, Position, Rotation, Velocity};
use crate::entity::{ComponentMask, EntityId};
use crate::frames;
use crate::store::EntityStore;
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

use super::MS_PER_SECOND;

/// Turns each entity's [`Behavior`] into a velocity change.
///
/// The behavior yields a desired direction which is scaled to `max_speed`.
/// The difference from the current velocity, capped at `max_force` and
/// applied over the elapsed time, is added to the velocity, and the result
/// is capped at `max_speed`. A behavior whose target is missing or in
/// another frame leaves the velocity untouched for that tick.
#[derive(Debug)]
pub struct SteeringBehaviorSystem {
    declaration: SystemDeclaration,
}

impl SteeringBehaviorSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("steering_behavior"),
                ComponentMask::BEHAVIOR | ComponentMask::POSITION | ComponentMask::VELOCITY,
            ),
        }
    }
}

impl Default for SteeringBehaviorSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for SteeringBehaviorSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, elapsed_ms: f64) {
        let dt = elapsed_ms / MS_PER_SECOND;
        let Some(mut behavior) = ctx.store().component::<Behavior>(id).copied() else {
            return;
        };
        let Some(velocity) = ctx.store().component::<Velocity>(id).map(|v| v.linear) else {
            return;
        };

        let direction = if matches!(behavior.kind, BehaviorKind::Wander) {
            let forward = velocity.try_normalize().unwrap_or_else(|| {
                ctx.store()
                    .component::<Rotation>(id)
                    .map_or(DQuat::IDENTITY, |r| r.orientation)
                    * DVec3::Z
            });
            let direction =
                steering::wander(forward, &mut behavior.wander, &behavior.wander_params, ctx.rng());
            if let Some(stored) = ctx.store_mut().component_mut::<Behavior>(id) {
                stored.wander = behavior.wander;
            }
            Some(direction)
        } else {
            desired_direction(ctx.store(), id, &behavior)
        };
        let Some(direction) = direction else {
            return;
        };

        let max_speed = behavior.max_speed.max(0.0);
        let force = steering::steering_force(direction * max_speed, velocity, behavior.max_force);
        let steered = (velocity + force * dt).clamp_length_max(max_speed);

        if let Some(v) = ctx.store_mut().component_mut::<Velocity>(id) {
            v.linear = steered;
        }
    }
}

/// Desired heading for every deterministic behavior.
fn desired_direction(store: &EntityStore, id: EntityId, behavior: &Behavior) -> Option<DVec3> {
    let target_velocity = |target| {
        store
            .component::<Velocity>(target)
            .map_or(DVec3::ZERO, |v| v.linear)
    };

    match behavior.kind {
        BehaviorKind::Hold | BehaviorKind::Wander => None,
        BehaviorKind::Seek { target } => {
            let (position, target) = frames::relative_positions(store, id, target)?;
            Some(steering::seek(position, target))
        }
        BehaviorKind::Flee { target } => {
            let (position, target) = frames::relative_positions(store, id, target)?;
            Some(steering::flee(position, target))
        }
        BehaviorKind::Pursue { target } => {
            let (position, target_position) = frames::relative_positions(store, id, target)?;
            let t = steering::intercept_time(position, target_position, behavior.max_speed);
            Some(steering::pursue(
                position,
                target_position,
                target_velocity(target),
                t,
            ))
        }
        BehaviorKind::Evade { target } => {
            let (position, target_position) = frames::relative_positions(store, id, target)?;
            let t = steering::intercept_time(position, target_position, behavior.max_speed);
            Some(steering::evade(
                position,
                target_position,
                target_velocity(target),
                t,
            ))
        }
        BehaviorKind::Arrive {
            destination,
            slowing_radius,
        } => {
            let position = store.component::<Position>(id)?.coords;
            Some(steering::arrival(position, destination, slowing_radius))
        }
    }
}
