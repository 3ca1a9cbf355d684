//! Phaser fire control.
//!
//! A powered phaser bank with a non-zero trigger converts the energy it
//! received since its last invocation into hull damage on the ship's
//! selected target, provided the target sits inside the firing cone.
//! Widening the arc trades range for coverage.

use glam::{DQuat, DVec3};
use helm::Cone;
use tracing::debug;

use crate::config::DEFAULT_SYSTEM_HZ;
use crate::entity::components::{
    Efficiency, Hull, Phasers, Power, Rotation, ShipSystem, Targeting, EPSILON,
};
use crate::entity::{ComponentKind, ComponentMask, EntityId};
use crate::frames;
use crate::notify::Notification;
use crate::store::EntityStore;
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

/// Gigajoules per megawatt-hour.
pub const MWH_TO_GJ: f64 = 3.6;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Fires phaser banks at their ship's target.
#[derive(Debug)]
pub struct PhasersSystem {
    declaration: SystemDeclaration,
    frequency: f64,
}

impl PhasersSystem {
    /// Creates the system, invoked `frequency` times per simulated second.
    ///
    /// A non-positive or non-finite `frequency` falls back to
    /// [`DEFAULT_SYSTEM_HZ`].
    #[must_use]
    pub fn new(frequency: f64) -> Self {
        let frequency = if frequency.is_finite() && frequency > 0.0 {
            frequency
        } else {
            DEFAULT_SYSTEM_HZ
        };
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("phasers"),
                ComponentMask::PHASERS | ComponentMask::POWER,
            )
            .with_frequency(frequency),
            frequency,
        }
    }

    /// Hours of firing credited to one invocation.
    ///
    /// Elapsed time is measured in invocation intervals and each interval
    /// is credited one second of fire.
    fn elapsed_hours(&self, elapsed_ms: f64) -> f64 {
        elapsed_ms / (1000.0 / self.frequency) / SECONDS_PER_HOUR
    }
}

impl Default for PhasersSystem {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_HZ)
    }
}

impl System for PhasersSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, elapsed_ms: f64) {
        let Some(current_power) = ctx.store().component::<Power>(id).map(|p| p.current_power)
        else {
            return;
        };
        let ship = ctx.store().component::<ShipSystem>(id).map(|s| s.ship_id);

        if current_power == 0 {
            let Some(phasers) = ctx.store_mut().component_mut::<Phasers>(id) else {
                return;
            };
            if phasers.fire_percent > 0.0 {
                phasers.fire_percent = 0.0;
                debug!(phasers = %id, "phasers lost power");
                ctx.notify(&Notification::PhasersStopped { phasers: id, ship });
            }
            return;
        }

        let Some(phasers) = ctx.store().component::<Phasers>(id).copied() else {
            return;
        };
        if phasers.fire_percent <= 0.0 {
            return;
        }
        let Some(ship) = ship else {
            return;
        };
        let Some(target) = targeting_system(ctx.store(), ship)
            .and_then(|targeting| ctx.store().component::<Targeting>(targeting))
            .and_then(|targeting| targeting.target_id)
        else {
            return;
        };
        if !target_in_phaser_range(ctx.store(), ship, target, &phasers) {
            return;
        }

        let efficiency = ctx
            .store()
            .component::<Efficiency>(id)
            .map_or(1.0, |e| e.efficiency);
        let energy_mwh = f64::from(current_power) * efficiency * self.elapsed_hours(elapsed_ms);
        apply_damage(ctx, target, energy_mwh * MWH_TO_GJ, ship);
    }
}

/// The targeting system installed on `ship`, if any.
///
/// Picks the lowest id when several are installed.
#[must_use]
pub fn targeting_system(store: &EntityStore, ship: EntityId) -> Option<EntityId> {
    store
        .entities_with(ComponentKind::Targeting)
        .iter()
        .copied()
        .find(|&id| store.component::<ShipSystem>(id).is_some_and(|s| s.ship_id == ship))
}

/// Effective range of `phasers` at its current arc.
///
/// `max_range - max_range * arc / (max_arc + 1)`: the narrowest arc reaches
/// furthest.
#[must_use]
pub fn phaser_range(phasers: &Phasers) -> f64 {
    let spread = phasers.arc / (phasers.max_arc + 1.0).max(EPSILON);
    (phasers.max_range - phasers.max_range * spread).max(0.0)
}

/// Whether `target` lies in the firing cone of a bank mounted on `ship`.
///
/// The cone's apex is the ship, its axis the ship's forward (+Z) rotated by
/// the ship orientation, then by the bank's heading (yaw) and pitch. Its
/// half-angle is the bank's arc. Ships and targets with no common frame are
/// never in range.
#[must_use]
pub fn target_in_phaser_range(
    store: &EntityStore,
    ship: EntityId,
    target: EntityId,
    phasers: &Phasers,
) -> bool {
    let Some((origin, target_position)) = frames::relative_positions(store, ship, target) else {
        return false;
    };
    let orientation = store
        .component::<Rotation>(ship)
        .map_or(DQuat::IDENTITY, |r| r.orientation);
    let direction = orientation
        * DQuat::from_rotation_y(phasers.heading_degree.to_radians())
        * DQuat::from_rotation_x(-phasers.pitch_degree.to_radians())
        * DVec3::Z;

    Cone::new(origin, direction, phaser_range(phasers), phasers.arc.to_radians())
        .contains(target_position)
}

fn apply_damage(ctx: &mut SystemContext<'_>, target: EntityId, damage_gj: f64, attacker: EntityId) {
    let Some(hull) = ctx.store_mut().component_mut::<Hull>(target) else {
        return;
    };
    if hull.destroyed {
        return;
    }
    hull.integrity = (hull.integrity - damage_gj).max(0.0);
    if hull.integrity <= 0.0 {
        hull.destroyed = true;
        debug!(target = %target, attacker = %attacker, "hull destroyed");
        ctx.notify(&Notification::HullDestroyed {
            entity: target,
            attacker: Some(attacker),
        });
    }
}
