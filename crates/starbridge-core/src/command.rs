//! Console commands.
//!
//! Bridge consoles do not poke components directly; they send a
//! [`Command`], which is validated and applied between ticks through
//! [`World::apply`](crate::world::World::apply). Every variant names the
//! entity it acts on and fails with a [`CoreError`] rather than clamping
//! out-of-range input.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::components::{
    Battery, DamageType, Efficiency, Mass, Phasers, Position, Power, Reactor, ShipSystem,
    Targeting, Torpedo, Velocity,
};
use crate::entity::{ComponentKind, Components, EntityId};
use crate::error::{CoreError, Result};
use crate::notify::Notification;
use crate::store::EntityStore;
use crate::systems::targeting_system;

/// A state change requested by a console.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Set how many units a system asks for.
    SetPowerDraw {
        /// Consumer to adjust
        system: EntityId,
        /// Requested units
        units: u32,
    },
    /// Replace a reactor's output assignment.
    SetReactorAssignment {
        /// Reactor to reassign
        reactor: EntityId,
        /// One entry per unit, repeats allowed
        assignment: Vec<EntityId>,
    },
    /// Replace a battery's output assignment.
    SetBatteryAssignment {
        /// Battery to reassign
        battery: EntityId,
        /// One entry per unit, repeats allowed
        assignment: Vec<EntityId>,
    },
    /// Switch a battery between charging and discharging.
    SetBatteryDischarging {
        /// Battery to switch
        battery: EntityId,
        /// Whether it should supply power
        discharging: bool,
    },
    /// Pull or release a phaser trigger.
    SetPhaserFire {
        /// Phaser bank
        phasers: EntityId,
        /// Trigger level in `[0, 1]`
        fire_percent: f64,
    },
    /// Widen or narrow a phaser arc.
    SetPhaserArc {
        /// Phaser bank
        phasers: EntityId,
        /// Half-angle in degrees, in `[0, max_arc]`
        arc: f64,
    },
    /// Select a target on a ship's targeting system.
    SetTarget {
        /// Ship whose targeting system is set
        ship: EntityId,
        /// New target, `None` to clear
        target: Option<EntityId>,
    },
    /// Overwrite a system's efficiency.
    SetEfficiency {
        /// System to adjust
        system: EntityId,
        /// Efficiency in `[0, 1]`
        efficiency: f64,
    },
    /// Launch a torpedo from a launcher.
    FireTorpedo {
        /// Launcher installed on the firing ship
        launcher: EntityId,
        /// Target to pursue
        target: Option<EntityId>,
        /// Warhead chemistry
        #[serde(default)]
        damage_type: DamageType,
    },
}

/// What applying a [`Command`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// An existing component was updated.
    Applied,
    /// A new entity was created.
    Spawned(EntityId),
}

impl Command {
    /// Returns the entity this command acts on.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        match self {
            Self::SetPowerDraw { system, .. } | Self::SetEfficiency { system, .. } => *system,
            Self::SetReactorAssignment { reactor, .. } => *reactor,
            Self::SetBatteryAssignment { battery, .. }
            | Self::SetBatteryDischarging { battery, .. } => *battery,
            Self::SetPhaserFire { phasers, .. } | Self::SetPhaserArc { phasers, .. } => *phasers,
            Self::SetTarget { ship, .. } => *ship,
            Self::FireTorpedo { launcher, .. } => *launcher,
        }
    }

    /// Validates and applies the command to `store`.
    ///
    /// # Returns
    ///
    /// The outcome, and the notification the change should raise, if any.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EntityNotFound`] if the acted-on entity is missing
    /// - [`CoreError::MissingComponent`] if it lacks the component the
    ///   command changes
    /// - [`CoreError::OutOfRange`] for a value outside its documented range
    pub fn execute(self, store: &mut EntityStore) -> Result<(CommandOutcome, Option<Notification>)> {
        debug!(command = ?self, "applying command");
        match self {
            Self::SetPowerDraw { system, units } => {
                store.update_component::<Power, _>(system, |p| p.power_draw = units)?;
            }
            Self::SetReactorAssignment {
                reactor,
                assignment,
            } => {
                store.update_component::<Reactor, _>(reactor, |r| r.output_assignment = assignment)?;
            }
            Self::SetBatteryAssignment {
                battery,
                assignment,
            } => {
                store.update_component::<Battery, _>(battery, |b| b.output_assignment = assignment)?;
            }
            Self::SetBatteryDischarging {
                battery,
                discharging,
            } => {
                store.update_component::<Battery, _>(battery, |b| b.discharging = discharging)?;
            }
            Self::SetPhaserFire {
                phasers,
                fire_percent,
            } => {
                let fire_percent = CoreError::check_range("fire_percent", fire_percent, 0.0, 1.0)?;
                store.update_component::<Phasers, _>(phasers, |p| p.fire_percent = fire_percent)?;
            }
            Self::SetPhaserArc { phasers, arc } => {
                let max_arc = store
                    .component::<Phasers>(phasers)
                    .map(|p| p.max_arc)
                    .ok_or_else(|| missing(store, phasers, ComponentKind::Phasers))?;
                let arc = CoreError::check_range("arc", arc, 0.0, max_arc)?;
                store.update_component::<Phasers, _>(phasers, |p| p.arc = arc)?;
            }
            Self::SetTarget { ship, target } => {
                if !store.contains(ship) {
                    return Err(CoreError::EntityNotFound(ship));
                }
                let targeting = targeting_system(store, ship)
                    .ok_or(CoreError::missing(ship, ComponentKind::Targeting))?;
                store.update_component::<Targeting, _>(targeting, |t| t.target_id = target)?;
            }
            Self::SetEfficiency { system, efficiency } => {
                let efficiency = CoreError::check_range("efficiency", efficiency, 0.0, 1.0)?;
                store.update_component::<Efficiency, _>(system, |e| e.efficiency = efficiency)?;
            }
            Self::FireTorpedo {
                launcher,
                target,
                damage_type,
            } => return fire_torpedo(store, launcher, target, damage_type),
        }
        Ok((CommandOutcome::Applied, None))
    }
}

fn missing(store: &EntityStore, id: EntityId, kind: ComponentKind) -> CoreError {
    if store.contains(id) {
        CoreError::missing(id, kind)
    } else {
        CoreError::EntityNotFound(id)
    }
}

/// Spawns a torpedo at the firing ship's position, inheriting its velocity.
fn fire_torpedo(
    store: &mut EntityStore,
    launcher: EntityId,
    target: Option<EntityId>,
    damage_type: DamageType,
) -> Result<(CommandOutcome, Option<Notification>)> {
    let ship = store
        .component::<ShipSystem>(launcher)
        .map(|s| s.ship_id)
        .ok_or_else(|| missing(store, launcher, ComponentKind::ShipSystem))?;
    let position = *store
        .component::<Position>(ship)
        .ok_or_else(|| missing(store, ship, ComponentKind::Position))?;
    let velocity = store.component::<Velocity>(ship).copied().unwrap_or_default();

    let torpedo = Torpedo {
        damage_type,
        ..Torpedo::new(launcher, target)
    };
    let id = store.spawn(
        Components::new()
            .with(position)
            .with(velocity)
            .with(Mass::default())
            .with(torpedo),
    );
    debug!(torpedo = %id, launcher = %launcher, ship = %ship, "torpedo launched");

    Ok((
        CommandOutcome::Spawned(id),
        Some(Notification::TorpedoLaunched {
            torpedo: id,
            launcher,
            target,
        }),
    ))
}
