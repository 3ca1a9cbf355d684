//! Reactor → battery → consumer power flow.
//!
//! Power moves in whole units. Every tick each ship's assignment lists are
//! copied into per-target stacks and consumed by popping from the end, so
//! for a given target the most recently pushed supplier is drawn first.
//! Reactors are pushed in ascending id order, which makes the highest-id
//! reactor the first to be drawn on when several feed the same target.
//!
//! The component lists themselves are never modified; demand is rebuilt
//! every tick.

use std::collections::BTreeMap;

use tracing::trace;

use crate::entity::components::{Battery, Power, Reactor, ShipSystems, EPSILON};
use crate::entity::{ComponentKind, ComponentMask, EntityId};
use crate::notify::Notification;
use crate::store::EntityStore;
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

use super::MS_PER_HOUR;

/// Supplier stacks keyed by the id they supply.
type Stacks = BTreeMap<EntityId, Vec<EntityId>>;

/// Distributes power across every ship's installed systems.
#[derive(Debug)]
pub struct PowerDistributionSystem {
    declaration: SystemDeclaration,
}

impl PowerDistributionSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("power_distribution"),
                ComponentMask::SHIP_SYSTEMS,
            ),
        }
    }
}

impl Default for PowerDistributionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PowerDistributionSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, ship: EntityId, elapsed_ms: f64) {
        let Some(members) = ctx.store().component::<ShipSystems>(ship) else {
            return;
        };
        let members: Vec<EntityId> = members.systems.keys().copied().collect();

        let changed = distribute_power(ctx.store_mut(), &members, elapsed_ms / MS_PER_HOUR);
        for (reactor, output) in changed {
            ctx.notify(&Notification::ReactorOutputChanged {
                reactor,
                ship,
                output,
            });
        }
    }
}

/// Runs one tick of power flow over `members`.
///
/// Members are split into reactors, batteries and consumers (anything else
/// with [`Power`]). Ids that no longer exist are skipped.
///
/// # Returns
///
/// Reactors whose `current_output` changed, with the new value.
pub fn distribute_power(
    store: &mut EntityStore,
    members: &[EntityId],
    elapsed_hours: f64,
) -> Vec<(EntityId, u32)> {
    let mut reactors = Vec::new();
    let mut batteries = Vec::new();
    let mut consumers = Vec::new();
    for &id in members {
        let Some(entity) = store.get(id) else {
            continue;
        };
        if entity.has(ComponentKind::Reactor) {
            reactors.push(id);
        } else if entity.has(ComponentKind::Battery) {
            batteries.push(id);
        } else if entity.has(ComponentKind::Power) {
            consumers.push(id);
        }
    }

    let mut reactor_stacks = Stacks::new();
    for &id in &reactors {
        if let Some(reactor) = store.component::<Reactor>(id) {
            for &target in reactor.honored_assignment() {
                reactor_stacks.entry(target).or_default().push(id);
            }
        }
    }

    // Units popped per supplier this tick
    let mut drawn: BTreeMap<EntityId, u32> = BTreeMap::new();
    let mut battery_stacks = Stacks::new();

    for &id in &batteries {
        let Some(battery) = store.component_mut::<Battery>(id) else {
            continue;
        };
        battery.charge_amount = 0;
        battery.output_amount = 0;

        let mut popped = 0;
        if let Some(stack) = reactor_stacks.get_mut(&id) {
            while popped < battery.charge_rate {
                let Some(reactor) = stack.pop() else {
                    break;
                };
                *drawn.entry(reactor).or_default() += 1;
                popped += 1;
            }
        }

        battery.charge_amount = if battery.is_full() { 0 } else { popped };
        battery.storage = (battery.storage + f64::from(battery.charge_amount) * elapsed_hours)
            .clamp(0.0, battery.capacity.max(0.0));

        if battery.discharging {
            let offered = discharge_capacity(battery, elapsed_hours);
            for &target in battery.output_assignment.iter().take(offered) {
                battery_stacks.entry(target).or_default().push(id);
            }
        }
    }

    for &id in &consumers {
        let Some(power) = store.component_mut::<Power>(id) else {
            continue;
        };
        power.power_sources.clear();
        let mut supplied = 0;
        while supplied < power.power_draw {
            let source = pop(&mut reactor_stacks, id).or_else(|| pop(&mut battery_stacks, id));
            let Some(source) = source else {
                break;
            };
            *drawn.entry(source).or_default() += 1;
            power.power_sources.push(source);
            supplied += 1;
        }
        power.current_power = supplied;
        trace!(system = %id, draw = power.power_draw, supplied, "power delivered");
    }

    let mut changed = Vec::new();
    for &id in &reactors {
        let output = drawn.get(&id).copied().unwrap_or(0);
        if let Some(reactor) = store.component_mut::<Reactor>(id) {
            if reactor.current_output != output {
                reactor.current_output = output;
                changed.push((id, output));
            }
        }
    }

    for &id in &batteries {
        let output = drawn.get(&id).copied().unwrap_or(0);
        if let Some(battery) = store.component_mut::<Battery>(id) {
            battery.output_amount = output;
            battery.storage = (battery.storage - f64::from(output) * elapsed_hours).max(0.0);
        }
    }

    changed
}

fn pop(stacks: &mut Stacks, target: EntityId) -> Option<EntityId> {
    stacks.get_mut(&target).and_then(Vec::pop)
}

/// Assignment entries a discharging battery can back this tick.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn discharge_capacity(battery: &Battery, elapsed_hours: f64) -> usize {
    let affordable = (battery.storage.max(0.0) / elapsed_hours.max(EPSILON)).floor() as usize;
    let rate = usize::try_from(battery.discharge_rate).unwrap_or(usize::MAX);
    rate.min(affordable)
}
