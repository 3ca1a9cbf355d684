//! Scenario builders for crate-level tests.

use glam::DVec3;

use crate::command::Command;
use crate::config::WorldConfig;
use crate::entity::components::{
    Battery, Efficiency, Hull, NearbyObjects, Phasers, PhysicsWorld, PlanetarySystem, Position,
    Power, Reactor, Rotation, ShipSystem, ShipSystems, Targeting, Velocity,
};
use crate::entity::{Components, EntityId};
use crate::world::World;

// =============================================================================
// Scenario Setup
// =============================================================================

/// Every entity making up one bridge ship.
#[derive(Debug, Clone, Copy)]
pub struct BridgeShip {
    /// The hull itself.
    pub ship: EntityId,
    /// Main reactor, 1000 units, unassigned.
    pub reactor: EntityId,
    /// Backup battery, full, idle.
    pub battery: EntityId,
    /// Forward phaser bank.
    pub phasers: EntityId,
    /// Targeting computer.
    pub targeting: EntityId,
    /// Torpedo launcher.
    pub launcher: EntityId,
    /// Impulse engines.
    pub engines: EntityId,
}

/// World running the standard battery.
pub fn standard_world(seed: u64) -> World {
    World::from_config(&WorldConfig::with_seed(seed)).unwrap()
}

/// Spawns a planetary system.
pub fn spawn_system(world: &mut World, name: &str) -> EntityId {
    world.spawn(Components::new().with(PlanetarySystem { name: name.into() }))
}

fn installed(ship: EntityId) -> Components {
    Components::new().with(ShipSystem { ship_id: ship })
}

fn consumer(max_safe_power: u32) -> Power {
    Power {
        max_safe_power,
        ..Power::default()
    }
}

/// Spawns a fully fitted ship at `coords` in `system`, facing +Z.
///
/// Nothing is powered: the reactor has no assignment and the battery is
/// not discharging.
pub fn spawn_bridge_ship(world: &mut World, system: EntityId, coords: DVec3) -> BridgeShip {
    let ship = world.spawn(
        Components::new()
            .with(Position::in_frame(coords, system))
            .with(Velocity::default())
            .with(Rotation::default())
            .with(Hull::new(1000.0))
            .with(NearbyObjects::default())
            .with(PhysicsWorld::default()),
    );
    let reactor = world.spawn(installed(ship).with(Reactor {
        max_output: 1000,
        ..Reactor::default()
    }));
    let battery = world.spawn(installed(ship).with(Battery {
        capacity: 50.0,
        storage: 50.0,
        charge_rate: 2,
        discharge_rate: 5,
        ..Battery::default()
    }));
    let phasers = world.spawn(
        installed(ship)
            .with(Phasers::default())
            .with(consumer(1000))
            .with(Efficiency::default()),
    );
    let targeting = world.spawn(installed(ship).with(Targeting::default()));
    let launcher = world.spawn(installed(ship).with(consumer(10)));
    let engines = world.spawn(
        installed(ship)
            .with(consumer(10))
            .with(Efficiency::default()),
    );

    world
        .add_component(
            ship,
            ShipSystems::from_ids([reactor, battery, phasers, targeting, launcher, engines]),
        )
        .unwrap();

    BridgeShip {
        ship,
        reactor,
        battery,
        phasers,
        targeting,
        launcher,
        engines,
    }
}

/// Spawns an unarmed hulk at `coords` in `system`.
pub fn spawn_target(world: &mut World, system: EntityId, coords: DVec3, integrity: f64) -> EntityId {
    world.spawn(
        Components::new()
            .with(Position::in_frame(coords, system))
            .with(Velocity::default())
            .with(Hull::new(integrity))
            .with(NearbyObjects::default())
            .with(PhysicsWorld::default()),
    )
}

/// Routes `units` of reactor output to the phasers, selects `target` and
/// pulls the trigger.
pub fn arm_phasers(world: &mut World, ship: &BridgeShip, target: EntityId, units: u32) {
    let commands = [
        Command::SetPowerDraw {
            system: ship.phasers,
            units,
        },
        Command::SetReactorAssignment {
            reactor: ship.reactor,
            assignment: vec![ship.phasers; units as usize],
        },
        Command::SetTarget {
            ship: ship.ship,
            target: Some(target),
        },
        Command::SetPhaserFire {
            phasers: ship.phasers,
            fire_percent: 1.0,
        },
    ];
    for command in commands {
        world.apply(command).unwrap();
    }
}

// =============================================================================
// State Queries
// =============================================================================

/// Remaining hull integrity.
pub fn integrity(world: &World, id: EntityId) -> f64 {
    world.store().component::<Hull>(id).unwrap().integrity
}

/// Units delivered this tick.
pub fn current_power(world: &World, id: EntityId) -> u32 {
    world.store().component::<Power>(id).unwrap().current_power
}

/// System-relative distance between two entities.
pub fn distance(world: &World, a: EntityId, b: EntityId) -> f64 {
    let (pa, pb) = crate::frames::relative_positions(world.store(), a, b).unwrap();
    pa.distance(pb)
}
