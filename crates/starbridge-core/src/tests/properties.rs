//! Invariants under generated inputs.

use glam::DVec3;
use proptest::prelude::*;

use crate::entity::components::{
    Battery, Components, Efficiency, NearbyObjects, PlanetarySystem, Position, Power, Reactor,
};
use crate::entity::EntityId;
use crate::store::EntityStore;
use crate::systems::{distribute_power, NearbyObjectsSystem, PowerEfficiencyOverloadSystem};
use crate::world::World;

/// A randomly wired ship: consumer draws, reactor (max, assignment) pairs
/// and battery (storage, assignment, discharging) triples. Assignment
/// entries are consumer indices.
#[derive(Debug, Clone)]
struct Wiring {
    draws: Vec<u32>,
    reactors: Vec<(u32, Vec<usize>)>,
    batteries: Vec<(f64, Vec<usize>, bool)>,
}

fn wiring() -> impl Strategy<Value = Wiring> {
    (1usize..5).prop_flat_map(|consumers| {
        (
            prop::collection::vec(0u32..8, consumers),
            prop::collection::vec(
                (0u32..10, prop::collection::vec(0..consumers, 0..15)),
                0..3,
            ),
            prop::collection::vec(
                (
                    0.0f64..20.0,
                    prop::collection::vec(0..consumers, 0..6),
                    any::<bool>(),
                ),
                0..3,
            ),
        )
            .prop_map(|(draws, reactors, batteries)| Wiring {
                draws,
                reactors,
                batteries,
            })
    })
}

struct Wired {
    store: EntityStore,
    members: Vec<EntityId>,
    consumers: Vec<EntityId>,
    reactors: Vec<EntityId>,
    batteries: Vec<EntityId>,
}

fn build(wiring: &Wiring) -> Wired {
    let mut store = EntityStore::new();
    let consumers: Vec<_> = wiring
        .draws
        .iter()
        .map(|&draw| {
            store.spawn(Components::new().with(Power {
                power_draw: draw,
                ..Power::default()
            }))
        })
        .collect();
    let reactors: Vec<_> = wiring
        .reactors
        .iter()
        .map(|(max_output, assignment)| {
            store.spawn(Components::new().with(Reactor {
                max_output: *max_output,
                output_assignment: assignment.iter().map(|&i| consumers[i]).collect(),
                ..Reactor::default()
            }))
        })
        .collect();
    let batteries: Vec<_> = wiring
        .batteries
        .iter()
        .map(|(storage, assignment, discharging)| {
            store.spawn(Components::new().with(Battery {
                capacity: 1000.0,
                storage: *storage,
                charge_rate: 3,
                discharge_rate: 4,
                output_assignment: assignment.iter().map(|&i| consumers[i]).collect(),
                discharging: *discharging,
                ..Battery::default()
            }))
        })
        .collect();

    let members = consumers
        .iter()
        .chain(&reactors)
        .chain(&batteries)
        .copied()
        .collect();
    Wired {
        store,
        members,
        consumers,
        reactors,
        batteries,
    }
}

proptest! {
    #[test]
    fn power_is_conserved(wiring in wiring(), hours in 0.0f64..2.0) {
        let mut wired = build(&wiring);
        distribute_power(&mut wired.store, &wired.members, hours);
        let store = &wired.store;

        let mut delivered = 0u32;
        for &id in &wired.consumers {
            let power = store.component::<Power>(id).unwrap();
            prop_assert!(power.current_power <= power.power_draw);
            prop_assert_eq!(power.power_sources.len(), power.current_power as usize);
            delivered += power.current_power;
        }

        let mut produced = 0u32;
        for &id in &wired.reactors {
            let reactor = store.component::<Reactor>(id).unwrap();
            prop_assert!(reactor.current_output <= reactor.max_output);
            produced += reactor.current_output;
        }

        let mut discharged = 0u32;
        for &id in &wired.batteries {
            let battery = store.component::<Battery>(id).unwrap();
            prop_assert!(battery.storage >= 0.0);
            prop_assert!(battery.storage <= battery.capacity);
            prop_assert!(battery.output_amount <= battery.discharge_rate);
            // Batteries are not charged here: nothing assigns reactor
            // output to them.
            prop_assert_eq!(battery.charge_amount, 0);
            discharged += battery.output_amount;
        }

        prop_assert_eq!(delivered, produced + discharged);
    }

    #[test]
    fn efficiency_stays_in_unit_interval(
        loads in prop::collection::vec((0u32..50, 0u32..20, 0.0f64..2.0, 0.0f64..1.0), 1..6),
        ticks in 1usize..20,
        seed in any::<u64>(),
    ) {
        let mut world = World::new(seed);
        world.add_system(Box::new(PowerEfficiencyOverloadSystem::new()));
        let ids: Vec<_> = loads
            .iter()
            .map(|&(current, max_safe, multiplier, entropy)| {
                world.spawn(
                    Components::new()
                        .with(Power {
                            current_power: current,
                            max_safe_power: max_safe,
                            ..Power::default()
                        })
                        .with(Efficiency {
                            efficiency: 1.0,
                            multiplier,
                            entropy_multiplier: entropy,
                        }),
                )
            })
            .collect();

        let mut previous: Vec<f64> = vec![1.0; ids.len()];
        for _ in 0..ticks {
            world.update(250.0);
            for (slot, id) in ids.iter().enumerate() {
                let value = world.store().component::<Efficiency>(*id).unwrap().efficiency;
                prop_assert!((0.0..=1.0).contains(&value));
                prop_assert!(value <= previous[slot]);
                previous[slot] = value;
            }
        }
    }

    #[test]
    fn nearby_maps_are_symmetric(
        points in prop::collection::vec((-1000.0f64..1000.0, -1000.0f64..1000.0, -1000.0f64..1000.0), 2..8),
    ) {
        let mut world = World::new(0);
        world.add_system(Box::new(NearbyObjectsSystem::default()));
        let system = world.spawn(Components::new().with(PlanetarySystem { name: "Sol".into() }));
        let ids: Vec<_> = points
            .iter()
            .map(|&(x, y, z)| {
                world.spawn(
                    Components::new()
                        .with(Position::in_frame(DVec3::new(x, y, z), system))
                        .with(NearbyObjects::default()),
                )
            })
            .collect();

        world.update(200.0);

        let store = world.store();
        for &a in &ids {
            let near_a = &store.component::<NearbyObjects>(a).unwrap().objects;
            prop_assert_eq!(near_a.len(), ids.len() - 1);
            for &b in &ids {
                if a == b {
                    continue;
                }
                let near_b = &store.component::<NearbyObjects>(b).unwrap().objects;
                prop_assert_eq!(near_a.get(&b), near_b.get(&a));
            }
        }
    }
}
