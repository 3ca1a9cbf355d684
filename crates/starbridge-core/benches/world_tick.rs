use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::DVec3;
use starbridge_core::entity::components::{
    Behavior, BehaviorKind, Efficiency, Hull, NearbyObjects, PhysicsWorld, PlanetarySystem,
    Position, Power, Reactor, ShipSystem, ShipSystems, Velocity,
};
use starbridge_core::{Components, Flights, World, WorldConfig};

/// A system with `ships` small ships spread along X, each with a reactor
/// feeding two consumers and a wandering helm.
fn fleet(seed: u64, ships: usize) -> World {
    let mut world = World::from_config(&WorldConfig::with_seed(seed)).expect("valid config");
    let sol = world.spawn(Components::new().with(PlanetarySystem {
        name: "Sol".into(),
    }));

    for i in 0..ships {
        let ship = world.spawn(
            Components::new()
                .with(Position::in_frame(DVec3::new(i as f64 * 50.0, 0.0, 0.0), sol))
                .with(Velocity::default())
                .with(Hull::new(100.0))
                .with(NearbyObjects::default())
                .with(PhysicsWorld::default())
                .with(Behavior::new(BehaviorKind::Wander, 20.0, 5.0)),
        );
        let consumers: Vec<_> = (0..2)
            .map(|_| {
                world.spawn(
                    Components::new()
                        .with(ShipSystem { ship_id: ship })
                        .with(Power {
                            power_draw: 3,
                            max_safe_power: 4,
                            ..Power::default()
                        })
                        .with(Efficiency {
                            entropy_multiplier: 0.001,
                            ..Efficiency::default()
                        }),
                )
            })
            .collect();
        let reactor = world.spawn(
            Components::new()
                .with(ShipSystem { ship_id: ship })
                .with(Reactor {
                    max_output: 6,
                    output_assignment: consumers
                        .iter()
                        .flat_map(|&id| [id, id, id])
                        .collect(),
                    ..Reactor::default()
                }),
        );
        let mut members = consumers;
        members.push(reactor);
        world
            .add_component(ship, ShipSystems::from_ids(members))
            .expect("ship exists");
    }
    world
}

fn bench_world_tick(c: &mut Criterion) {
    let mut world = fleet(1, 50);
    c.bench_function("world_tick_50_ships", |b| {
        b.iter(|| world.update(black_box(200.0)));
    });
}

fn bench_world_tick_larger(c: &mut Criterion) {
    // Proximity is quadratic per system; this is the stress case.
    let mut world = fleet(1, 200);
    c.bench_function("world_tick_200_ships", |b| {
        b.iter(|| world.update(black_box(200.0)));
    });
}

fn bench_parallel_flights(c: &mut Criterion) {
    let mut flights = Flights::new();
    for seed in 0..8 {
        flights.add(format!("flight-{seed}"), fleet(seed, 25));
    }
    c.bench_function("flights_8x25_ships", |b| {
        b.iter(|| flights.update_all(black_box(200.0)));
    });
}

criterion_group!(benches, bench_world_tick, bench_world_tick_larger, bench_parallel_flights);
criterion_main!(benches);
