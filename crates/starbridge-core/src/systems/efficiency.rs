//! Efficiency wear from overload and entropy.

use rand::Rng;

use crate::entity::components::{Efficiency, Power, EPSILON};
use crate::entity::{ComponentMask, EntityId};
use crate::system::{System, SystemContext, SystemDeclaration, SystemId};

use super::MS_PER_SECOND;

/// Degrades `Efficiency` on every powered system.
///
/// Each invocation draws exactly one value from the world RNG per eligible
/// entity, whether or not its entropy multiplier is zero, so the draw
/// sequence depends only on which entities exist.
#[derive(Debug)]
pub struct PowerEfficiencyOverloadSystem {
    declaration: SystemDeclaration,
}

impl PowerEfficiencyOverloadSystem {
    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            declaration: SystemDeclaration::new(
                SystemId::new("power_efficiency_overload"),
                ComponentMask::POWER | ComponentMask::EFFICIENCY,
            ),
        }
    }
}

impl Default for PowerEfficiencyOverloadSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for PowerEfficiencyOverloadSystem {
    fn declaration(&self) -> &SystemDeclaration {
        &self.declaration
    }

    fn update(&mut self, ctx: &mut SystemContext<'_>, id: EntityId, elapsed_ms: f64) {
        let roll = ctx.rng().gen::<f64>().abs();

        let Some(power) = ctx.store().component::<Power>(id) else {
            return;
        };
        let overload = overload_percent(power.current_power, power.max_safe_power);

        let Some(efficiency) = ctx.store_mut().component_mut::<Efficiency>(id) else {
            return;
        };
        let entropy = roll * efficiency.entropy_multiplier;
        let wear = (overload * efficiency.multiplier + entropy).max(0.0);
        efficiency.efficiency =
            (efficiency.efficiency - wear * elapsed_ms / MS_PER_SECOND).clamp(0.0, 1.0);
    }
}

/// Fraction by which `current` exceeds `max_safe`, or zero when within
/// limits. A zero `max_safe` is treated as a tiny positive limit.
#[must_use]
pub fn overload_percent(current: u32, max_safe: u32) -> f64 {
    let max_safe = f64::from(max_safe).max(EPSILON);
    ((f64::from(current) - max_safe) / max_safe).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::components::Components;
    use crate::world::World;

    fn powered(current: u32, max_safe: u32, efficiency: Efficiency) -> Components {
        Components::new()
            .with(Power {
                current_power: current,
                max_safe_power: max_safe,
                ..Power::default()
            })
            .with(efficiency)
    }

    fn world() -> World {
        let mut world = World::new(7);
        world.add_system(Box::new(PowerEfficiencyOverloadSystem::new()));
        world
    }

    fn efficiency(world: &World, id: EntityId) -> f64 {
        world.store().component::<Efficiency>(id).unwrap().efficiency
    }

    #[test]
    fn overload_fraction() {
        assert!((overload_percent(15, 10) - 0.5).abs() < 1e-12);
        assert_eq!(overload_percent(10, 10), 0.0);
        assert_eq!(overload_percent(3, 10), 0.0);
        assert_eq!(overload_percent(0, 0), 0.0);
        assert!(overload_percent(1, 0) > 1.0);
    }

    #[test]
    fn overload_wears_efficiency() {
        let mut world = world();
        let id = world.spawn(powered(15, 10, Efficiency::default()));

        world.update(1000.0);

        assert!((efficiency(&world, id) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn within_limits_without_entropy_is_stable() {
        let mut world = world();
        let id = world.spawn(powered(10, 10, Efficiency::default()));

        for _ in 0..10 {
            world.update(1000.0);
        }
        assert_eq!(efficiency(&world, id), 1.0);
    }

    #[test]
    fn entropy_alone_wears_efficiency() {
        let mut world = world();
        let id = world.spawn(powered(
            0,
            10,
            Efficiency {
                entropy_multiplier: 0.01,
                ..Efficiency::default()
            },
        ));

        world.update(1000.0);
        let after = efficiency(&world, id);
        assert!(after < 1.0);
        assert!(after >= 0.99);
    }

    #[test]
    fn clamped_at_zero() {
        let mut world = world();
        let id = world.spawn(powered(100, 1, Efficiency::default()));

        world.update(10_000.0);
        assert_eq!(efficiency(&world, id), 0.0);
    }

    #[test]
    fn negative_multiplier_never_repairs() {
        let mut world = world();
        let id = world.spawn(powered(
            20,
            10,
            Efficiency {
                efficiency: 0.5,
                multiplier: -1.0,
                entropy_multiplier: 0.0,
            },
        ));

        world.update(1000.0);
        assert_eq!(efficiency(&world, id), 0.5);
    }
}
