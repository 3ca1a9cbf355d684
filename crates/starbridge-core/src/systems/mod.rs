//! The per-tick ship-systems battery.
//!
//! [`default_systems`] returns them in the order a world must run them:
//! power flows first so that every later system sees this tick's
//! `current_power`, guidance runs before motion, and the spatial systems run
//! last on final positions.

mod efficiency;
mod motion;
mod nearby;
mod phasers;
mod physics_world;
mod power_distribution;
mod steering;
mod torpedo;

pub use efficiency::{overload_percent, PowerEfficiencyOverloadSystem};
pub use motion::MotionSystem;
pub use nearby::NearbyObjectsSystem;
pub use phasers::{
    phaser_range, target_in_phaser_range, targeting_system, PhasersSystem, MWH_TO_GJ,
};
pub use physics_world::PhysicsWorldPositionSystem;
pub use power_distribution::{distribute_power, PowerDistributionSystem};
pub use steering::SteeringBehaviorSystem;
pub use torpedo::TorpedoMovementSystem;

use crate::config::WorldConfig;
use crate::system::System;

/// Milliseconds per second.
pub const MS_PER_SECOND: f64 = 1000.0;

/// Milliseconds per hour.
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// The standard system battery, in execution order.
#[must_use]
pub fn default_systems(config: &WorldConfig) -> Vec<Box<dyn System>> {
    vec![
        Box::new(PowerDistributionSystem::new()),
        Box::new(PowerEfficiencyOverloadSystem::new()),
        Box::new(PhasersSystem::new(config.phasers_hz)),
        Box::new(SteeringBehaviorSystem::new()),
        Box::new(TorpedoMovementSystem::new()),
        Box::new(MotionSystem::new()),
        Box::new(NearbyObjectsSystem::new(config.nearby_objects_hz)),
        Box::new(PhysicsWorldPositionSystem::new(config.physics)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order() {
        let ids: Vec<_> = default_systems(&WorldConfig::default())
            .iter()
            .map(|system| system.declaration().id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "power_distribution",
                "power_efficiency_overload",
                "phasers",
                "steering_behavior",
                "torpedo_movement",
                "motion",
                "nearby_objects",
                "physics_world_position",
            ]
        );
    }

    #[test]
    fn throttled_systems_follow_config() {
        let config = WorldConfig {
            phasers_hz: 10.0,
            nearby_objects_hz: 2.0,
            ..WorldConfig::default()
        };
        let systems = default_systems(&config);
        assert_eq!(systems[2].declaration().frequency, Some(10.0));
        assert_eq!(systems[6].declaration().frequency, Some(2.0));
        assert_eq!(systems[0].declaration().frequency, None);
    }
}
