//! World configuration.
//!
//! Everything here has a working default, so a config file only needs the
//! values it changes:
//!
//! ```
//! use starbridge_core::config::WorldConfig;
//!
//! let config: WorldConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
//! assert_eq!(config.seed, 7);
//! assert!((config.phasers_hz - 5.0).abs() < f64::EPSILON);
//! config.validate().unwrap();
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Default invocation rate of the phaser and proximity systems, in Hz.
pub const DEFAULT_SYSTEM_HZ: f64 = 5.0;

/// Physics-engine coordinate mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsWorldConfig {
    /// Simulation units per physics unit. Locations are divided by this.
    pub scale: f64,
    /// Edge length of a physics sector, in physics units.
    pub sector_size: f64,
}

impl Default for PhysicsWorldConfig {
    fn default() -> Self {
        Self {
            scale: 1000.0,
            sector_size: 10_000.0,
        }
    }
}

/// Settings for a single [`World`](crate::world::World).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed for the world's random number generator.
    pub seed: u64,
    /// Invocation rate of the phaser system.
    pub phasers_hz: f64,
    /// Invocation rate of the nearby-objects system.
    pub nearby_objects_hz: f64,
    /// Physics-engine coordinate mapping.
    pub physics: PhysicsWorldConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            phasers_hz: DEFAULT_SYSTEM_HZ,
            nearby_objects_hz: DEFAULT_SYSTEM_HZ,
            physics: PhysicsWorldConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Default configuration with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Checks that every rate and scale is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("phasers_hz", self.phasers_hz),
            ("nearby_objects_hz", self.nearby_objects_hz),
            ("physics.scale", self.physics.scale),
            ("physics.sector_size", self.physics.sector_size),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}
