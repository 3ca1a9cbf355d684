//! Orbital placement.
//!
//! Bodies without an absolute position (planets, moons, stations) are placed
//! relative to their parent from a reduced set of Keplerian elements. The
//! orbit lies in the XZ plane and is then tilted about the X axis by the
//! inclination.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Highest eccentricity accepted; anything above is treated as this value.
pub const MAX_ECCENTRICITY: f64 = 0.99;

/// Reduced Keplerian elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis, in world units.
    pub semi_major_axis: f64,
    /// Eccentricity in `[0, 1)`.
    pub eccentricity: f64,
    /// True anomaly, in degrees.
    pub orbital_arc: f64,
    /// Inclination of the orbital plane, in degrees.
    pub orbital_inclination: f64,
}

impl OrbitalElements {
    /// Distance from the parent at the current arc.
    ///
    /// `r = a(1 - e²) / (1 + e·cos θ)`
    #[must_use]
    pub fn radius(&self) -> f64 {
        let e = self.eccentricity.clamp(0.0, MAX_ECCENTRICITY);
        let theta = self.orbital_arc.to_radians();
        self.semi_major_axis * (1.0 - e * e) / (1.0 + e * theta.cos())
    }

    /// Offset from the parent body.
    ///
    /// # Example
    ///
    /// ```
    /// use helm::OrbitalElements;
    ///
    /// let orbit = OrbitalElements {
    ///     semi_major_axis: 10.0,
    ///     ..OrbitalElements::default()
    /// };
    /// let offset = orbit.offset();
    /// assert!((offset.x - 10.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn offset(&self) -> DVec3 {
        let radius = self.radius();
        let theta = self.orbital_arc.to_radians();
        let flat = DVec3::new(radius * theta.cos(), 0.0, radius * theta.sin());
        DQuat::from_rotation_x(self.orbital_inclination.to_radians()) * flat
    }
}
