//! Coarse spatial partitioning.

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::EPSILON;

/// Integer cell coordinates of a cubic sector.
///
/// Sectors are axis-aligned cubes of side `sector_size` with one corner at
/// the origin. Keys order lexicographically by `(x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectorKey {
    /// Cell index along X.
    pub x: i64,
    /// Cell index along Y.
    pub y: i64,
    /// Cell index along Z.
    pub z: i64,
}

impl SectorKey {
    /// Creates a key from raw cell indices.
    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Sector that contains `location`.
    ///
    /// Uses floor division, so `-0.5` and `0.5` fall into different sectors.
    ///
    /// # Example
    ///
    /// ```
    /// use glam::DVec3;
    /// use helm::SectorKey;
    ///
    /// let key = SectorKey::from_location(DVec3::new(15.0, -5.0, 0.0), 10.0);
    /// assert_eq!(key, SectorKey::new(1, -1, 0));
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_location(location: DVec3, sector_size: f64) -> Self {
        let cell = (location / sector_size.max(EPSILON)).floor();
        Self {
            x: cell.x as i64,
            y: cell.y as i64,
            z: cell.z as i64,
        }
    }
}

impl fmt::Display for SectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}
