//! Point-in-cone test.
//!
//! A [`Cone`] is described by its apex, an axis vector whose length is the
//! cone's axial length, and a half-angle in radians. The cone is capped by a
//! plane perpendicular to the axis at its far end.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::EPSILON;

/// Slack applied to the angular comparison so points on the surface count.
const ANGLE_TOLERANCE: f64 = 1e-9;

/// A finite right circular cone.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use helm::Cone;
///
/// let cone = Cone::new(DVec3::ZERO, DVec3::Z, 100.0, 0.5);
/// assert!(cone.contains(DVec3::new(0.0, 0.0, 50.0)));
/// assert!(!cone.contains(DVec3::new(0.0, 0.0, -1.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cone {
    /// Tip of the cone.
    pub apex: DVec3,
    /// Direction of the cone scaled to its axial length.
    pub axis: DVec3,
    /// Half-angle of the opening, in radians.
    pub half_angle: f64,
}

impl Cone {
    /// Builds a cone from a direction and a separate length.
    ///
    /// `direction` need not be normalized. A zero direction gives a
    /// degenerate cone that contains only its apex.
    #[must_use]
    pub fn new(apex: DVec3, direction: DVec3, length: f64, half_angle: f64) -> Self {
        Self {
            apex,
            axis: direction.normalize_or_zero() * length.max(0.0),
            half_angle,
        }
    }

    /// Axial length of the cone.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.axis.length()
    }

    /// Whether `point` lies inside the cone or on its surface.
    #[must_use]
    pub fn contains(&self, point: DVec3) -> bool {
        let offset = point - self.apex;
        let distance = offset.length();
        if distance <= EPSILON {
            return true;
        }

        let length = self.length();
        if length <= EPSILON {
            return false;
        }

        let projection = offset.dot(self.axis / length);
        if projection < 0.0 || projection > length {
            return false;
        }

        let deviation = (projection / distance).clamp(-1.0, 1.0).acos();
        deviation <= self.half_angle + ANGLE_TOLERANCE
    }
}

/// Free-function form of [`Cone::contains`].
#[must_use]
pub fn point_in_cone(point: DVec3, apex: DVec3, axis: DVec3, half_angle: f64) -> bool {
    Cone {
        apex,
        axis,
        half_angle,
    }
    .contains(point)
}
