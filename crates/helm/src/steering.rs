//! Steering behaviors.
//!
//! Each behavior returns a *desired direction*: a unit vector (or, for
//! [`arrival`], a vector scaled down inside the slowing radius). Callers
//! multiply by their own maximum speed and derive a steering force with
//! [`steering_force`].
//!
//! Degenerate inputs (coincident points, zero speed) yield [`DVec3::ZERO`]
//! rather than `NaN`.

use std::f64::consts::FRAC_PI_2;

use glam::DVec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::EPSILON;

/// Direction that moves `position` straight toward `target`.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use helm::steering::seek;
///
/// let dir = seek(DVec3::ZERO, DVec3::new(0.0, 0.0, -5.0));
/// assert_eq!(dir, DVec3::NEG_Z);
/// ```
#[must_use]
pub fn seek(position: DVec3, target: DVec3) -> DVec3 {
    (target - position).normalize_or_zero()
}

/// Direction that moves `position` straight away from `target`.
#[must_use]
pub fn flee(position: DVec3, target: DVec3) -> DVec3 {
    -seek(position, target)
}

/// Estimated position of a target after `t` seconds of constant velocity.
#[must_use]
pub fn predict(target: DVec3, target_velocity: DVec3, t: f64) -> DVec3 {
    target + target_velocity * t
}

/// Seconds needed to cover the distance to `target` at `speed`.
///
/// A zero or negative speed is replaced by [`EPSILON`].
#[must_use]
pub fn intercept_time(position: DVec3, target: DVec3, speed: f64) -> f64 {
    position.distance(target) / speed.max(EPSILON)
}

/// Seek the target's estimated position `t` seconds ahead.
#[must_use]
pub fn pursue(position: DVec3, target: DVec3, target_velocity: DVec3, t: f64) -> DVec3 {
    seek(position, predict(target, target_velocity, t))
}

/// Flee the target's estimated position `t` seconds ahead.
#[must_use]
pub fn evade(position: DVec3, target: DVec3, target_velocity: DVec3, t: f64) -> DVec3 {
    flee(position, predict(target, target_velocity, t))
}

/// Seek that tapers off inside `slowing_radius`.
///
/// Outside the radius this is identical to [`seek`]. Inside, the returned
/// vector's length falls linearly with distance, reaching zero at the target.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use helm::steering::arrival;
///
/// let halfway = arrival(DVec3::ZERO, DVec3::new(5.0, 0.0, 0.0), 10.0);
/// assert!((halfway.length() - 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn arrival(position: DVec3, target: DVec3, slowing_radius: f64) -> DVec3 {
    let offset = target - position;
    let distance = offset.length();
    if distance <= EPSILON {
        return DVec3::ZERO;
    }
    let direction = offset / distance;
    if slowing_radius <= EPSILON || distance >= slowing_radius {
        direction
    } else {
        direction * (distance / slowing_radius)
    }
}

/// Force that turns `velocity` toward `desired_velocity`, capped at `max_force`.
#[must_use]
pub fn steering_force(desired_velocity: DVec3, velocity: DVec3, max_force: f64) -> DVec3 {
    (desired_velocity - velocity).clamp_length_max(max_force.max(0.0))
}

// =============================================================================
// Wander
// =============================================================================

/// Tuning for [`wander`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WanderParams {
    /// Distance of the wander circle's centre ahead of the entity.
    pub circle_distance: f64,
    /// Radius of the wander circle.
    pub circle_radius: f64,
    /// Maximum drift of the wander angles per call, in radians.
    pub angle_change: f64,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self {
            circle_distance: 2.0,
            circle_radius: 1.0,
            angle_change: 0.5,
        }
    }
}

/// Persistent wander angles, carried between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WanderState {
    /// Heading of the displacement around the wander circle, in radians.
    pub heading: f64,
    /// Pitch of the displacement, in radians, kept within ±π/2.
    pub pitch: f64,
}

/// Randomized heading drift around a point ahead of the entity.
///
/// Draws exactly two values from `rng` per call, so two callers holding RNGs
/// in the same state get the same direction.
pub fn wander<R: Rng + ?Sized>(
    forward: DVec3,
    state: &mut WanderState,
    params: &WanderParams,
    rng: &mut R,
) -> DVec3 {
    let forward = forward.try_normalize().unwrap_or(DVec3::Z);

    state.heading += (rng.gen::<f64>() - 0.5) * params.angle_change;
    state.pitch =
        (state.pitch + (rng.gen::<f64>() - 0.5) * params.angle_change).clamp(-FRAC_PI_2, FRAC_PI_2);

    let center = forward * params.circle_distance;
    let displacement = DVec3::new(
        state.heading.cos() * state.pitch.cos(),
        state.pitch.sin(),
        state.heading.sin() * state.pitch.cos(),
    ) * params.circle_radius;

    (center + displacement).normalize_or_zero()
}
