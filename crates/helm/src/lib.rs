//! # Helm
//!
//! Steering behaviors and spatial geometry for the Starbridge simulation.
//!
//! Everything in this crate is a pure function of its inputs. Nothing here
//! knows about entities or components; the simulation core resolves those
//! into plain vectors and calls in.
//!
//! - [`steering`]: seek, flee, pursue, evade, arrival, wander
//! - [`cone`]: point-in-cone test used for weapon arcs
//! - [`orbit`]: position of a body from its orbital elements
//! - [`sector`]: coarse spatial partition keys
//!
//! ## Quick Start
//!
//! ```
//! use glam::DVec3;
//! use helm::steering;
//!
//! let desired = steering::seek(DVec3::ZERO, DVec3::new(10.0, 0.0, 0.0));
//! assert_eq!(desired, DVec3::X);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cone;
pub mod orbit;
pub mod sector;
pub mod steering;

// Re-exports for convenience
pub use cone::Cone;
pub use orbit::OrbitalElements;
pub use sector::SectorKey;
pub use steering::{WanderParams, WanderState};

/// Smallest magnitude treated as non-zero by the geometry helpers.
///
/// Used in place of a zero divisor so that degenerate inputs never produce
/// `NaN` or infinite results.
pub const EPSILON: f64 = 1e-9;
