//! Error types for the simulation core.
//!
//! Errors are only raised for invalid direct use of the API: commands aimed
//! at the wrong kind of entity, out-of-range values, bad configuration.
//! Systems never return errors; a missing component inside a system pass is
//! a silent no-op.

use thiserror::Error;

use crate::entity::{ComponentKind, EntityId};

/// Errors returned by [`World`](crate::world::World) and
/// [`EntityStore`](crate::store::EntityStore) operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// No entity with this id exists.
    #[error("entity {0} not found")]
    EntityNotFound(EntityId),

    /// An entity with this id is already registered.
    #[error("entity {0} already exists")]
    DuplicateEntity(EntityId),

    /// The entity exists but lacks a component the operation needs.
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        /// Entity the operation targeted.
        entity: EntityId,
        /// Component the operation required.
        component: ComponentKind,
    },

    /// A numeric argument fell outside its accepted range.
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Value supplied.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// World state could not be encoded for hashing.
    #[error("snapshot encoding failed: {0}")]
    Snapshot(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::MissingComponent`].
    #[must_use]
    pub const fn missing(entity: EntityId, component: ComponentKind) -> Self {
        Self::MissingComponent { entity, component }
    }

    /// Checks `value` against an inclusive range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfRange`] when `value` is outside `[min, max]`
    /// or not a number.
    pub fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
        if value.is_nan() || value < min || value > max {
            return Err(Self::OutOfRange {
                field,
                value,
                min,
                max,
            });
        }
        Ok(value)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Snapshot(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;
