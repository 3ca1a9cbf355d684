//! Crate-level tests that drive a full world.
//!
//! - `determinism.rs`: same seed and inputs give the same state hash
//! - `integration.rs`: the standard system battery working together
//! - `properties.rs`: invariants under generated inputs
//! - `helpers.rs`: scenario builders shared by the above

mod helpers;
mod properties;

pub use helpers::*;
