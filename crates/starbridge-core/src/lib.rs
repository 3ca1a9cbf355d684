//! # Starbridge Core
//!
//! Deterministic ship-systems simulation for a cooperative starship bridge.
//!
//! A [`World`] holds entities (ships, installed ship systems, planets,
//! torpedoes) as sparse component sets and runs an ordered list of systems
//! over them once per tick.
//!
//! ## Architecture
//!
//! - **Entities**: an [`EntityId`] plus optional components
//!   ([`entity::components`])
//! - **Store**: entities with a per-component index ([`store`])
//! - **Systems**: predicate + per-entity transform, run in order
//!   ([`system`], [`systems`])
//! - **Frames**: parent-chain resolution into planetary systems ([`frames`])
//! - **Commands**: validated console input ([`command`])
//!
//! The standard system order is power distribution, efficiency wear,
//! phasers, ship steering, torpedo guidance, motion, proximity and physics
//! placement.
//!
//! ## Usage
//!
//! ```
//! use starbridge_core::{Command, Components, World, WorldConfig};
//! use starbridge_core::entity::components::{Power, Reactor, ShipSystems};
//!
//! let mut world = World::from_config(&WorldConfig::with_seed(1)).unwrap();
//! let helm = world.spawn(Components::new().with(Power::default()));
//! let reactor = world.spawn(Components::new().with(Reactor {
//!     max_output: 4,
//!     ..Reactor::default()
//! }));
//! world.spawn(Components::new().with(ShipSystems::from_ids([helm, reactor])));
//!
//! world.apply(Command::SetPowerDraw { system: helm, units: 2 }).unwrap();
//! world.apply(Command::SetReactorAssignment {
//!     reactor,
//!     assignment: vec![helm, helm],
//! }).unwrap();
//! world.update(16.0);
//!
//! assert_eq!(world.store().component::<Power>(helm).unwrap().current_power, 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod config;
pub mod entity;
pub mod error;
pub mod flights;
pub mod frames;
pub mod hash;
pub mod notify;
pub mod store;
pub mod system;
pub mod systems;
pub mod world;

#[cfg(test)]
mod tests;

pub use command::{Command, CommandOutcome};
pub use config::{PhysicsWorldConfig, WorldConfig};
pub use entity::{ComponentKind, ComponentMask, Components, Entity, EntityId};
pub use error::{CoreError, Result};
pub use flights::Flights;
pub use hash::hash_world;
pub use notify::{Notification, Notifier};
pub use store::EntityStore;
pub use system::{System, SystemContext, SystemDeclaration, SystemId};
pub use world::World;
