//! Outbound notifications.
//!
//! Systems report player-visible changes through a [`Notifier`]. Delivery is
//! fire-and-forget: a notifier must never block the tick, and a failed send
//! is logged and dropped.
//!
//! # Example
//!
//! ```
//! use std::sync::mpsc;
//! use starbridge_core::notify::{Notification, Notifier};
//! use starbridge_core::entity::EntityId;
//!
//! let (tx, rx) = mpsc::channel();
//! let mut notifier = tx;
//!
//! let stopped = Notification::PhasersStopped { phasers: EntityId::new(4), ship: None };
//! notifier.notify(stopped.topic(), &stopped);
//!
//! assert_eq!(rx.try_recv().unwrap(), stopped);
//! ```

use std::sync::mpsc::Sender;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::EntityId;

/// Something a console may want to hear about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// A phaser bank lost power and stopped firing.
    PhasersStopped {
        /// Phaser bank that stopped
        phasers: EntityId,
        /// Ship it is installed on, if known
        ship: Option<EntityId>,
    },
    /// A reactor's delivered output changed.
    ReactorOutputChanged {
        /// Reactor whose output changed
        reactor: EntityId,
        /// Ship it powers
        ship: EntityId,
        /// Units delivered this tick
        output: u32,
    },
    /// A hull reached zero integrity.
    HullDestroyed {
        /// Entity destroyed
        entity: EntityId,
        /// Ship that dealt the final damage, if known
        attacker: Option<EntityId>,
    },
    /// A torpedo left its launcher.
    TorpedoLaunched {
        /// New torpedo entity
        torpedo: EntityId,
        /// Launcher that fired it
        launcher: EntityId,
        /// Intended target
        target: Option<EntityId>,
    },
}

impl Notification {
    /// Pub/sub topic this notification belongs on.
    #[must_use]
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::PhasersStopped { .. } => "phasers.stopped",
            Self::ReactorOutputChanged { .. } => "reactor.output",
            Self::HullDestroyed { .. } => "hull.destroyed",
            Self::TorpedoLaunched { .. } => "torpedo.launched",
        }
    }

    /// Returns the primary entity involved in this notification.
    #[must_use]
    pub const fn primary_entity(&self) -> EntityId {
        match self {
            Self::PhasersStopped { phasers, .. } => *phasers,
            Self::ReactorOutputChanged { reactor, .. } => *reactor,
            Self::HullDestroyed { entity, .. } => *entity,
            Self::TorpedoLaunched { torpedo, .. } => *torpedo,
        }
    }
}

/// Sink for outbound notifications.
pub trait Notifier: Send {
    /// Publishes `payload` on `topic`. Must not block.
    fn notify(&mut self, topic: &str, payload: &Notification);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _topic: &str, _payload: &Notification) {}
}

impl Notifier for Sender<Notification> {
    fn notify(&mut self, topic: &str, payload: &Notification) {
        if self.send(payload.clone()).is_err() {
            trace!(topic, "notification dropped, receiver gone");
        }
    }
}
