//! Component data records.
//!
//! Components are plain data. Behavior lives in the systems that read and
//! write them. Every component is registered in the `components!` table at
//! the bottom of this file, which generates the sparse [`Components`]
//! container, the [`ComponentKind`] enum and the [`ComponentMask`] flags.

use std::collections::BTreeMap;
use std::fmt;

use bitflags::bitflags;
use glam::{DQuat, DVec3};
use helm::{OrbitalElements, WanderParams, WanderState};
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Smallest magnitude treated as non-zero when a component value is used
/// as a divisor.
pub const EPSILON: f64 = helm::EPSILON;

// =============================================================================
// Spatial
// =============================================================================

/// Coordinate frame a [`Position`] is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frame {
    /// Inside a planetary system, relative to `parent_id`.
    #[default]
    Solar,
    /// Between systems.
    Interstellar,
}

/// Location relative to a parent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    /// Offset from the parent's origin.
    pub coords: DVec3,
    /// Entity whose frame `coords` are relative to.
    pub parent_id: Option<EntityId>,
    /// Frame kind.
    pub frame: Frame,
}

impl Position {
    /// Position inside the frame of `parent`.
    #[must_use]
    pub const fn in_frame(coords: DVec3, parent: EntityId) -> Self {
        Self {
            coords,
            parent_id: Some(parent),
            frame: Frame::Solar,
        }
    }
}

/// Linear velocity, in world units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Velocity {
    /// Velocity vector.
    pub linear: DVec3,
}

/// Orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rotation {
    /// Unit quaternion. Forward is +Z.
    pub orientation: DQuat,
}

/// Inertial mass, in tonnes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mass {
    /// Mass value. Zero is guarded wherever it is divided by.
    pub mass: f64,
}

impl Default for Mass {
    fn default() -> Self {
        Self { mass: 1.0 }
    }
}

/// Body placed by orbital elements around a parent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Satellite {
    /// Body being orbited.
    pub parent_id: EntityId,
    /// Orbit shape and current arc.
    pub orbit: OrbitalElements,
}

/// Root of a spatial partition. Proximity is only computed between entities
/// that resolve to the same planetary system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetarySystem {
    /// Display name.
    pub name: String,
}

/// Distances to other entities in the same partition, refreshed each pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearbyObjects {
    /// Distance keyed by neighbour id.
    pub objects: BTreeMap<EntityId, f64>,
}

/// Placement in the external physics engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsWorld {
    /// Location in physics-space units.
    pub location: DVec3,
    /// Whether the physics engine should simulate this body.
    pub enabled: bool,
}

// =============================================================================
// Power
// =============================================================================

/// Power state of a consuming ship system. All values are whole units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Power {
    /// Units received this tick.
    pub current_power: u32,
    /// Units the system can take before overloading.
    pub max_safe_power: u32,
    /// Units needed for nominal operation.
    pub required_power: u32,
    /// Units requested this tick.
    pub power_draw: u32,
    /// Supplier of each unit received this tick, in supply order.
    pub power_sources: Vec<EntityId>,
}

/// Power plant.
///
/// `output_assignment` lists one entry per unit offered to a target; an id
/// repeated `N` times offers `N` units. Only the first `max_output` entries
/// are honored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reactor {
    /// Maximum units per tick.
    pub max_output: u32,
    /// Units drawn this tick.
    pub current_output: u32,
    /// Per-unit target list.
    pub output_assignment: Vec<EntityId>,
    /// Remaining fuel.
    pub unused_fuel: f64,
    /// Output fraction at which the reactor runs most efficiently.
    pub optimal_output_percent: f64,
}

impl Reactor {
    /// Assignment entries that fit within `max_output`.
    #[must_use]
    pub fn honored_assignment(&self) -> &[EntityId] {
        let cap = usize::try_from(self.max_output).unwrap_or(usize::MAX);
        &self.output_assignment[..self.output_assignment.len().min(cap)]
    }

    /// Current output as a fraction of `max_output`.
    #[must_use]
    pub fn output_percent(&self) -> f64 {
        f64::from(self.current_output) / f64::from(self.max_output).max(EPSILON)
    }
}

/// Energy store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Battery {
    /// Maximum stored energy, in unit-hours.
    pub capacity: f64,
    /// Stored energy, in unit-hours. Kept within `[0, capacity]`.
    pub storage: f64,
    /// Maximum units accepted per tick.
    pub charge_rate: u32,
    /// Units accepted this tick.
    pub charge_amount: u32,
    /// Maximum units supplied per tick.
    pub discharge_rate: u32,
    /// Units supplied this tick.
    pub output_amount: u32,
    /// Per-unit target list used while discharging.
    pub output_assignment: Vec<EntityId>,
    /// Whether the battery supplies its targets.
    pub discharging: bool,
}

impl Battery {
    /// Whether storage has reached capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.storage >= self.capacity
    }
}

/// Wear on a ship system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Efficiency {
    /// Output factor in `[0, 1]`.
    pub efficiency: f64,
    /// Wear per second per unit of overload fraction.
    pub multiplier: f64,
    /// Scale of the random background wear.
    pub entropy_multiplier: f64,
}

impl Default for Efficiency {
    fn default() -> Self {
        Self {
            efficiency: 1.0,
            multiplier: 1.0,
            entropy_multiplier: 0.0,
        }
    }
}

// =============================================================================
// Ship membership
// =============================================================================

/// Marks an entity as a system installed on `ship_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSystem {
    /// Owning ship.
    pub ship_id: EntityId,
}

/// Descriptive data kept alongside a ship's system membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemMeta {
    /// Console-facing label.
    pub name: String,
}

/// A ship's installed systems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipSystems {
    /// Installed system ids.
    pub systems: BTreeMap<EntityId, SystemMeta>,
}

impl ShipSystems {
    /// Membership list built from bare ids.
    pub fn from_ids(ids: impl IntoIterator<Item = EntityId>) -> Self {
        Self {
            systems: ids.into_iter().map(|id| (id, SystemMeta::default())).collect(),
        }
    }
}

/// Ship-wide current target, held by the targeting system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Targeting {
    /// Selected target.
    pub target_id: Option<EntityId>,
}

/// Structural integrity, in gigajoules of absorbable damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hull {
    /// Remaining integrity.
    pub integrity: f64,
    /// Undamaged integrity.
    pub max_integrity: f64,
    /// Set once integrity reaches zero.
    pub destroyed: bool,
}

impl Hull {
    /// Undamaged hull.
    #[must_use]
    pub const fn new(max_integrity: f64) -> Self {
        Self {
            integrity: max_integrity,
            max_integrity,
            destroyed: false,
        }
    }
}

// =============================================================================
// Weapons
// =============================================================================

/// Phaser bank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Phasers {
    /// Trigger level in `[0, 1]`.
    pub fire_percent: f64,
    /// Range at the narrowest arc.
    pub max_range: f64,
    /// Current half-angle, in degrees. Wider arcs shorten range.
    pub arc: f64,
    /// Widest permitted arc, in degrees.
    pub max_arc: f64,
    /// Yaw offset from the ship's forward axis, in degrees.
    pub heading_degree: f64,
    /// Pitch offset from the ship's forward axis, in degrees.
    pub pitch_degree: f64,
}

impl Default for Phasers {
    fn default() -> Self {
        Self {
            fire_percent: 0.0,
            max_range: 1000.0,
            arc: 45.0,
            max_arc: 90.0,
            heading_degree: 0.0,
            pitch_degree: 0.0,
        }
    }
}

/// Torpedo warhead chemistry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    /// Matter/antimatter warhead.
    #[default]
    Photon,
    /// Zero-point warhead.
    Quantum,
    /// Superheated plasma warhead.
    Plasma,
}

/// Torpedo in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Torpedo {
    /// Launcher that fired it.
    pub launcher_id: EntityId,
    /// Entity being pursued. `None` coasts.
    pub target_id: Option<EntityId>,
    /// Warhead yield.
    #[serde(rename = "yield")]
    pub warhead_yield: f64,
    /// Warhead chemistry.
    pub damage_type: DamageType,
    /// Nominal cruise speed.
    pub speed: f64,
    /// Guidance force, in kilonewtons.
    pub max_force: f64,
    /// Path length flown so far.
    pub distance_traveled: f64,
}

impl Torpedo {
    /// Standard-loadout torpedo fired from `launcher_id`.
    #[must_use]
    pub const fn new(launcher_id: EntityId, target_id: Option<EntityId>) -> Self {
        Self {
            launcher_id,
            target_id,
            warhead_yield: 1.0,
            damage_type: DamageType::Photon,
            speed: 100.0,
            max_force: 1.0,
            distance_traveled: 0.0,
        }
    }
}

// =============================================================================
// Ship AI
// =============================================================================

/// Steering intent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorKind {
    /// No steering.
    #[default]
    Hold,
    /// Head straight for `target`.
    Seek {
        /// Entity to approach.
        target: EntityId,
    },
    /// Head straight away from `target`.
    Flee {
        /// Entity to avoid.
        target: EntityId,
    },
    /// Lead a moving `target`.
    Pursue {
        /// Entity to intercept.
        target: EntityId,
    },
    /// Avoid the predicted position of `target`.
    Evade {
        /// Entity to escape.
        target: EntityId,
    },
    /// Approach `destination`, slowing inside `slowing_radius`.
    Arrive {
        /// Point in the entity's own frame.
        destination: DVec3,
        /// Distance at which deceleration starts.
        slowing_radius: f64,
    },
    /// Random drift.
    Wander,
}

/// Ship AI steering settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Behavior {
    /// Current intent.
    pub kind: BehaviorKind,
    /// Speed cap.
    pub max_speed: f64,
    /// Steering acceleration cap, per second.
    pub max_force: f64,
    /// Wander tuning.
    #[serde(default)]
    pub wander_params: WanderParams,
    /// Wander angles carried between ticks.
    #[serde(default)]
    pub wander: WanderState,
}

impl Behavior {
    /// Behavior with the given intent and limits.
    #[must_use]
    pub fn new(kind: BehaviorKind, max_speed: f64, max_force: f64) -> Self {
        Self {
            kind,
            max_speed,
            max_force,
            wander_params: WanderParams::default(),
            wander: WanderState::default(),
        }
    }
}

// =============================================================================
// Component table
// =============================================================================

/// Typed access to one slot of [`Components`].
pub trait ComponentData: Sized {
    /// Kind tag for this component type.
    const KIND: ComponentKind;

    /// Shared slot.
    fn slot(components: &Components) -> &Option<Self>;

    /// Mutable slot.
    fn slot_mut(components: &mut Components) -> &mut Option<Self>;
}

macro_rules! components {
    ($( $field:ident : $ty:ident => $kind:ident, $flag:ident, $bit:expr; )+) => {
        /// Sparse component set of one entity.
        ///
        /// Serialized with absent components omitted, so scenario files only
        /// list what an entity has.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct Components {
            $(
                #[allow(missing_docs)]
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
        }

        /// Component type identifiers.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum ComponentKind {
            $(
                #[allow(missing_docs)]
                $kind,
            )+
        }

        impl ComponentKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [ComponentKind] = &[$(ComponentKind::$kind,)+];

            /// Snake-case name used in logs and errors.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$kind => stringify!($field),)+
                }
            }

            /// Single-flag mask for this kind.
            #[must_use]
            pub const fn mask(self) -> ComponentMask {
                match self {
                    $(Self::$kind => ComponentMask::$flag,)+
                }
            }
        }

        bitflags! {
            /// Set of component kinds, used for eligibility checks.
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
            pub struct ComponentMask: u32 {
                $(
                    #[allow(missing_docs)]
                    const $flag = 1 << $bit;
                )+
            }
        }

        impl Components {
            /// Kinds present in this set.
            #[must_use]
            pub fn mask(&self) -> ComponentMask {
                let mut mask = ComponentMask::empty();
                $(
                    if self.$field.is_some() {
                        mask |= ComponentMask::$flag;
                    }
                )+
                mask
            }

            /// Clears the slot for `kind`. Returns whether it was occupied.
            pub fn remove_kind(&mut self, kind: ComponentKind) -> bool {
                match kind {
                    $(ComponentKind::$kind => self.$field.take().is_some(),)+
                }
            }
        }

        $(
            impl ComponentData for $ty {
                const KIND: ComponentKind = ComponentKind::$kind;

                fn slot(components: &Components) -> &Option<Self> {
                    &components.$field
                }

                fn slot_mut(components: &mut Components) -> &mut Option<Self> {
                    &mut components.$field
                }
            }
        )+
    };
}

components! {
    position: Position => Position, POSITION, 0;
    velocity: Velocity => Velocity, VELOCITY, 1;
    rotation: Rotation => Rotation, ROTATION, 2;
    mass: Mass => Mass, MASS, 3;
    power: Power => Power, POWER, 4;
    reactor: Reactor => Reactor, REACTOR, 5;
    battery: Battery => Battery, BATTERY, 6;
    efficiency: Efficiency => Efficiency, EFFICIENCY, 7;
    phasers: Phasers => Phasers, PHASERS, 8;
    torpedo: Torpedo => Torpedo, TORPEDO, 9;
    ship_system: ShipSystem => ShipSystem, SHIP_SYSTEM, 10;
    ship_systems: ShipSystems => ShipSystems, SHIP_SYSTEMS, 11;
    targeting: Targeting => Targeting, TARGETING, 12;
    hull: Hull => Hull, HULL, 13;
    nearby_objects: NearbyObjects => NearbyObjects, NEARBY_OBJECTS, 14;
    physics_world: PhysicsWorld => PhysicsWorld, PHYSICS_WORLD, 15;
    satellite: Satellite => Satellite, SATELLITE, 16;
    planetary_system: PlanetarySystem => PlanetarySystem, PLANETARY_SYSTEM, 17;
    behavior: Behavior => Behavior, BEHAVIOR, 18;
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ComponentMask {
    /// Kinds in this mask, in declaration order.
    pub fn kinds(self) -> impl Iterator<Item = ComponentKind> {
        ComponentKind::ALL
            .iter()
            .copied()
            .filter(move |kind| self.contains(kind.mask()))
    }
}

impl From<ComponentKind> for ComponentMask {
    fn from(kind: ComponentKind) -> Self {
        kind.mask()
    }
}

impl Components {
    /// Empty component set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    ///
    /// # Example
    ///
    /// ```
    /// use starbridge_core::entity::components::{Components, Mass, Velocity};
    ///
    /// let components = Components::new()
    ///     .with(Velocity::default())
    ///     .with(Mass { mass: 40.0 });
    /// assert!(components.get::<Mass>().is_some());
    /// ```
    #[must_use]
    pub fn with<T: ComponentData>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Shared access to a component.
    #[must_use]
    pub fn get<T: ComponentData>(&self) -> Option<&T> {
        T::slot(self).as_ref()
    }

    /// Mutable access to a component.
    pub fn get_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        T::slot_mut(self).as_mut()
    }

    /// Inserts a component, returning the one it replaced.
    pub fn insert<T: ComponentData>(&mut self, value: T) -> Option<T> {
        T::slot_mut(self).replace(value)
    }

    /// Whether `kind` is present.
    #[must_use]
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.mask().contains(kind.mask())
    }
}
