#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Horde Survival engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! views, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod config;

pub use config::{
    ActorKindSpec, ConfigError, ItemKind, ItemSpec, ScannerConfig, SessionConfig,
    SimulationConfig, StaleEffectPolicy, StatMultipliers, WaveConfig, WaveTier, WeaponTuning,
    WorldConfig,
};
pub use glam::Vec2;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Horde Survival.";

/// Reserved penetration value marking a projectile that is never spent.
///
/// Such projectiles ignore impacts and never leave play through the area
/// bounds; orbital weapons attach them to their ring.
pub const PENETRATION_INFINITE: i32 = -100;

/// Describes the lifecycle state of the running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Time advances and every system ticks.
    Live,
    /// Simulation frozen by an external pause request.
    Paused,
    /// Simulation frozen until an upgrade is selected.
    LevelUp,
    /// The anchor survived until the session time limit.
    Victory,
    /// The anchor's health was depleted.
    Defeat,
}

impl SessionState {
    /// Reports whether the simulation advances in this state.
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }

    /// Reports whether the session has reached a terminal outcome.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// Type index selecting the pool an actor is drawn from.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ActorKind(u16);

impl ActorKind {
    /// Creates a new actor kind with the provided numeric value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the kind.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Weak reference to a pooled actor.
///
/// The handle captures the slot generation at the time it was issued, so a
/// handle taken before a slot was recycled no longer resolves to the new
/// occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle {
    kind: ActorKind,
    slot: u32,
    generation: u32,
}

impl ActorHandle {
    /// Creates a handle for the provided pool slot and generation.
    #[must_use]
    pub const fn new(kind: ActorKind, slot: u32, generation: u32) -> Self {
        Self {
            kind,
            slot,
            generation,
        }
    }

    /// Kind of pool that owns the actor.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        self.kind
    }

    /// Insertion index of the slot within its pool.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Activation count of the slot when this handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Unique identifier assigned to an equipped weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WeaponId(u32);

impl WeaponId {
    /// Creates a new weapon identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Emission behaviour of a weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WeaponArchetype {
    /// Continuously rotates a ring of attached projectiles around the anchor.
    Orbital,
    /// Periodically fires one projectile at the nearest detected hostile.
    Targeted,
}

impl WeaponArchetype {
    /// Resolves the archetype from a weapon kind identifier.
    ///
    /// Kind `0` is the orbital weapon; every other kind fires at targets.
    #[must_use]
    pub const fn from_kind(kind: u32) -> Self {
        if kind == 0 {
            Self::Orbital
        } else {
            Self::Targeted
        }
    }
}

/// Reasons a projectile returns to its pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpentReason {
    /// The penetration budget dropped below zero after an impact.
    Exhausted,
    /// The projectile crossed out of the play area.
    LeftArea,
}

/// Lifecycle phase of a hostile actor exposed through views.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyPhase {
    /// Pursuing the anchor.
    Chasing,
    /// Recoiling from an impact; steering is suspended.
    HitReaction,
    /// Health depleted; no longer collides or steers.
    Dead,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the fixed-step simulation by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Updates the movement input steering the anchor.
    SetAnchorInput {
        /// Desired direction of travel; clamped to unit length.
        direction: Vec2,
    },
    /// Overrides the anchor's movement speed.
    SetAnchorSpeed {
        /// Speed measured in world units per second.
        speed: f32,
    },
    /// Requests that a hostile actor be drawn from its pool and initialised.
    SpawnEnemy {
        /// World position assigned to the spawned actor.
        position: Vec2,
        /// Tier whose kind, health and speed seed the actor.
        tier: WaveTier,
    },
    /// Requests that a free-flying projectile be drawn from its pool.
    FireProjectile {
        /// Pool the projectile is drawn from.
        kind: ActorKind,
        /// Position the projectile starts at.
        origin: Vec2,
        /// Normalised direction of travel.
        direction: Vec2,
        /// Damage dealt per impact.
        damage: f32,
        /// Hit budget; see [`PENETRATION_INFINITE`].
        penetration: i32,
    },
    /// Lays out an orbital weapon's ring with the provided projectile count.
    ArrangeOrbit {
        /// Weapon that owns the ring.
        weapon: WeaponId,
        /// Pool ring projectiles are drawn from.
        kind: ActorKind,
        /// Number of projectiles evenly distributed around the anchor.
        count: u32,
        /// Damage dealt per impact by every ring projectile.
        damage: f32,
    },
    /// Rotates an orbital weapon's ring clockwise.
    RotateOrbit {
        /// Weapon that owns the ring.
        weapon: WeaponId,
        /// Rotation measured in degrees.
        degrees: f32,
    },
    /// Kills every alive hostile actor at once.
    ClearEnemies,
    /// Recomputes facing flags once every fixed-step effect has landed.
    RefreshFacing,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a hostile actor was drawn from its pool.
    EnemySpawned {
        /// Handle issued for the activated actor.
        enemy: ActorHandle,
        /// Position the actor was placed at.
        position: Vec2,
    },
    /// Reports that a projectile struck a hostile actor that survived.
    EnemyHit {
        /// Actor that was struck.
        enemy: ActorHandle,
        /// Damage applied by the impact.
        damage: f32,
        /// Health remaining after the impact.
        remaining_health: f32,
    },
    /// Reports that a hostile actor's health was depleted.
    EnemyKilled {
        /// Actor that died; its slot is inactive from now on.
        enemy: ActorHandle,
    },
    /// Reports that a hostile actor was moved back ahead of the anchor.
    EnemyRepositioned {
        /// Actor that was relocated.
        enemy: ActorHandle,
        /// Position after relocation.
        position: Vec2,
    },
    /// Confirms that a deferred knockback was applied.
    KnockbackApplied {
        /// Handle captured when the knockback was scheduled.
        enemy: ActorHandle,
        /// Whether the slot had been recycled since scheduling.
        stale: bool,
    },
    /// Reports that a deferred knockback targeted a recycled slot and was dropped.
    KnockbackDiscarded {
        /// Handle captured when the knockback was scheduled.
        enemy: ActorHandle,
    },
    /// Reports that an alive hostile actor overlapped the anchor during a tick.
    AnchorContact {
        /// Actor touching the anchor.
        enemy: ActorHandle,
        /// Duration of the tick the contact lasted.
        dt: Duration,
    },
    /// Confirms that a projectile was drawn from its pool and launched.
    ProjectileFired {
        /// Handle issued for the projectile.
        projectile: ActorHandle,
    },
    /// Reports that a projectile returned to its pool.
    ProjectileSpent {
        /// Projectile that was deactivated.
        projectile: ActorHandle,
        /// Why the projectile was spent.
        reason: SpentReason,
    },
    /// Confirms that an orbital ring was laid out.
    OrbitArranged {
        /// Weapon that owns the ring.
        weapon: WeaponId,
        /// Number of projectiles positioned on the ring.
        projectiles: u32,
    },
    /// Reports that an orbit rotation named a weapon without a ring.
    OrbitMissing {
        /// Weapon that was requested.
        weapon: WeaponId,
    },
    /// Reports that a command named an actor kind with no registered pool.
    UnregisteredKind {
        /// Kind that was requested.
        kind: ActorKind,
    },
}

/// Immutable representation of a single hostile actor used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Handle referencing the actor's pool slot.
    pub handle: ActorHandle,
    /// World position of the actor.
    pub position: Vec2,
    /// Current health.
    pub health: f32,
    /// Health assigned on activation.
    pub max_health: f32,
    /// Current lifecycle phase.
    pub phase: EnemyPhase,
    /// Whether the actor faces toward negative x.
    pub facing_left: bool,
}

/// Read-only snapshot describing every active hostile actor.
///
/// Snapshots appear in pool discovery order: pools by ascending kind, slots by
/// insertion order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new view from snapshots already in discovery order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Handle referencing the projectile's pool slot.
    pub handle: ActorHandle,
    /// World position of the projectile.
    pub position: Vec2,
    /// Independent velocity; zero for ring projectiles.
    pub velocity: Vec2,
    /// Damage dealt per impact.
    pub damage: f32,
    /// Remaining hit budget.
    pub penetration: i32,
}

/// Read-only snapshot describing every active projectile.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new view from snapshots already in discovery order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of the anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorSnapshot {
    /// World position of the anchor.
    pub position: Vec2,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Whether the anchor faces toward negative x.
    pub facing_left: bool,
}

/// Multiplier lookups supplied by the equipment/character stat collaborator.
pub trait StatSource {
    /// Scales the anchor's movement speed.
    fn speed_multiplier(&self) -> f32;

    /// Scales the rotation speed of orbital weapons.
    fn weapon_speed_multiplier(&self) -> f32;

    /// Scales the fire interval of targeted weapons; lower fires faster.
    fn weapon_rate_multiplier(&self) -> f32;

    /// Scales weapon damage.
    fn damage_multiplier(&self) -> f32;

    /// Extra projectiles granted to every weapon on creation.
    fn bonus_projectile_count(&self) -> u32;
}

/// Stat source that leaves every value unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeutralStats;

impl StatSource for NeutralStats {
    fn speed_multiplier(&self) -> f32 {
        1.0
    }

    fn weapon_speed_multiplier(&self) -> f32 {
        1.0
    }

    fn weapon_rate_multiplier(&self) -> f32 {
        1.0
    }

    fn damage_multiplier(&self) -> f32 {
        1.0
    }

    fn bonus_projectile_count(&self) -> u32 {
        0
    }
}

/// Derives an independent random stream seed from a master seed and a label.
///
/// Each subsystem draws from its own stream so adding draws to one never
/// perturbs another.
#[must_use]
pub fn derive_stream_seed(master: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(master.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::{
        derive_stream_seed, ActorHandle, ActorKind, SessionState, WeaponArchetype, WeaponId,
    };
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn actor_kind_round_trips_through_bincode() {
        assert_round_trip(&ActorKind::new(3));
    }

    #[test]
    fn weapon_id_round_trips_through_bincode() {
        assert_round_trip(&WeaponId::new(42));
    }

    #[test]
    fn only_kind_zero_is_orbital() {
        assert_eq!(WeaponArchetype::from_kind(0), WeaponArchetype::Orbital);
        assert_eq!(WeaponArchetype::from_kind(1), WeaponArchetype::Targeted);
        assert_eq!(WeaponArchetype::from_kind(7), WeaponArchetype::Targeted);
    }

    #[test]
    fn handles_differ_by_generation() {
        let kind = ActorKind::new(0);
        assert_ne!(ActorHandle::new(kind, 2, 0), ActorHandle::new(kind, 2, 1));
    }

    #[test]
    fn only_live_state_advances() {
        assert!(SessionState::Live.is_live());
        for state in [
            SessionState::Paused,
            SessionState::LevelUp,
            SessionState::Victory,
            SessionState::Defeat,
        ] {
            assert!(!state.is_live(), "{state:?} must be frozen");
        }
        assert!(SessionState::Victory.is_finished());
        assert!(!SessionState::LevelUp.is_finished());
    }

    #[test]
    fn stream_seeds_depend_on_label_and_master() {
        let spawning = derive_stream_seed(7, "spawning");
        assert_eq!(spawning, derive_stream_seed(7, "spawning"));
        assert_ne!(spawning, derive_stream_seed(7, "offers"));
        assert_ne!(spawning, derive_stream_seed(8, "spawning"));
    }
}
