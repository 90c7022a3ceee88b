//! Tuning surface for every adjustable aspect of the simulation.
//!
//! Every struct deserialises from TOML with defaults matching the reference
//! tuning, so a configuration file only needs to list the values it changes.
//! Durations are written as seconds.

use std::{collections::BTreeSet, time::Duration};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ActorKind, StatSource};

/// Aggregated configuration consumed when a simulation is constructed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Master seed every random stream derives from.
    pub seed: u64,
    /// Pools, play area and combat constants owned by the world.
    pub world: WorldConfig,
    /// Wave tiers, tier thresholds and spawn points.
    pub waves: WaveConfig,
    /// Target acquisition settings.
    pub scanner: ScannerConfig,
    /// Session length, anchor vitals and experience curve.
    pub session: SessionConfig,
    /// Base cadence values weapons scale from.
    pub weapons: WeaponTuning,
    /// Upgrade items offered on level-up.
    pub items: Vec<ItemSpec>,
    /// Index of the item selected automatically when the session starts.
    pub starting_item: usize,
    /// Flat stat multipliers standing in for a character table.
    pub stats: StatMultipliers,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed_0f_d3ad,
            world: WorldConfig::default(),
            waves: WaveConfig::default(),
            scanner: ScannerConfig::default(),
            session: SessionConfig::default(),
            weapons: WeaponTuning::default(),
            items: default_items(),
            starting_item: 0,
            stats: StatMultipliers::default(),
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let enemy_kinds = self.world.enemy_kind_set()?;
        let projectile_kinds = self.world.projectile_kind_set()?;
        if let Some(kind) = enemy_kinds.intersection(&projectile_kinds).next() {
            return Err(ConfigError::DuplicateKind { kind: kind.get() });
        }

        self.world.validate()?;
        self.waves.validate(&enemy_kinds)?;

        ensure_positive(self.scanner.radius, "scanner.radius")?;
        ensure_positive(self.weapons.orbit_base_speed, "weapons.orbit_base_speed")?;
        if self.weapons.fire_base_interval.is_zero() {
            return Err(ConfigError::NonPositive {
                field: "weapons.fire_base_interval",
            });
        }

        if self.session.next_exp.is_empty() || self.session.next_exp.contains(&0) {
            return Err(ConfigError::InvalidExperienceTable);
        }

        ensure_positive(self.session.anchor_max_health, "session.anchor_max_health")?;

        for (index, item) in self.items.iter().enumerate() {
            item.validate(index, &projectile_kinds)?;
        }

        if self.starting_item >= self.items.len() {
            return Err(ConfigError::StartingItemOutOfRange {
                index: self.starting_item,
                items: self.items.len(),
            });
        }

        Ok(())
    }
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed into a configuration.
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] toml::de::Error),
    /// No wave tiers were configured.
    #[error("wave tier table must contain at least one tier")]
    EmptyTierTable,
    /// Tier thresholds must increase strictly.
    #[error("wave tier thresholds must be strictly ascending")]
    ThresholdsNotAscending,
    /// A tier spawns with a zero interval.
    #[error("wave tier {tier} has a zero spawn interval")]
    ZeroSpawnInterval {
        /// Index of the offending tier.
        tier: usize,
    },
    /// Spawn point zero is reserved, so at least two points are required.
    #[error("at least two spawn points are required, found {found}")]
    InsufficientSpawnPoints {
        /// Number of configured points.
        found: usize,
    },
    /// A tier names an actor kind that has no enemy pool.
    #[error("wave tier {tier} references unregistered enemy kind {kind}")]
    UnregisteredEnemyKind {
        /// Index of the offending tier.
        tier: usize,
        /// Kind that was referenced.
        kind: u16,
    },
    /// An item names an actor kind that has no projectile pool.
    #[error("item {item} references unregistered projectile kind {kind}")]
    UnregisteredProjectileKind {
        /// Index of the offending item.
        item: usize,
        /// Kind that was referenced.
        kind: u16,
    },
    /// A weapon item does not name a projectile kind.
    #[error("weapon item {item} does not declare a projectile kind")]
    MissingProjectile {
        /// Index of the offending item.
        item: usize,
    },
    /// A weapon item's count table is shorter than its damage table.
    #[error("item {item} lists fewer count upgrades than damage upgrades")]
    LevelTableMismatch {
        /// Index of the offending item.
        item: usize,
    },
    /// An actor kind was registered more than once.
    #[error("actor kind {kind} is registered more than once")]
    DuplicateKind {
        /// Kind that was duplicated.
        kind: u16,
    },
    /// The experience table is empty or contains a zero threshold.
    #[error("experience table must be non-empty with positive thresholds")]
    InvalidExperienceTable,
    /// The starting item index does not name a configured item.
    #[error("starting item {index} is out of range for {items} items")]
    StartingItemOutOfRange {
        /// Configured index.
        index: usize,
        /// Number of configured items.
        items: usize,
    },
    /// A value that must be strictly positive was not.
    #[error("`{field}` must be strictly positive")]
    NonPositive {
        /// Dotted path of the offending field.
        field: &'static str,
    },
}

/// Behaviour of a deferred effect whose target slot was recycled before it ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaleEffectPolicy {
    /// Apply the effect to whatever now occupies the slot.
    #[default]
    Apply,
    /// Drop the effect when the slot generation no longer matches.
    Discard,
}

/// Registers a pool and the collision radius of the actors it holds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActorKindSpec {
    /// Type index of the pool.
    pub kind: ActorKind,
    /// Collision radius of every actor in the pool.
    pub radius: f32,
}

impl ActorKindSpec {
    /// Creates a new registration.
    #[must_use]
    pub const fn new(kind: ActorKind, radius: f32) -> Self {
        Self { kind, radius }
    }
}

/// Pools, play area and combat constants owned by the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Pools holding hostile actors.
    pub enemy_kinds: Vec<ActorKindSpec>,
    /// Pools holding projectiles.
    pub projectile_kinds: Vec<ActorKindSpec>,
    /// Half extents of the play area box centred on the anchor.
    pub play_area_half_extents: Vec2,
    /// Collision radius of the anchor.
    pub anchor_radius: f32,
    /// Anchor speed before multipliers and gear.
    pub anchor_base_speed: f32,
    /// Speed of free-flying projectiles.
    pub projectile_speed: f32,
    /// Velocity imparted by a knockback.
    pub knockback_impulse: f32,
    /// Time steering stays suspended after a non-lethal impact.
    #[serde(with = "seconds")]
    pub hit_reaction: Duration,
    /// Distance of ring projectiles from the anchor.
    pub orbit_radius: f32,
    /// Whether hostile actors leaving the play area are moved ahead of the anchor.
    pub reposition_enemies: bool,
    /// Whether knockbacks reach slots recycled since they were scheduled.
    pub stale_effects: StaleEffectPolicy,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            enemy_kinds: vec![
                ActorKindSpec::new(ActorKind::new(0), 0.45),
                ActorKindSpec::new(ActorKind::new(1), 0.45),
            ],
            projectile_kinds: vec![
                ActorKindSpec::new(ActorKind::new(2), 0.4),
                ActorKindSpec::new(ActorKind::new(3), 0.15),
            ],
            play_area_half_extents: Vec2::new(12.0, 12.0),
            anchor_radius: 0.4,
            anchor_base_speed: 3.0,
            projectile_speed: 15.0,
            knockback_impulse: 3.0,
            hit_reaction: Duration::from_millis(300),
            orbit_radius: 1.5,
            reposition_enemies: true,
            stale_effects: StaleEffectPolicy::Apply,
        }
    }
}

impl WorldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            (self.play_area_half_extents.x, "world.play_area_half_extents"),
            (self.play_area_half_extents.y, "world.play_area_half_extents"),
            (self.anchor_radius, "world.anchor_radius"),
            (self.anchor_base_speed, "world.anchor_base_speed"),
            (self.projectile_speed, "world.projectile_speed"),
            (self.knockback_impulse, "world.knockback_impulse"),
            (self.orbit_radius, "world.orbit_radius"),
        ];
        for (value, field) in positive {
            ensure_positive(value, field)?;
        }

        for spec in self.enemy_kinds.iter().chain(self.projectile_kinds.iter()) {
            ensure_positive(spec.radius, "world.kinds.radius")?;
        }

        Ok(())
    }

    /// Collects the registered enemy kinds, rejecting duplicates.
    pub fn enemy_kind_set(&self) -> Result<BTreeSet<ActorKind>, ConfigError> {
        kind_set(&self.enemy_kinds)
    }

    /// Collects the registered projectile kinds, rejecting duplicates.
    pub fn projectile_kind_set(&self) -> Result<BTreeSet<ActorKind>, ConfigError> {
        kind_set(&self.projectile_kinds)
    }
}

/// Fails unless `value` is strictly positive; NaN fails as well.
fn ensure_positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field })
    }
}

fn kind_set(specs: &[ActorKindSpec]) -> Result<BTreeSet<ActorKind>, ConfigError> {
    let mut kinds = BTreeSet::new();
    for spec in specs {
        if !kinds.insert(spec.kind) {
            return Err(ConfigError::DuplicateKind {
                kind: spec.kind.get(),
            });
        }
    }
    Ok(kinds)
}

/// Time-windowed configuration bucket controlling spawn rate and stats.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveTier {
    /// Nominal spawn period; spawns actually fire every half interval.
    #[serde(with = "seconds")]
    pub spawn_interval: Duration,
    /// Pool the tier's actors are drawn from.
    pub actor_kind: ActorKind,
    /// Health assigned on activation.
    pub health: u32,
    /// Pursuit speed in world units per second.
    pub speed: f32,
}

/// Wave tiers, tier thresholds and spawn points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WaveConfig {
    /// Tiers ordered by activation time.
    pub tiers: Vec<WaveTier>,
    /// Elapsed times at which the next tier activates.
    #[serde(with = "seconds_list")]
    pub thresholds: Vec<Duration>,
    /// Spawn offsets relative to the anchor; index zero is the scheduler's own
    /// origin and is never chosen.
    pub spawn_points: Vec<Vec2>,
}

impl Default for WaveConfig {
    fn default() -> Self {
        let mut spawn_points = vec![Vec2::ZERO];
        for step in 0..8 {
            let angle = std::f32::consts::FRAC_PI_4 * step as f32;
            spawn_points.push(Vec2::new(angle.cos(), angle.sin()) * 10.0);
        }

        Self {
            tiers: vec![
                WaveTier {
                    spawn_interval: Duration::from_millis(700),
                    actor_kind: ActorKind::new(0),
                    health: 10,
                    speed: 1.5,
                },
                WaveTier {
                    spawn_interval: Duration::from_millis(400),
                    actor_kind: ActorKind::new(1),
                    health: 15,
                    speed: 2.5,
                },
                WaveTier {
                    spawn_interval: Duration::from_millis(200),
                    actor_kind: ActorKind::new(1),
                    health: 30,
                    speed: 2.5,
                },
            ],
            thresholds: vec![Duration::from_secs(120), Duration::from_secs(240)],
            spawn_points,
        }
    }
}

impl WaveConfig {
    fn validate(&self, enemy_kinds: &BTreeSet<ActorKind>) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::EmptyTierTable);
        }

        for (tier, data) in self.tiers.iter().enumerate() {
            if data.spawn_interval.is_zero() {
                return Err(ConfigError::ZeroSpawnInterval { tier });
            }
            ensure_positive(data.speed, "waves.tiers.speed")?;
            if !enemy_kinds.contains(&data.actor_kind) {
                return Err(ConfigError::UnregisteredEnemyKind {
                    tier,
                    kind: data.actor_kind.get(),
                });
            }
        }

        if self
            .thresholds
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            return Err(ConfigError::ThresholdsNotAscending);
        }

        if self.spawn_points.len() < 2 {
            return Err(ConfigError::InsufficientSpawnPoints {
                found: self.spawn_points.len(),
            });
        }

        Ok(())
    }
}

/// Target acquisition settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScannerConfig {
    /// Radius of the circular query around the anchor.
    pub radius: f32,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self { radius: 8.0 }
    }
}

/// Session length, anchor vitals and experience curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Elapsed time at which the anchor wins.
    #[serde(with = "seconds")]
    pub max_time: Duration,
    /// Anchor health at the start of the session.
    pub anchor_max_health: f32,
    /// Health drained per second by each touching hostile actor.
    pub contact_damage_per_second: f32,
    /// Experience required per level; the last entry repeats.
    pub next_exp: Vec<u32>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_time: Duration::from_secs(300),
            anchor_max_health: 100.0,
            contact_damage_per_second: 10.0,
            next_exp: vec![3, 5, 9, 10, 20, 50, 110, 230, 310, 440, 550],
        }
    }
}

/// Base cadence values weapons scale from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeaponTuning {
    /// Ring rotation speed in degrees per second before multipliers.
    pub orbit_base_speed: f32,
    /// Fire interval of targeted weapons before multipliers.
    #[serde(with = "seconds")]
    pub fire_base_interval: Duration,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            orbit_base_speed: 150.0,
            fire_base_interval: Duration::from_millis(300),
        }
    }
}

/// Category of an upgrade item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Weapon kept close to the anchor.
    Melee,
    /// Weapon firing at range.
    Range,
    /// Gear improving weapon cadence.
    Glove,
    /// Gear improving anchor speed.
    Shoe,
    /// Restores the anchor's health.
    Heal,
}

impl ItemKind {
    /// Reports whether the item equips a weapon.
    #[must_use]
    pub const fn is_weapon(self) -> bool {
        matches!(self, Self::Melee | Self::Range)
    }
}

/// Upgrade item definition and its per-level tables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSpec {
    /// Category of the item.
    pub kind: ItemKind,
    /// Weapon kind identifier; `0` selects the orbital archetype.
    pub item_id: u32,
    /// Display name.
    pub name: String,
    /// Damage at level zero, before multipliers.
    #[serde(default)]
    pub base_damage: f32,
    /// Projectile count at level zero, before bonuses.
    #[serde(default)]
    pub base_count: u32,
    /// Per-level damage ratios for weapons and rates for gear.
    #[serde(default)]
    pub damages: Vec<f32>,
    /// Per-level projectile count increments for weapons.
    #[serde(default)]
    pub counts: Vec<u32>,
    /// Pool the weapon's projectiles are drawn from.
    #[serde(default)]
    pub projectile: Option<ActorKind>,
}

impl ItemSpec {
    /// Number of selections after which the item is exhausted.
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.damages.len()
    }

    fn validate(
        &self,
        index: usize,
        projectile_kinds: &BTreeSet<ActorKind>,
    ) -> Result<(), ConfigError> {
        if self.kind.is_weapon() {
            let Some(kind) = self.projectile else {
                return Err(ConfigError::MissingProjectile { item: index });
            };
            if !projectile_kinds.contains(&kind) {
                return Err(ConfigError::UnregisteredProjectileKind {
                    item: index,
                    kind: kind.get(),
                });
            }
            if self.counts.len() < self.damages.len() {
                return Err(ConfigError::LevelTableMismatch { item: index });
            }
        }
        Ok(())
    }
}

fn default_items() -> Vec<ItemSpec> {
    vec![
        ItemSpec {
            kind: ItemKind::Melee,
            item_id: 0,
            name: "Shovel".to_owned(),
            base_damage: 3.0,
            base_count: 3,
            damages: vec![0.0, 0.1, 0.2, 0.3, 0.4],
            counts: vec![0, 1, 1, 1, 2],
            projectile: Some(ActorKind::new(2)),
        },
        ItemSpec {
            kind: ItemKind::Range,
            item_id: 1,
            name: "Shotgun".to_owned(),
            base_damage: 3.0,
            base_count: 0,
            damages: vec![0.0, 0.1, 0.2, 0.3, 0.4],
            counts: vec![0, 0, 1, 0, 1],
            projectile: Some(ActorKind::new(3)),
        },
        ItemSpec {
            kind: ItemKind::Glove,
            item_id: 2,
            name: "Glove".to_owned(),
            base_damage: 0.0,
            base_count: 0,
            damages: vec![0.1, 0.2, 0.3, 0.4, 0.5],
            counts: Vec::new(),
            projectile: None,
        },
        ItemSpec {
            kind: ItemKind::Shoe,
            item_id: 3,
            name: "Shoe".to_owned(),
            base_damage: 0.0,
            base_count: 0,
            damages: vec![0.1, 0.2, 0.3, 0.4, 0.5],
            counts: Vec::new(),
            projectile: None,
        },
        ItemSpec {
            kind: ItemKind::Heal,
            item_id: 4,
            name: "Drink".to_owned(),
            base_damage: 0.0,
            base_count: 0,
            damages: Vec::new(),
            counts: Vec::new(),
            projectile: None,
        },
    ]
}

/// Flat stat multipliers standing in for a per-character table.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatMultipliers {
    /// Anchor movement speed multiplier.
    pub speed: f32,
    /// Orbital rotation speed multiplier.
    pub weapon_speed: f32,
    /// Targeted fire interval multiplier.
    pub weapon_rate: f32,
    /// Damage multiplier.
    pub damage: f32,
    /// Extra projectiles per weapon.
    pub bonus_projectiles: u32,
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self {
            speed: 1.0,
            weapon_speed: 1.0,
            weapon_rate: 1.0,
            damage: 1.0,
            bonus_projectiles: 0,
        }
    }
}

impl StatSource for StatMultipliers {
    fn speed_multiplier(&self) -> f32 {
        self.speed
    }

    fn weapon_speed_multiplier(&self) -> f32 {
        self.weapon_speed
    }

    fn weapon_rate_multiplier(&self) -> f32 {
        self.weapon_rate
    }

    fn damage_multiplier(&self) -> f32 {
        self.damage
    }

    fn bonus_projectile_count(&self) -> u32 {
        self.bonus_projectiles
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f32(value.as_secs_f32())
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f32::deserialize(deserializer)?;
        Duration::try_from_secs_f32(value).map_err(D::Error::custom)
    }
}

mod seconds_list {
    use std::time::Duration;

    use serde::{de::Error, ser::SerializeSeq, Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S>(values: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for value in values {
            seq.serialize_element(&value.as_secs_f32())?;
        }
        seq.end()
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let values = Vec::<f32>::deserialize(deserializer)?;
        values
            .into_iter()
            .map(|value| Duration::try_from_secs_f32(value).map_err(D::Error::custom))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SimulationConfig::default()
            .validate()
            .expect("reference tuning validates");
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 9
            [waves]
            thresholds = [60.0, 90.5]
            [world]
            stale_effects = "discard"
            hit_reaction = 0.25
            "#,
        )
        .expect("config parses");

        assert_eq!(config.seed, 9);
        assert_eq!(
            config.waves.thresholds,
            vec![Duration::from_secs(60), Duration::from_millis(90_500)]
        );
        assert_eq!(config.world.stale_effects, StaleEffectPolicy::Discard);
        assert_eq!(config.world.hit_reaction, Duration::from_millis(250));
        assert_eq!(config.waves.tiers.len(), 3, "tiers keep their defaults");
    }

    #[test]
    fn empty_tier_table_is_rejected() {
        let mut config = SimulationConfig::default();
        config.waves.tiers.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyTierTable)
        ));
    }

    #[test]
    fn unregistered_projectile_kind_is_rejected() {
        let mut config = SimulationConfig::default();
        config.items[1].projectile = Some(ActorKind::new(40));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnregisteredProjectileKind { item: 1, kind: 40 })
        ));
    }

    #[test]
    fn tier_with_projectile_kind_is_rejected() {
        let mut config = SimulationConfig::default();
        config.waves.tiers[0].actor_kind = ActorKind::new(2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnregisteredEnemyKind { tier: 0, kind: 2 })
        ));
    }

    #[test]
    fn kind_shared_between_pools_is_rejected() {
        let mut config = SimulationConfig::default();
        config
            .world
            .projectile_kinds
            .push(ActorKindSpec::new(ActorKind::new(0), 0.2));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateKind { kind: 0 })
        ));
    }

    #[test]
    fn descending_thresholds_are_rejected() {
        let mut config = SimulationConfig::default();
        config.waves.thresholds = vec![Duration::from_secs(240), Duration::from_secs(120)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdsNotAscending)
        ));
    }

    #[test]
    fn origin_only_spawn_points_are_rejected() {
        let mut config = SimulationConfig::default();
        config.waves.spawn_points.truncate(1);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InsufficientSpawnPoints { found: 1 })
        ));
    }

    #[test]
    fn zero_spawn_interval_is_rejected() {
        let mut config = SimulationConfig::default();
        config.waves.tiers[1].spawn_interval = Duration::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSpawnInterval { tier: 1 })
        ));
    }

    #[test]
    fn experience_table_needs_positive_entries() {
        let mut config = SimulationConfig::default();
        config.session.next_exp.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidExperienceTable)
        ));

        config.session.next_exp = vec![3, 0, 9];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidExperienceTable)
        ));
    }

    #[test]
    fn starting_item_out_of_range_is_rejected() {
        let mut config = SimulationConfig::default();
        config.starting_item = 5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StartingItemOutOfRange { index: 5, items: 5 })
        ));
    }

    #[test]
    fn weapon_without_projectile_is_rejected() {
        let mut config = SimulationConfig::default();
        config.items[0].projectile = None;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingProjectile { item: 0 })
        ));
    }

    #[test]
    fn gear_without_projectile_is_accepted() {
        let config = SimulationConfig::default();
        assert_eq!(config.items[2].projectile, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn short_count_table_is_rejected() {
        let mut config = SimulationConfig::default();
        config.items[1].counts.truncate(2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LevelTableMismatch { item: 1 })
        ));
    }

    fn rejected_field(config: &SimulationConfig) -> Option<&'static str> {
        match config.validate() {
            Err(ConfigError::NonPositive { field }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn non_positive_values_are_rejected() {
        type Edit = fn(&mut SimulationConfig);
        let cases: [(Edit, &str); 12] = [
            (
                |c| c.world.play_area_half_extents.y = 0.0,
                "world.play_area_half_extents",
            ),
            (|c| c.world.anchor_radius = -0.4, "world.anchor_radius"),
            (
                |c| c.world.anchor_base_speed = -1.0,
                "world.anchor_base_speed",
            ),
            (|c| c.world.projectile_speed = 0.0, "world.projectile_speed"),
            (
                |c| c.world.knockback_impulse = -3.0,
                "world.knockback_impulse",
            ),
            (|c| c.world.orbit_radius = 0.0, "world.orbit_radius"),
            (|c| c.world.enemy_kinds[1].radius = 0.0, "world.kinds.radius"),
            (|c| c.waves.tiers[0].speed = -2.0, "waves.tiers.speed"),
            (|c| c.scanner.radius = 0.0, "scanner.radius"),
            (
                |c| c.weapons.orbit_base_speed = -150.0,
                "weapons.orbit_base_speed",
            ),
            (
                |c| c.weapons.fire_base_interval = Duration::ZERO,
                "weapons.fire_base_interval",
            ),
            (
                |c| c.session.anchor_max_health = 0.0,
                "session.anchor_max_health",
            ),
        ];

        for (edit, expected) in cases {
            let mut config = SimulationConfig::default();
            edit(&mut config);
            assert_eq!(rejected_field(&config), Some(expected));
        }
    }

    #[test]
    fn nan_values_are_rejected() {
        let mut config = SimulationConfig::default();
        config.scanner.radius = f32::NAN;
        assert_eq!(rejected_field(&config), Some("scanner.radius"));

        let mut config = SimulationConfig::default();
        config.world.knockback_impulse = f32::NAN;
        assert_eq!(rejected_field(&config), Some("world.knockback_impulse"));

        let mut config = SimulationConfig::default();
        config.waves.tiers[2].speed = f32::NAN;
        assert_eq!(rejected_field(&config), Some("waves.tiers.speed"));
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        let error = SimulationConfig::from_toml_str("speeed = 3").expect_err("typo rejected");
        assert!(matches!(error, ConfigError::Parse(_)));
    }
}
