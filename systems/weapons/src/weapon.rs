//! Weapon archetypes and the cadence that drives them.
//!
//! Orbital weapons rotate their ring every step and re-arrange it on level-up.
//! Targeted weapons accumulate time and fire one projectile at the nearest
//! scanned enemy once the interval is exceeded.

use std::time::Duration;

use horde_survival_core::{
    ActorKind, Command, StatSource, Vec2, WeaponArchetype, WeaponId, WeaponTuning,
};

/// Blueprint describing how a weapon is created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponSpec {
    /// Kind identifier; `0` selects the orbital archetype.
    pub kind: u32,
    /// Pool projectiles are drawn from.
    pub projectile: ActorKind,
    /// Damage before the damage multiplier.
    pub base_damage: f32,
    /// Projectile count before the bonus count.
    pub base_count: u32,
}

/// How often a weapon acts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cadence {
    /// Ring rotation in degrees per second.
    Orbit {
        /// Clockwise rotation speed.
        degrees_per_second: f32,
    },
    /// Periodic single shots.
    Fire {
        /// Time the timer must exceed before a shot.
        interval: Duration,
        /// Time accumulated since the last shot attempt.
        timer: Duration,
    },
}

/// Equipped weapon driving either an orbital ring or targeted shots.
#[derive(Clone, Debug)]
pub struct Weapon {
    id: WeaponId,
    archetype: WeaponArchetype,
    projectile: ActorKind,
    damage: f32,
    count: u32,
    cadence: Cadence,
}

impl Weapon {
    /// Creates a weapon, scaling its stats by the stat source.
    ///
    /// Orbital weapons immediately request their ring.
    pub fn init(
        id: WeaponId,
        spec: WeaponSpec,
        tuning: &WeaponTuning,
        stats: &dyn StatSource,
        out: &mut Vec<Command>,
    ) -> Self {
        let archetype = WeaponArchetype::from_kind(spec.kind);
        let mut weapon = Self {
            id,
            archetype,
            projectile: spec.projectile,
            damage: spec.base_damage * stats.damage_multiplier(),
            count: spec.base_count + stats.bonus_projectile_count(),
            cadence: Cadence::Orbit {
                degrees_per_second: 0.0,
            },
        };
        weapon.apply_rate(tuning, stats, 0.0);
        if archetype == WeaponArchetype::Orbital {
            weapon.arrange(out);
        }
        weapon
    }

    /// Identifier of the weapon.
    #[must_use]
    pub fn id(&self) -> WeaponId {
        self.id
    }

    /// Emission behaviour of the weapon.
    #[must_use]
    pub fn archetype(&self) -> WeaponArchetype {
        self.archetype
    }

    /// Damage dealt per impact.
    #[must_use]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    /// Ring size for orbital weapons, penetration for targeted ones.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Current cadence.
    #[must_use]
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Advances the weapon by `dt`.
    ///
    /// Targeted weapons reset their timer whenever it exceeds the interval,
    /// firing only when a target is known.
    pub fn update(
        &mut self,
        dt: Duration,
        origin: Vec2,
        target: Option<Vec2>,
        out: &mut Vec<Command>,
    ) {
        match &mut self.cadence {
            Cadence::Orbit { degrees_per_second } => {
                out.push(Command::RotateOrbit {
                    weapon: self.id,
                    degrees: *degrees_per_second * dt.as_secs_f32(),
                });
            }
            Cadence::Fire { interval, timer } => {
                *timer = timer.saturating_add(dt);
                if *timer <= *interval {
                    return;
                }
                *timer = Duration::ZERO;

                let Some(target) = target else {
                    return;
                };
                out.push(Command::FireProjectile {
                    kind: self.projectile,
                    origin,
                    direction: (target - origin).normalize_or_zero(),
                    damage: self.damage,
                    penetration: i32::try_from(self.count).unwrap_or(i32::MAX),
                });
            }
        }
    }

    /// Replaces the damage and grows the projectile count.
    ///
    /// Callers refresh gear afterwards.
    pub fn level_up(
        &mut self,
        damage: f32,
        added_count: u32,
        stats: &dyn StatSource,
        out: &mut Vec<Command>,
    ) {
        self.damage = damage * stats.damage_multiplier();
        self.count = self.count.saturating_add(added_count);
        if self.archetype == WeaponArchetype::Orbital {
            self.arrange(out);
        }
    }

    /// Recomputes cadence from the base tuning and a glove rate.
    pub fn apply_rate(&mut self, tuning: &WeaponTuning, stats: &dyn StatSource, rate: f32) {
        self.cadence = match (self.archetype, self.cadence) {
            (WeaponArchetype::Orbital, _) => Cadence::Orbit {
                degrees_per_second: tuning.orbit_base_speed
                    * stats.weapon_speed_multiplier()
                    * (1.0 + rate),
            },
            (WeaponArchetype::Targeted, cadence) => Cadence::Fire {
                interval: scale(
                    tuning.fire_base_interval,
                    stats.weapon_rate_multiplier() * (1.0 - rate),
                ),
                timer: match cadence {
                    Cadence::Fire { timer, .. } => timer,
                    Cadence::Orbit { .. } => Duration::ZERO,
                },
            },
        };
    }

    fn arrange(&self, out: &mut Vec<Command>) {
        out.push(Command::ArrangeOrbit {
            weapon: self.id,
            kind: self.projectile,
            count: self.count,
            damage: self.damage,
        });
    }
}

fn scale(base: Duration, factor: f32) -> Duration {
    Duration::try_from_secs_f32(base.as_secs_f32() * factor).unwrap_or_default()
}
