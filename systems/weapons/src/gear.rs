//! Passive gear.

use horde_survival_core::{Command, StatSource, WeaponTuning};

use crate::weapon::Weapon;

/// Passive equipment that rewrites derived stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GearKind {
    /// Speeds up every weapon's cadence.
    Glove,
    /// Speeds up the anchor.
    Shoe,
}

/// Equipped gear and its current rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gear {
    kind: GearKind,
    rate: f32,
}

impl Gear {
    /// Creates gear with its first-level rate.
    #[must_use]
    pub fn new(kind: GearKind, rate: f32) -> Self {
        Self { kind, rate }
    }

    /// Kind of the gear.
    #[must_use]
    pub fn kind(&self) -> GearKind {
        self.kind
    }

    /// Current rate.
    #[must_use]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Replaces the rate.
    pub fn level_up(&mut self, rate: f32) {
        self.rate = rate;
    }

    /// Recomputes the stats this gear owns.
    ///
    /// Gloves rewrite weapon cadence in place; shoes request a new anchor speed
    /// derived from `anchor_base_speed`.
    pub fn apply(
        &self,
        weapons: &mut [Weapon],
        tuning: &WeaponTuning,
        anchor_base_speed: f32,
        stats: &dyn StatSource,
        out: &mut Vec<Command>,
    ) {
        match self.kind {
            GearKind::Glove => {
                for weapon in weapons {
                    weapon.apply_rate(tuning, stats, self.rate);
                }
            }
            GearKind::Shoe => {
                let speed = anchor_base_speed * stats.speed_multiplier();
                out.push(Command::SetAnchorSpeed {
                    speed: speed + speed * self.rate,
                });
            }
        }
    }
}
