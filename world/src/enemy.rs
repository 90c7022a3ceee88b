//! Hostile actors that chase the anchor, recoil from hits and die.

use std::time::Duration;

use horde_survival_core::{EnemyPhase, Vec2, WaveTier};

/// Hostile actor pursuing the anchor.
#[derive(Clone, Debug, Default)]
pub(crate) struct Enemy {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) facing_left: bool,
    pub(crate) inside_area: bool,
    velocity: Vec2,
    health: f32,
    max_health: f32,
    speed: f32,
    phase: Phase,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Phase {
    #[default]
    Chasing,
    Recoiling {
        remaining: Duration,
    },
    Dead,
}

/// Result of a projectile striking an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Impact {
    Ignored,
    Wounded { remaining_health: f32 },
    Killed,
}

impl Enemy {
    /// Resets the actor for a fresh activation drawn from `tier`.
    pub(crate) fn init(&mut self, tier: &WaveTier, position: Vec2, radius: f32) {
        let health = tier.health as f32;
        *self = Self {
            position,
            radius,
            facing_left: false,
            inside_area: false,
            velocity: Vec2::ZERO,
            health,
            max_health: health,
            speed: tier.speed,
            phase: Phase::Chasing,
        };
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.phase != Phase::Dead
    }

    pub(crate) fn health(&self) -> f32 {
        self.health
    }

    pub(crate) fn max_health(&self) -> f32 {
        self.max_health
    }

    pub(crate) fn phase(&self) -> EnemyPhase {
        match self.phase {
            Phase::Chasing => EnemyPhase::Chasing,
            Phase::Recoiling { .. } => EnemyPhase::HitReaction,
            Phase::Dead => EnemyPhase::Dead,
        }
    }

    /// Advances movement by one fixed step.
    ///
    /// Chasing moves straight at the anchor and discards residual velocity;
    /// recoiling drifts along the knockback velocity until the reaction ends.
    pub(crate) fn steer(&mut self, anchor: Vec2, dt: Duration) {
        let seconds = dt.as_secs_f32();
        match self.phase {
            Phase::Chasing => {
                let direction = (anchor - self.position).normalize_or_zero();
                self.position += direction * self.speed * seconds;
                self.velocity = Vec2::ZERO;
            }
            Phase::Recoiling { remaining } => {
                self.position += self.velocity * seconds;
                let remaining = remaining.saturating_sub(dt);
                self.phase = if remaining.is_zero() {
                    Phase::Chasing
                } else {
                    Phase::Recoiling { remaining }
                };
            }
            Phase::Dead => {}
        }
    }

    pub(crate) fn take_hit(&mut self, damage: f32, reaction: Duration) -> Impact {
        if !self.is_alive() {
            return Impact::Ignored;
        }

        self.health -= damage;
        if self.health > 0.0 {
            self.phase = Phase::Recoiling {
                remaining: reaction,
            };
            Impact::Wounded {
                remaining_health: self.health,
            }
        } else {
            self.die();
            Impact::Killed
        }
    }

    /// Pushes the actor away from the anchor.
    pub(crate) fn knock_back(&mut self, anchor: Vec2, impulse: f32) {
        if !self.is_alive() {
            return;
        }
        let direction = (self.position - anchor).normalize_or_zero();
        self.velocity += direction * impulse;
    }

    /// Returns `false` when the actor was already dead.
    pub(crate) fn kill(&mut self) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.die();
        true
    }

    pub(crate) fn face(&mut self, anchor: Vec2) {
        self.facing_left = anchor.x < self.position.x;
    }

    fn die(&mut self) {
        self.phase = Phase::Dead;
        self.velocity = Vec2::ZERO;
    }
}
