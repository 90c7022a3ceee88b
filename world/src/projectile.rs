//! Pooled projectiles and their penetration budget.
//!
//! [`PENETRATION_INFINITE`] marks a ring child that never flies or runs out.
//! Every other projectile loses one point per enemy it enters and is spent once
//! the budget drops below zero.

use horde_survival_core::{ActorHandle, Vec2, PENETRATION_INFINITE};

/// Projectile drawn from a pool, either free-flying or attached to a ring.
#[derive(Clone, Debug, Default)]
pub(crate) struct Projectile {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) inside_area: bool,
    /// Enemies overlapped at the end of the previous tick.
    pub(crate) contacts: Vec<ActorHandle>,
    velocity: Vec2,
    damage: f32,
    penetration: i32,
}

/// Result of a projectile entering an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Penetration {
    Ignored,
    Continued,
    Spent,
}

impl Projectile {
    /// Resets the projectile; only finite penetration launches it.
    pub(crate) fn init(
        &mut self,
        damage: f32,
        penetration: i32,
        direction: Vec2,
        speed: f32,
        position: Vec2,
        radius: f32,
    ) {
        self.position = position;
        self.radius = radius;
        self.inside_area = true;
        self.contacts.clear();
        self.damage = damage;
        self.penetration = penetration;
        self.velocity = if penetration >= 0 {
            direction * speed
        } else {
            Vec2::ZERO
        };
    }

    pub(crate) fn is_infinite(&self) -> bool {
        self.penetration == PENETRATION_INFINITE
    }

    pub(crate) fn damage(&self) -> f32 {
        self.damage
    }

    pub(crate) fn penetration(&self) -> i32 {
        self.penetration
    }

    pub(crate) fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub(crate) fn advance(&mut self, seconds: f32) {
        self.position += self.velocity * seconds;
    }

    /// Consumes one unit of penetration for an impact.
    pub(crate) fn on_impact(&mut self) -> Penetration {
        if self.is_infinite() {
            return Penetration::Ignored;
        }

        self.penetration -= 1;
        if self.penetration < 0 {
            self.velocity = Vec2::ZERO;
            Penetration::Spent
        } else {
            Penetration::Continued
        }
    }
}
