//! Effects scheduled during one tick and resolved at the start of the next.
//!
//! A hit that kills an enemy frees its slot at once, and a spawn later in the
//! same fixed step may reuse it. Under the default policy the pending knockback
//! then lands on the new occupant; this is routine and logged at debug level.

use horde_survival_core::{ActorHandle, Event, StaleEffectPolicy, Vec2};
use tracing::debug;

use crate::{enemy::Enemy, pool::ActorPool};

/// Knockbacks scheduled during one tick and applied at the start of the next.
#[derive(Debug, Default)]
pub(crate) struct DeferredEffects {
    knockbacks: Vec<ActorHandle>,
}

impl DeferredEffects {
    pub(crate) fn schedule_knockback(&mut self, enemy: ActorHandle) {
        self.knockbacks.push(enemy);
    }

    /// Applies every pending knockback in scheduling order.
    ///
    /// A handle whose slot was recycled reaches the new occupant only under
    /// [`StaleEffectPolicy::Apply`]; a released slot always drops the effect.
    pub(crate) fn resolve(
        &mut self,
        enemies: &mut ActorPool<Enemy>,
        anchor: Vec2,
        impulse: f32,
        policy: StaleEffectPolicy,
        out_events: &mut Vec<Event>,
    ) {
        for enemy in self.knockbacks.drain(..) {
            if let Some(target) = enemies.resolve_mut(enemy) {
                target.knock_back(anchor, impulse);
                out_events.push(Event::KnockbackApplied {
                    enemy,
                    stale: false,
                });
                continue;
            }

            match (policy, enemies.occupant_mut(enemy)) {
                (StaleEffectPolicy::Apply, Some((current, target))) => {
                    debug!(
                        scheduled = ?enemy,
                        occupant = ?current,
                        "knockback reached a recycled slot"
                    );
                    target.knock_back(anchor, impulse);
                    out_events.push(Event::KnockbackApplied { enemy, stale: true });
                }
                _ => out_events.push(Event::KnockbackDiscarded { enemy }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horde_survival_core::{ActorKind, WaveTier};
    use std::time::Duration;

    const KIND: ActorKind = ActorKind::new(0);

    fn spawn(enemies: &mut ActorPool<Enemy>) -> ActorHandle {
        let tier = WaveTier {
            spawn_interval: Duration::from_secs(1),
            actor_kind: KIND,
            health: 10,
            speed: 1.0,
        };
        let (handle, enemy) = enemies.get(KIND).expect("registered");
        enemy.init(&tier, Vec2::new(0.0, 3.0), 0.45);
        handle
    }

    fn pool() -> ActorPool<Enemy> {
        let mut enemies = ActorPool::new();
        assert!(enemies.register(KIND));
        enemies
    }

    fn resolve(
        effects: &mut DeferredEffects,
        enemies: &mut ActorPool<Enemy>,
        policy: StaleEffectPolicy,
    ) -> Vec<Event> {
        let mut events = Vec::new();
        effects.resolve(enemies, Vec2::ZERO, 3.0, policy, &mut events);
        events
    }

    #[test]
    fn recycled_slot_receives_knockback_under_apply() {
        let mut enemies = pool();
        let mut effects = DeferredEffects::default();
        let enemy = spawn(&mut enemies);
        effects.schedule_knockback(enemy);
        assert!(enemies.release(enemy));
        let replacement = spawn(&mut enemies);
        assert_eq!(replacement.slot(), enemy.slot());

        let events = resolve(&mut effects, &mut enemies, StaleEffectPolicy::Apply);
        assert_eq!(events, vec![Event::KnockbackApplied { enemy, stale: true }]);
    }

    #[test]
    fn released_slot_drops_knockback() {
        let mut enemies = pool();
        let mut effects = DeferredEffects::default();
        let enemy = spawn(&mut enemies);
        effects.schedule_knockback(enemy);
        assert!(enemies.release(enemy));

        let events = resolve(&mut effects, &mut enemies, StaleEffectPolicy::Apply);
        assert_eq!(events, vec![Event::KnockbackDiscarded { enemy }]);
        assert!(
            resolve(&mut effects, &mut enemies, StaleEffectPolicy::Apply).is_empty(),
            "pending effects are drained"
        );
    }
}
