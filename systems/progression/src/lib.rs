#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session clock, experience curve and anchor vitals.
//!
//! These systems own the session state machine. Every other system only reads
//! it: nothing advances unless the clock reports the session as live.

use std::time::Duration;

use horde_survival_core::{Command, Event, SessionConfig, SessionState};

/// Tracks elapsed session time and the session state machine.
#[derive(Clone, Debug)]
pub struct SessionClock {
    elapsed: Duration,
    max_time: Duration,
    state: SessionState,
}

impl SessionClock {
    /// Creates a live clock that reaches victory after `max_time`.
    #[must_use]
    pub fn new(max_time: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            max_time,
            state: SessionState::Live,
        }
    }

    /// Time elapsed while the session was live.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Session length.
    #[must_use]
    pub fn max_time(&self) -> Duration {
        self.max_time
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Reports whether the simulation advances.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.state.is_live()
    }

    /// Accumulates `dt` while live.
    ///
    /// Passing `max_time` clamps the elapsed time, declares victory and asks
    /// the world to clear every enemy. Returns `true` on that transition.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) -> bool {
        if !self.is_live() {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed <= self.max_time {
            return false;
        }

        self.elapsed = self.max_time;
        self.state = SessionState::Victory;
        out.push(Command::ClearEnemies);
        true
    }

    /// Freezes a live session on request.
    pub fn pause(&mut self) -> bool {
        self.transition(SessionState::Live, SessionState::Paused)
    }

    /// Unfreezes a paused session.
    pub fn resume(&mut self) -> bool {
        self.transition(SessionState::Paused, SessionState::Live)
    }

    /// Freezes a live session until an upgrade is chosen.
    pub fn enter_level_up(&mut self) -> bool {
        self.transition(SessionState::Live, SessionState::LevelUp)
    }

    /// Resumes after an upgrade was chosen.
    pub fn finish_level_up(&mut self) -> bool {
        self.transition(SessionState::LevelUp, SessionState::Live)
    }

    /// Ends a session that has not finished yet with a defeat.
    pub fn defeat(&mut self) -> bool {
        if self.state.is_finished() {
            return false;
        }
        self.state = SessionState::Defeat;
        true
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> bool {
        if self.state != from {
            return false;
        }
        self.state = to;
        true
    }
}

/// Kill count, experience and level.
#[derive(Clone, Debug)]
pub struct Progression {
    kills: u32,
    exp: u32,
    level: u32,
    next_exp: Vec<u32>,
}

impl Progression {
    /// Creates a level-zero progression using the experience table.
    #[must_use]
    pub fn new(next_exp: Vec<u32>) -> Self {
        Self {
            kills: 0,
            exp: 0,
            level: 0,
            next_exp,
        }
    }

    /// Enemies killed this session.
    #[must_use]
    pub fn kills(&self) -> u32 {
        self.kills
    }

    /// Experience gathered toward the next level.
    #[must_use]
    pub fn exp(&self) -> u32 {
        self.exp
    }

    /// Current level.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Experience required to leave the current level; the last entry repeats.
    #[must_use]
    pub fn required_exp(&self) -> u32 {
        let last = self.next_exp.len().saturating_sub(1);
        let index = (self.level as usize).min(last);
        self.next_exp.get(index).copied().unwrap_or(u32::MAX)
    }

    /// Counts a kill.
    pub fn on_kill(&mut self) {
        self.kills = self.kills.saturating_add(1);
    }

    /// Grants one experience point, returning `true` when a level is gained.
    pub fn on_exp_gain(&mut self) -> bool {
        self.exp = self.exp.saturating_add(1);
        if self.exp != self.required_exp() {
            return false;
        }
        self.level += 1;
        self.exp = 0;
        true
    }

    /// Consumes kill events.
    ///
    /// Every kill counts, but experience is only granted while the session is
    /// live; a level-up freezes the session, so later kills in the same batch
    /// grant nothing. Returns the number of levels gained.
    pub fn handle(&mut self, events: &[Event], clock: &mut SessionClock) -> u32 {
        let mut gained = 0;
        for event in events {
            if !matches!(event, Event::EnemyKilled { .. }) {
                continue;
            }
            self.on_kill();
            if clock.is_live() && self.on_exp_gain() {
                let _ = clock.enter_level_up();
                gained += 1;
            }
        }
        gained
    }
}

/// Anchor health drained by touching enemies.
#[derive(Clone, Debug)]
pub struct Vitals {
    health: f32,
    max_health: f32,
    contact_damage_per_second: f32,
}

impl Vitals {
    /// Creates full-health vitals from the session configuration.
    #[must_use]
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            health: config.anchor_max_health,
            max_health: config.anchor_max_health,
            contact_damage_per_second: config.contact_damage_per_second,
        }
    }

    /// Current health.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    /// Restores full health.
    pub fn heal(&mut self) {
        self.health = self.max_health;
    }

    /// Drains health for every contact reported while the session is live.
    ///
    /// Health dropping below zero defeats the session. Returns `true` on that
    /// transition.
    pub fn handle(&mut self, events: &[Event], clock: &mut SessionClock) -> bool {
        for event in events {
            if !clock.is_live() {
                return false;
            }
            if let Event::AnchorContact { dt, .. } = event {
                self.health -= self.contact_damage_per_second * dt.as_secs_f32();
                if self.health < 0.0 {
                    return clock.defeat();
                }
            }
        }
        false
    }
}
