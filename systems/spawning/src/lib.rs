#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting enemy spawn commands.

use std::time::Duration;

use horde_survival_core::{Command, Event, SessionState, Vec2, WaveConfig, WaveTier};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Debug)]
pub struct Config {
    tiers: Vec<WaveTier>,
    thresholds: Vec<Duration>,
    spawn_points: Vec<Vec2>,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration from validated wave settings and a stream seed.
    #[must_use]
    pub fn new(waves: &WaveConfig, rng_seed: u64) -> Self {
        Self {
            tiers: waves.tiers.clone(),
            thresholds: waves.thresholds.clone(),
            spawn_points: waves.spawn_points.clone(),
            rng_seed,
        }
    }
}

/// Pure system that emits one spawn command whenever its timer passes half
/// of the active tier's interval.
#[derive(Debug)]
pub struct WaveScheduler {
    tiers: Vec<WaveTier>,
    thresholds: Vec<Duration>,
    spawn_points: Vec<Vec2>,
    timer: Duration,
    rng: ChaCha8Rng,
}

impl WaveScheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            tiers: config.tiers,
            thresholds: config.thresholds,
            spawn_points: config.spawn_points,
            timer: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Index of the tier active at `elapsed`.
    ///
    /// Counts the thresholds already reached, clamped to the last tier.
    #[must_use]
    pub fn tier_index(&self, elapsed: Duration) -> usize {
        let reached = self
            .thresholds
            .iter()
            .take_while(|threshold| **threshold <= elapsed)
            .count();
        reached.min(self.tiers.len().saturating_sub(1))
    }

    /// Time accumulated toward the next spawn.
    #[must_use]
    pub fn timer(&self) -> Duration {
        self.timer
    }

    /// Consumes events and the anchor position to emit spawn commands.
    ///
    /// Nothing accumulates while the session is not live; the timer keeps its
    /// value until the session resumes.
    pub fn handle(
        &mut self,
        events: &[Event],
        session: SessionState,
        elapsed: Duration,
        anchor: Vec2,
        out: &mut Vec<Command>,
    ) {
        if !session.is_live() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.timer = self.timer.saturating_add(accumulated);

        let Some(tier) = self.tiers.get(self.tier_index(elapsed)).copied() else {
            return;
        };
        if self.timer <= tier.spawn_interval / 2 {
            return;
        }

        self.timer = Duration::ZERO;
        if let Some(offset) = self.select_spawn_point() {
            out.push(Command::SpawnEnemy {
                position: anchor + offset,
                tier,
            });
        }
    }

    /// Picks a point uniformly from every index but the origin at zero.
    fn select_spawn_point(&mut self) -> Option<Vec2> {
        if self.spawn_points.len() < 2 {
            return None;
        }
        let index = self.rng.gen_range(1..self.spawn_points.len());
        self.spawn_points.get(index).copied()
    }
}
