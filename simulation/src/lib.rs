#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick orchestration for a Horde Survival session.
//!
//! A [`Simulation`] threads the world, the session clock and every system
//! through each tick: the fixed phase advances the world and lets systems
//! answer with commands, the variable phase refreshes presentation state once
//! all fixed-step effects have landed.

use std::time::Duration;

use horde_survival_core::{
    derive_stream_seed, Command, ConfigError, Event, SessionState, SimulationConfig, StatMultipliers,
    StatSource, Vec2,
};
use horde_survival_system_progression::{Progression, SessionClock, Vitals};
use horde_survival_system_spawning::{Config as SpawningConfig, WaveScheduler};
use horde_survival_system_targeting::{ProximityScanner, ScanTarget};
use horde_survival_system_weapons::{Loadout, Upgrade};
use horde_survival_world::{self as world, query, World};
use tracing::{debug, info};

const WORLD_STREAM: &str = "world";
const SPAWNING_STREAM: &str = "spawning";
const OFFER_STREAM: &str = "offers";

/// Complete session state together with every system.
#[derive(Debug)]
pub struct Simulation<S = StatMultipliers> {
    stats: S,
    world: World,
    clock: SessionClock,
    progression: Progression,
    vitals: Vitals,
    scheduler: WaveScheduler,
    scanner: ProximityScanner,
    loadout: Loadout,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation<StatMultipliers> {
    /// Builds a session using the configuration's flat stat multipliers.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        let stats = config.stats;
        Self::with_stats(config, stats)
    }
}

impl<S: StatSource> Simulation<S> {
    /// Builds a session using a custom stat source.
    ///
    /// The configuration is validated first, then the starting item is
    /// selected so the anchor begins armed.
    pub fn with_stats(config: SimulationConfig, stats: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed;
        let mut simulation = Self {
            world: World::new(&config.world, derive_stream_seed(seed, WORLD_STREAM)),
            clock: SessionClock::new(config.session.max_time),
            progression: Progression::new(config.session.next_exp.clone()),
            vitals: Vitals::new(&config.session),
            scheduler: WaveScheduler::new(SpawningConfig::new(
                &config.waves,
                derive_stream_seed(seed, SPAWNING_STREAM),
            )),
            scanner: ProximityScanner::new(config.scanner.radius),
            loadout: Loadout::new(
                config.items,
                config.weapons,
                config.world.anchor_base_speed,
                derive_stream_seed(seed, OFFER_STREAM),
            ),
            events: Vec::new(),
            commands: Vec::new(),
            stats,
        };

        simulation.commands.push(Command::SetAnchorSpeed {
            speed: config.world.anchor_base_speed * simulation.stats.speed_multiplier(),
        });
        let upgrade =
            simulation
                .loadout
                .select(config.starting_item, &simulation.stats, &mut simulation.commands);
        debug!(item = config.starting_item, ?upgrade, "starting item selected");
        simulation.flush_commands();
        simulation.events.clear();

        info!(seed, "session started");
        Ok(simulation)
    }

    /// Updates the anchor's movement input.
    pub fn set_input(&mut self, direction: Vec2) {
        world::apply(
            &mut self.world,
            Command::SetAnchorInput { direction },
            &mut self.events,
        );
    }

    /// Runs one fixed step and returns the events it produced.
    ///
    /// Does nothing unless the session is live.
    pub fn fixed_step(&mut self, dt: Duration) -> &[Event] {
        self.events.clear();
        self.commands.clear();
        if !self.clock.is_live() {
            return &self.events;
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        if self.clock.advance(dt, &mut self.commands) {
            info!(elapsed = ?self.clock.elapsed(), "session won");
        }
        let gained = self.progression.handle(&self.events, &mut self.clock);
        if self.vitals.handle(&self.events, &mut self.clock) {
            info!(elapsed = ?self.clock.elapsed(), "session lost");
        }

        let anchor = query::anchor(&self.world).position;
        let target = self
            .scanner
            .handle(anchor, &query::enemy_view(&self.world))
            .map(|target| target.position);

        self.scheduler.handle(
            &self.events,
            self.clock.state(),
            self.clock.elapsed(),
            anchor,
            &mut self.commands,
        );
        if self.clock.is_live() {
            self.loadout.update(dt, anchor, target, &mut self.commands);
        }

        let first_new = self.events.len();
        self.flush_commands();
        let gained = gained
            + self
                .progression
                .handle(&self.events[first_new..], &mut self.clock);

        if gained > 0 {
            let offer = self.loadout.roll_offer();
            info!(level = self.progression.level(), ?offer, "level up");
        }

        &self.events
    }

    /// Runs the variable step, refreshing facing flags.
    pub fn variable_step(&mut self) {
        if self.clock.is_live() {
            world::apply(&mut self.world, Command::RefreshFacing, &mut self.events);
        }
    }

    /// Applies one of the offered items and resumes the session.
    ///
    /// Ignored unless the session is waiting for a level-up choice and the
    /// item is on offer.
    pub fn select_upgrade(&mut self, item: usize) -> Upgrade {
        if self.clock.state() != SessionState::LevelUp || !self.loadout.offer().contains(&item) {
            return Upgrade::Ignored;
        }

        self.commands.clear();
        let upgrade = self.loadout.select(item, &self.stats, &mut self.commands);
        if upgrade == Upgrade::Healed {
            self.vitals.heal();
        }
        self.flush_commands();
        let _ = self.clock.finish_level_up();
        debug!(item, ?upgrade, "upgrade selected");
        upgrade
    }

    /// Freezes a live session.
    pub fn pause(&mut self) -> bool {
        self.clock.pause()
    }

    /// Unfreezes a paused session.
    pub fn resume(&mut self) -> bool {
        self.clock.resume()
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.clock.state()
    }

    /// Items offered for the pending level-up.
    #[must_use]
    pub fn offer(&self) -> &[usize] {
        self.loadout.offer()
    }

    /// Nearest target found by the latest fixed step.
    #[must_use]
    pub fn nearest(&self) -> Option<ScanTarget> {
        self.scanner.nearest()
    }

    /// Authoritative world state.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Session clock.
    #[must_use]
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Kills, experience and level.
    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Anchor health.
    #[must_use]
    pub fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    /// Items, weapons and gear.
    #[must_use]
    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
