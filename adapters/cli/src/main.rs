#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Horde Survival session.

use std::{fs, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use horde_survival_core::{derive_stream_seed, SessionState, SimulationConfig, Vec2};
use horde_survival_simulation::Simulation;
use horde_survival_system_weapons::Upgrade;
use horde_survival_world::query;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");
const UPGRADE_STREAM: &str = "cli-upgrades";
const PROGRESS_INTERVAL: Duration = Duration::from_secs(30);

/// Runs a headless Horde Survival session and prints its outcome.
#[derive(Debug, Parser)]
#[command(name = "horde-survival", version)]
struct Args {
    /// TOML file overriding the built-in tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Master seed; replaces the configured one.
    #[arg(long)]
    seed: Option<u64>,
    /// Session length in seconds; replaces the configured one.
    #[arg(long)]
    seconds: Option<f32>,
    /// Fixed steps per simulated second.
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(1..))]
    fixed_hz: u32,
    /// How level-up offers are answered.
    #[arg(long, value_enum, default_value_t = UpgradeChoice::First)]
    upgrade_choice: UpgradeChoice,
}

/// Strategy used to pick an item from a level-up offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum UpgradeChoice {
    /// Always takes the first offered item.
    First,
    /// Picks uniformly among the offered items.
    Random,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("horde_survival=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let summary = run(config, args.fixed_hz, args.upgrade_choice)?;
    println!("{summary}");
    Ok(())
}

fn load_config(args: &Args) -> Result<SimulationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SimulationConfig::from_toml_str(&contents)
                .with_context(|| format!("invalid configuration in {}", path.display()))?
        }
        None => SimulationConfig::from_toml_str(DEFAULT_CONFIG)
            .context("built-in configuration is invalid")?,
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(seconds) = args.seconds {
        config.session.max_time = Duration::try_from_secs_f32(seconds)
            .with_context(|| format!("invalid session length {seconds}"))?;
    }
    Ok(config)
}

/// Final state of a finished session.
#[derive(Debug)]
struct Summary {
    outcome: SessionState,
    elapsed: Duration,
    kills: u32,
    level: u32,
    health: f32,
    pools: Vec<(u16, usize, usize)>,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "outcome: {:?}", self.outcome)?;
        writeln!(f, "elapsed: {:.2}s", self.elapsed.as_secs_f32())?;
        writeln!(f, "kills: {}", self.kills)?;
        writeln!(f, "level: {}", self.level)?;
        write!(f, "health: {:.1}", self.health)?;
        for (kind, size, active) in &self.pools {
            write!(f, "\npool {kind}: {size} slots, {active} active")?;
        }
        Ok(())
    }
}

fn run(config: SimulationConfig, fixed_hz: u32, choice: UpgradeChoice) -> Result<Summary> {
    let dt = Duration::from_secs(1) / fixed_hz;
    let max_steps = (config.session.max_time.as_secs_f64() * f64::from(fixed_hz)).ceil() as u64
        + u64::from(fixed_hz);
    let mut rng = ChaCha8Rng::seed_from_u64(derive_stream_seed(config.seed, UPGRADE_STREAM));

    let mut simulation = Simulation::new(config).context("configuration rejected")?;
    println!("{}", query::welcome_banner(simulation.world()));

    let mut next_report = PROGRESS_INTERVAL;
    for _ in 0..max_steps {
        simulation.set_input(flee_direction(&simulation));
        let _ = simulation.fixed_step(dt);
        simulation.variable_step();

        if simulation.state() == SessionState::LevelUp {
            let offer = simulation.offer().to_vec();
            let item = match choice {
                UpgradeChoice::First => offer.first().copied(),
                UpgradeChoice::Random => offer.choose(&mut rng).copied(),
            };
            let Some(item) = item else {
                bail!("level-up offered no items");
            };
            if simulation.select_upgrade(item) == Upgrade::Ignored {
                bail!("offered item {item} was not accepted");
            }
        }

        if simulation.clock().elapsed() >= next_report {
            info!(
                elapsed = ?simulation.clock().elapsed(),
                kills = simulation.progression().kills(),
                level = simulation.progression().level(),
                health = simulation.vitals().health(),
                "progress"
            );
            next_report += PROGRESS_INTERVAL;
        }

        if simulation.state().is_finished() {
            break;
        }
    }

    if !simulation.state().is_finished() {
        bail!(
            "session still {:?} after {max_steps} steps",
            simulation.state()
        );
    }

    let world = simulation.world();
    let pools = query::enemy_kinds(world)
        .into_iter()
        .chain(query::projectile_kinds(world))
        .map(|kind| {
            (
                kind.get(),
                query::pool_size(world, kind),
                query::active_count(world, kind),
            )
        })
        .collect();

    Ok(Summary {
        outcome: simulation.state(),
        elapsed: simulation.clock().elapsed(),
        kills: simulation.progression().kills(),
        level: simulation.progression().level(),
        health: simulation.vitals().health(),
        pools,
    })
}

/// Steers the anchor straight away from the nearest scanned enemy.
fn flee_direction(simulation: &Simulation) -> Vec2 {
    let anchor = query::anchor(simulation.world()).position;
    simulation
        .nearest()
        .map(|target| (anchor - target.position).normalize_or_zero())
        .unwrap_or(Vec2::ZERO)
}
