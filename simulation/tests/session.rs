use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use horde_survival_core::{
    ActorKind, Event, NeutralStats, SessionState, SimulationConfig, Vec2,
};
use horde_survival_simulation::Simulation;
use horde_survival_system_weapons::Upgrade;
use horde_survival_world::query;

const STEP: Duration = Duration::from_millis(20);

fn run_until<S>(
    simulation: &mut Simulation<S>,
    max_steps: usize,
    mut done: impl FnMut(&Simulation<S>) -> bool,
) -> bool
where
    S: horde_survival_core::StatSource,
{
    for _ in 0..max_steps {
        let _ = simulation.fixed_step(STEP);
        simulation.variable_step();
        if done(simulation) {
            return true;
        }
    }
    false
}

#[test]
fn invalid_configuration_is_rejected_before_ticking() {
    let mut config = SimulationConfig::default();
    config.waves.tiers.clear();
    assert!(Simulation::new(config).is_err());
}

#[test]
fn starting_item_arms_the_anchor() {
    let simulation = Simulation::new(SimulationConfig::default()).expect("valid config");
    assert_eq!(simulation.loadout().weapons().len(), 1);
    assert_eq!(simulation.loadout().item_level(0), Some(1));
    assert_eq!(
        query::active_count(simulation.world(), ActorKind::new(2)),
        3,
        "orbital ring laid out"
    );
    assert_eq!(simulation.state(), SessionState::Live);
}

#[test]
fn session_survives_to_victory_and_clears_enemies() {
    let mut config = SimulationConfig::default();
    config.session.max_time = Duration::from_secs(5);
    config.session.contact_damage_per_second = 0.0;
    config.session.next_exp = vec![u32::MAX];

    let mut simulation = Simulation::new(config).expect("valid config");
    let finished = run_until(&mut simulation, 1_000, |sim| sim.state().is_finished());

    assert!(finished, "session ended");
    assert_eq!(simulation.state(), SessionState::Victory);
    assert_eq!(simulation.clock().elapsed(), Duration::from_secs(5));
    assert!(query::enemy_view(simulation.world()).is_empty());

    let elapsed = simulation.clock().elapsed();
    assert!(simulation.fixed_step(STEP).is_empty(), "finished sessions stay frozen");
    assert_eq!(simulation.clock().elapsed(), elapsed);
}

#[test]
fn unarmed_anchor_is_overrun() {
    let mut config = SimulationConfig::default();
    config.starting_item = 2;
    config.session.contact_damage_per_second = 1_000.0;

    let mut simulation = Simulation::with_stats(config, NeutralStats).expect("valid config");
    assert!(simulation.loadout().weapons().is_empty());

    let finished = run_until(&mut simulation, 3_000, |sim| sim.state().is_finished());
    assert!(finished, "session ended");
    assert_eq!(simulation.state(), SessionState::Defeat);
    assert!(simulation.vitals().health() < 0.0);
}

#[test]
fn first_kill_pauses_for_upgrade_choice() {
    let mut config = SimulationConfig::default();
    config.items[0].base_damage = 1_000.0;
    config.session.contact_damage_per_second = 0.0;
    config.session.next_exp = vec![1, 1_000];

    let mut simulation = Simulation::new(config).expect("valid config");
    let leveled = run_until(&mut simulation, 5_000, |sim| {
        sim.state() == SessionState::LevelUp
    });
    assert!(leveled, "an enemy reached the ring");
    assert_eq!(simulation.progression().level(), 1);
    assert!(simulation.progression().kills() >= 1);

    let elapsed = simulation.clock().elapsed();
    assert!(simulation.fixed_step(STEP).is_empty(), "frozen during level-up");
    assert_eq!(simulation.clock().elapsed(), elapsed);

    let offer = simulation.offer().to_vec();
    assert_eq!(offer.len(), 3);
    let not_offered = (0..5).find(|item| !offer.contains(item)).expect("five items");
    assert_eq!(simulation.select_upgrade(not_offered), Upgrade::Ignored);
    assert_eq!(simulation.state(), SessionState::LevelUp);

    assert_ne!(simulation.select_upgrade(offer[0]), Upgrade::Ignored);
    assert_eq!(simulation.state(), SessionState::Live);
    assert_eq!(
        simulation.select_upgrade(offer[1]),
        Upgrade::Ignored,
        "one choice per level-up"
    );
}

#[test]
fn pause_freezes_and_resume_continues() {
    let mut simulation = Simulation::new(SimulationConfig::default()).expect("valid config");
    let _ = simulation.fixed_step(STEP);
    assert!(simulation.pause());

    let elapsed = simulation.clock().elapsed();
    for _ in 0..10 {
        assert!(simulation.fixed_step(STEP).is_empty());
    }
    assert_eq!(simulation.clock().elapsed(), elapsed);

    assert!(simulation.resume());
    let events = simulation.fixed_step(STEP).to_vec();
    assert!(events.contains(&Event::TimeAdvanced { dt: STEP }));
}

#[test]
fn anchor_input_moves_anchor_at_configured_speed() {
    let mut config = SimulationConfig::default();
    config.stats.speed = 2.0;
    let mut simulation = Simulation::new(config).expect("valid config");

    simulation.set_input(Vec2::X);
    for _ in 0..50 {
        let _ = simulation.fixed_step(STEP);
    }
    let anchor = query::anchor(simulation.world());
    assert_eq!(anchor.speed, 6.0);
    assert!((anchor.position.x - 6.0).abs() < 1e-3);
}

#[test]
fn identical_seeds_replay_identically() {
    let first = replay(0x5eed);
    let second = replay(0x5eed);
    assert_eq!(first, second, "replay diverged between runs");
}

fn replay(seed: u64) -> u64 {
    let mut config = SimulationConfig::default();
    config.seed = seed;
    config.session.max_time = Duration::from_secs(40);

    let mut simulation = Simulation::new(config).expect("valid config");
    let mut hasher = DefaultHasher::new();

    for step in 0..2_500_u32 {
        let angle = step as f32 * 0.01;
        simulation.set_input(Vec2::new(angle.cos(), angle.sin()));
        let events = simulation.fixed_step(STEP).to_vec();
        simulation.variable_step();
        for event in &events {
            format!("{event:?}").hash(&mut hasher);
        }
        if simulation.state() == SessionState::LevelUp {
            let choice = simulation.offer()[0];
            let _ = simulation.select_upgrade(choice);
        }
        if simulation.state().is_finished() {
            break;
        }
    }

    for enemy in query::enemy_view(simulation.world()).iter() {
        enemy.position.x.to_bits().hash(&mut hasher);
        enemy.position.y.to_bits().hash(&mut hasher);
    }
    simulation.progression().kills().hash(&mut hasher);
    hasher.finish()
}
