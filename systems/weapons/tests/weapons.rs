use std::time::Duration;

use horde_survival_core::{
    ActorKind, Command, Event, NeutralStats, SimulationConfig, SpentReason, Vec2, WaveTier,
    WorldConfig,
};
use horde_survival_system_targeting::ProximityScanner;
use horde_survival_system_weapons::{Loadout, Upgrade};
use horde_survival_world::{self as world, query, World};

const STEP: Duration = Duration::from_millis(20);

fn apply_all(world: &mut World, commands: Vec<Command>, events: &mut Vec<Event>) {
    for command in commands {
        world::apply(world, command, events);
    }
}

fn spawn(world: &mut World, position: Vec2, health: u32) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            position,
            tier: WaveTier {
                spawn_interval: Duration::from_secs(1),
                actor_kind: ActorKind::new(0),
                health,
                speed: 0.0,
            },
        },
        &mut events,
    );
}

fn step(
    world: &mut World,
    loadout: &mut Loadout,
    scanner: &mut ProximityScanner,
) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: STEP }, &mut events);

    let anchor = query::anchor(world).position;
    let target = scanner
        .handle(anchor, &query::enemy_view(world))
        .map(|target| target.position);
    let mut commands = Vec::new();
    loadout.update(STEP, anchor, target, &mut commands);
    apply_all(world, commands, &mut events);
    events
}

#[test]
fn targeted_weapon_spends_projectile_on_nearest_enemy() {
    let config = SimulationConfig::default();
    let mut world = World::new(&WorldConfig::default(), 1);
    let mut loadout = Loadout::new(config.items, config.weapons, 3.0, 1);
    let mut scanner = ProximityScanner::new(8.0);

    spawn(&mut world, Vec2::new(6.0, 0.0), 100);
    spawn(&mut world, Vec2::new(0.0, 3.0), 100);

    let mut commands = Vec::new();
    assert_eq!(
        loadout.select(1, &NeutralStats, &mut commands),
        Upgrade::Equipped
    );
    apply_all(&mut world, commands, &mut Vec::new());

    let mut log = Vec::new();
    for _ in 0..40 {
        log.extend(step(&mut world, &mut loadout, &mut scanner));
    }

    let fired = log
        .iter()
        .filter(|event| matches!(event, Event::ProjectileFired { .. }))
        .count();
    assert!(fired >= 1, "weapon fired at least once");

    let near = query::enemy_view(&world)
        .iter()
        .find(|enemy| enemy.position.y > 1.0)
        .copied()
        .expect("near enemy alive");
    assert!(near.health < 100.0, "nearest enemy took the hit");
    let far = query::enemy_view(&world)
        .iter()
        .find(|enemy| enemy.position.x > 5.0)
        .copied()
        .expect("far enemy alive");
    assert_eq!(far.health, 100.0, "far enemy untouched");

    assert!(log.iter().any(|event| matches!(
        event,
        Event::ProjectileSpent {
            reason: SpentReason::Exhausted,
            ..
        }
    )));
}

#[test]
fn targeted_weapon_without_target_consumes_nothing() {
    let config = SimulationConfig::default();
    let mut world = World::new(&WorldConfig::default(), 1);
    let mut loadout = Loadout::new(config.items, config.weapons, 3.0, 1);
    let mut scanner = ProximityScanner::new(8.0);

    let mut commands = Vec::new();
    let _ = loadout.select(1, &NeutralStats, &mut commands);
    apply_all(&mut world, commands, &mut Vec::new());

    for _ in 0..100 {
        let _ = step(&mut world, &mut loadout, &mut scanner);
    }
    assert_eq!(query::pool_size(&world, ActorKind::new(3)), 0);
}

#[test]
fn orbital_level_up_grows_ring_without_replacing_children() {
    let config = SimulationConfig::default();
    let mut world = World::new(&WorldConfig::default(), 1);
    let mut loadout = Loadout::new(config.items, config.weapons, 3.0, 1);

    let mut commands = Vec::new();
    let _ = loadout.select(0, &NeutralStats, &mut commands);
    apply_all(&mut world, commands, &mut Vec::new());
    let weapon = loadout.weapons()[0].id();
    let before = query::orbit_children(&world, weapon).to_vec();
    assert_eq!(before.len(), 3);

    let mut commands = Vec::new();
    assert_eq!(
        loadout.select(0, &NeutralStats, &mut commands),
        Upgrade::Improved
    );
    apply_all(&mut world, commands, &mut Vec::new());

    let after = query::orbit_children(&world, weapon).to_vec();
    assert_eq!(after.len(), 4);
    assert_eq!(&after[..3], &before[..]);
    assert_eq!(query::pool_size(&world, ActorKind::new(2)), 4);
}

#[test]
fn orbiting_ring_strikes_enemy_it_sweeps_over() {
    let config = SimulationConfig::default();
    let mut world = World::new(&WorldConfig::default(), 1);
    let mut loadout = Loadout::new(config.items, config.weapons, 3.0, 1);
    let mut scanner = ProximityScanner::new(8.0);

    let mut commands = Vec::new();
    let _ = loadout.select(0, &NeutralStats, &mut commands);
    apply_all(&mut world, commands, &mut Vec::new());
    spawn(&mut world, Vec2::new(1.5, 0.0), 1_000);

    let mut log = Vec::new();
    for _ in 0..100 {
        log.extend(step(&mut world, &mut loadout, &mut scanner));
    }

    assert!(log
        .iter()
        .any(|event| matches!(event, Event::EnemyHit { .. })));
    assert!(
        !log.iter()
            .any(|event| matches!(event, Event::ProjectileSpent { .. })),
        "ring projectiles are never spent"
    );
}
