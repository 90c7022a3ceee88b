use std::time::Duration;

use horde_survival_core::{
    ActorHandle, ActorKind, Command, Event, SessionConfig, SessionState, Vec2, WaveTier,
    WorldConfig,
};
use horde_survival_system_progression::{Progression, SessionClock, Vitals};
use horde_survival_world::{self as world, World};

fn killed(slot: u32) -> Event {
    Event::EnemyKilled {
        enemy: ActorHandle::new(ActorKind::new(0), slot, 0),
    }
}

#[test]
fn level_up_freezes_session_and_later_kills_grant_no_exp() {
    let mut clock = SessionClock::new(Duration::from_secs(300));
    let mut progression = Progression::new(vec![3, 5]);

    let gained = progression.handle(&[killed(0), killed(1), killed(2), killed(3)], &mut clock);

    assert_eq!(gained, 1);
    assert_eq!(clock.state(), SessionState::LevelUp);
    assert_eq!(progression.kills(), 4, "every kill counts");
    assert_eq!(progression.exp(), 0, "the fourth kill arrived while frozen");
    assert_eq!(progression.required_exp(), 5);

    assert!(clock.finish_level_up());
    let _ = progression.handle(&[killed(4)], &mut clock);
    assert_eq!(progression.exp(), 1);
}

#[test]
fn victory_clear_counts_kills_without_experience() {
    let mut world = World::new(&WorldConfig::default(), 1);
    let mut events = Vec::new();
    for x in [2.0, 4.0, 6.0] {
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                position: Vec2::new(x, 0.0),
                tier: WaveTier {
                    spawn_interval: Duration::from_secs(1),
                    actor_kind: ActorKind::new(0),
                    health: 10,
                    speed: 0.0,
                },
            },
            &mut events,
        );
    }

    let mut clock = SessionClock::new(Duration::from_secs(1));
    let mut progression = Progression::new(vec![1]);
    let mut commands = Vec::new();
    assert!(clock.advance(Duration::from_secs(2), &mut commands));

    events.clear();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let gained = progression.handle(&events, &mut clock);

    assert_eq!(gained, 0);
    assert_eq!(progression.kills(), 3);
    assert_eq!(progression.level(), 0);
    assert_eq!(clock.state(), SessionState::Victory);
}

#[test]
fn contact_drains_health_until_defeat() {
    let config = SessionConfig {
        anchor_max_health: 1.0,
        contact_damage_per_second: 10.0,
        ..SessionConfig::default()
    };
    let mut clock = SessionClock::new(config.max_time);
    let mut vitals = Vitals::new(&config);
    let contact = Event::AnchorContact {
        enemy: ActorHandle::new(ActorKind::new(0), 0, 0),
        dt: Duration::from_millis(50),
    };

    assert!(!vitals.handle(&[contact.clone(), contact.clone()], &mut clock));
    assert!(vitals.health().abs() < 1e-5, "exactly zero is still alive");
    assert!(clock.is_live());

    assert!(vitals.handle(&[contact.clone()], &mut clock));
    assert_eq!(clock.state(), SessionState::Defeat);

    let frozen = vitals.health();
    assert!(!vitals.handle(&[contact], &mut clock));
    assert_eq!(vitals.health(), frozen, "no drain after the session ends");

    vitals.heal();
    assert_eq!(vitals.health(), vitals.max_health());
}
