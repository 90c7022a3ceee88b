#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Horde Survival.
//!
//! The world owns the anchor, the enemy and projectile pools, orbital rings
//! and deferred effects. It is mutated exclusively through [`apply`], which
//! reports everything that happened as [`Event`] values.

mod deferred;
mod enemy;
mod orbit;
pub mod pool;
mod projectile;

use std::{collections::BTreeMap, time::Duration};

use horde_survival_core::{
    ActorHandle, ActorKind, ActorKindSpec, Command, Event, SpentReason, StaleEffectPolicy, Vec2,
    WaveTier, WeaponId, WorldConfig, WELCOME_BANNER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::{
    deferred::DeferredEffects,
    enemy::{Enemy, Impact},
    orbit::OrbitRing,
    projectile::{Penetration, Projectile},
};

pub use pool::ActorPool;

/// Inclusive lower bound of the integer jitter added when repositioning.
const REPOSITION_JITTER_MIN: i32 = -3;
/// Exclusive upper bound of the integer jitter added when repositioning.
const REPOSITION_JITTER_MAX: i32 = 3;

/// Controlled actor every hostile pursues.
#[derive(Clone, Debug)]
struct Anchor {
    position: Vec2,
    input: Vec2,
    speed: f32,
    facing_left: bool,
}

/// Alive enemy captured before collision resolution.
#[derive(Clone, Copy, Debug)]
struct EnemyBody {
    handle: ActorHandle,
    position: Vec2,
    radius: f32,
}

/// Represents the authoritative Horde Survival world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    half_extents: Vec2,
    anchor_radius: f32,
    projectile_speed: f32,
    knockback_impulse: f32,
    hit_reaction: Duration,
    orbit_radius: f32,
    reposition_enemies: bool,
    stale_effects: StaleEffectPolicy,
    radii: BTreeMap<ActorKind, f32>,
    anchor: Anchor,
    enemies: ActorPool<Enemy>,
    projectiles: ActorPool<Projectile>,
    orbits: BTreeMap<WeaponId, OrbitRing>,
    deferred: DeferredEffects,
    rng: ChaCha8Rng,
    tick_index: u64,
    enemy_scratch: Vec<EnemyBody>,
    handle_scratch: Vec<ActorHandle>,
    contact_scratch: Vec<ActorHandle>,
}

impl World {
    /// Creates a world with empty pools for every configured kind.
    ///
    /// `seed` drives enemy repositioning jitter.
    #[must_use]
    pub fn new(config: &WorldConfig, seed: u64) -> Self {
        let mut enemies = ActorPool::new();
        let mut projectiles = ActorPool::new();
        let mut radii = BTreeMap::new();

        for ActorKindSpec { kind, radius } in &config.enemy_kinds {
            if enemies.register(*kind) {
                let _ = radii.insert(*kind, *radius);
            }
        }
        for ActorKindSpec { kind, radius } in &config.projectile_kinds {
            if enemies.is_registered(*kind) {
                warn!(kind = kind.get(), "projectile kind already holds enemies");
                continue;
            }
            if projectiles.register(*kind) {
                let _ = radii.insert(*kind, *radius);
            }
        }

        Self {
            banner: WELCOME_BANNER,
            half_extents: config.play_area_half_extents,
            anchor_radius: config.anchor_radius,
            projectile_speed: config.projectile_speed,
            knockback_impulse: config.knockback_impulse,
            hit_reaction: config.hit_reaction,
            orbit_radius: config.orbit_radius,
            reposition_enemies: config.reposition_enemies,
            stale_effects: config.stale_effects,
            radii,
            anchor: Anchor {
                position: Vec2::ZERO,
                input: Vec2::ZERO,
                speed: config.anchor_base_speed,
                facing_left: false,
            },
            enemies,
            projectiles,
            orbits: BTreeMap::new(),
            deferred: DeferredEffects::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            tick_index: 0,
            enemy_scratch: Vec::new(),
            handle_scratch: Vec::new(),
            contact_scratch: Vec::new(),
        }
    }

    fn radius(&self, kind: ActorKind) -> f32 {
        self.radii.get(&kind).copied().unwrap_or_default()
    }

    fn in_area(&self, position: Vec2) -> bool {
        let offset = (position - self.anchor.position).abs();
        offset.x <= self.half_extents.x && offset.y <= self.half_extents.y
    }

    fn spawn_enemy(&mut self, position: Vec2, tier: WaveTier, out_events: &mut Vec<Event>) {
        let kind = tier.actor_kind;
        let radius = self.radius(kind);
        let inside = self.in_area(position);
        let Some((enemy, actor)) = self.enemies.get(kind) else {
            warn!(kind = kind.get(), "spawn requested for unregistered enemy kind");
            out_events.push(Event::UnregisteredKind { kind });
            return;
        };

        actor.init(&tier, position, radius);
        actor.inside_area = inside;
        debug!(?enemy, x = position.x, y = position.y, "enemy spawned");
        out_events.push(Event::EnemySpawned { enemy, position });
    }

    fn fire_projectile(
        &mut self,
        kind: ActorKind,
        origin: Vec2,
        direction: Vec2,
        damage: f32,
        penetration: i32,
        out_events: &mut Vec<Event>,
    ) {
        let radius = self.radius(kind);
        let speed = self.projectile_speed;
        let Some((projectile, actor)) = self.projectiles.get(kind) else {
            warn!(kind = kind.get(), "fire requested for unregistered projectile kind");
            out_events.push(Event::UnregisteredKind { kind });
            return;
        };

        actor.init(damage, penetration, direction, speed, origin, radius);
        out_events.push(Event::ProjectileFired { projectile });
    }

    fn arrange_orbit(
        &mut self,
        weapon: WeaponId,
        kind: ActorKind,
        count: u32,
        damage: f32,
        out_events: &mut Vec<Event>,
    ) {
        let radius = self.radius(kind);
        let ring = self
            .orbits
            .entry(weapon)
            .or_insert_with(|| OrbitRing::new(kind));
        if !ring.arrange(&mut self.projectiles, count as usize, damage, radius) {
            warn!(kind = kind.get(), ?weapon, "orbit requested for unregistered projectile kind");
            out_events.push(Event::UnregisteredKind { kind });
            return;
        }

        ring.place(
            &mut self.projectiles,
            self.anchor.position,
            self.orbit_radius,
        );
        out_events.push(Event::OrbitArranged {
            weapon,
            projectiles: count,
        });
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });
        let seconds = dt.as_secs_f32();

        self.deferred.resolve(
            &mut self.enemies,
            self.anchor.position,
            self.knockback_impulse,
            self.stale_effects,
            out_events,
        );

        self.anchor.position += self.anchor.input * self.anchor.speed * seconds;

        let anchor = self.anchor.position;
        for (_, enemy) in self.enemies.iter_mut() {
            enemy.steer(anchor, dt);
        }

        for (_, projectile) in self.projectiles.iter_mut() {
            projectile.advance(seconds);
        }
        for ring in self.orbits.values() {
            ring.place(&mut self.projectiles, anchor, self.orbit_radius);
        }

        self.resolve_collisions(out_events);
        self.resolve_bounds(out_events);
        self.report_anchor_contacts(dt, out_events);
    }

    /// Strikes every alive enemy a projectile newly overlaps this tick.
    fn resolve_collisions(&mut self, out_events: &mut Vec<Event>) {
        self.enemy_scratch.clear();
        self.enemy_scratch.extend(
            self.enemies
                .iter()
                .filter(|(_, enemy)| enemy.is_alive())
                .map(|(handle, enemy)| EnemyBody {
                    handle,
                    position: enemy.position,
                    radius: enemy.radius,
                }),
        );
        if self.enemy_scratch.is_empty() {
            for (_, projectile) in self.projectiles.iter_mut() {
                projectile.contacts.clear();
            }
            return;
        }

        self.handle_scratch.clear();
        self.projectiles.collect_handles(&mut self.handle_scratch);

        for &projectile_handle in &self.handle_scratch {
            let Some(projectile) = self.projectiles.resolve_mut(projectile_handle) else {
                continue;
            };

            std::mem::swap(&mut projectile.contacts, &mut self.contact_scratch);
            projectile.contacts.clear();
            let mut spent = false;

            for body in &self.enemy_scratch {
                if projectile.position.distance(body.position) > projectile.radius + body.radius {
                    continue;
                }
                let Some(enemy) = self.enemies.resolve_mut(body.handle) else {
                    continue;
                };

                projectile.contacts.push(body.handle);
                if self.contact_scratch.contains(&body.handle) {
                    continue;
                }

                let damage = projectile.damage();
                match enemy.take_hit(damage, self.hit_reaction) {
                    Impact::Ignored => continue,
                    Impact::Wounded { remaining_health } => {
                        out_events.push(Event::EnemyHit {
                            enemy: body.handle,
                            damage,
                            remaining_health,
                        });
                    }
                    Impact::Killed => {
                        let _ = self.enemies.release(body.handle);
                        debug!(enemy = ?body.handle, "enemy killed");
                        out_events.push(Event::EnemyKilled { enemy: body.handle });
                    }
                }
                self.deferred.schedule_knockback(body.handle);

                if projectile.on_impact() == Penetration::Spent {
                    spent = true;
                    break;
                }
            }

            if spent {
                let _ = self.projectiles.release(projectile_handle);
                out_events.push(Event::ProjectileSpent {
                    projectile: projectile_handle,
                    reason: SpentReason::Exhausted,
                });
            }
        }
    }

    /// Spends projectiles and relocates enemies that crossed out of the play area.
    fn resolve_bounds(&mut self, out_events: &mut Vec<Event>) {
        let center = self.anchor.position;
        let half_extents = self.half_extents;
        let contains = |position: Vec2| {
            let offset = (position - center).abs();
            offset.x <= half_extents.x && offset.y <= half_extents.y
        };

        self.handle_scratch.clear();
        for (handle, projectile) in self.projectiles.iter_mut() {
            if projectile.is_infinite() {
                continue;
            }
            let inside = contains(projectile.position);
            if projectile.inside_area && !inside {
                self.handle_scratch.push(handle);
            }
            projectile.inside_area = inside;
        }
        for &projectile in &self.handle_scratch {
            let _ = self.projectiles.release(projectile);
            out_events.push(Event::ProjectileSpent {
                projectile,
                reason: SpentReason::LeftArea,
            });
        }

        let reposition = self.reposition_enemies;
        for (handle, enemy) in self.enemies.iter_mut() {
            if !enemy.is_alive() {
                continue;
            }
            let inside = contains(enemy.position);
            if reposition && enemy.inside_area && !inside {
                let jitter = Vec2::new(
                    self.rng
                        .gen_range(REPOSITION_JITTER_MIN..REPOSITION_JITTER_MAX)
                        as f32,
                    self.rng
                        .gen_range(REPOSITION_JITTER_MIN..REPOSITION_JITTER_MAX)
                        as f32,
                );
                enemy.position += (center - enemy.position) * 2.0 + jitter;
                enemy.inside_area = contains(enemy.position);
                out_events.push(Event::EnemyRepositioned {
                    enemy: handle,
                    position: enemy.position,
                });
            } else {
                enemy.inside_area = inside;
            }
        }
    }

    fn report_anchor_contacts(&self, dt: Duration, out_events: &mut Vec<Event>) {
        let anchor = self.anchor.position;
        for (enemy, actor) in self.enemies.iter() {
            if actor.is_alive() && actor.position.distance(anchor) <= self.anchor_radius + actor.radius
            {
                out_events.push(Event::AnchorContact { enemy, dt });
            }
        }
    }

    fn clear_enemies(&mut self, out_events: &mut Vec<Event>) {
        self.handle_scratch.clear();
        for (handle, enemy) in self.enemies.iter_mut() {
            if enemy.kill() {
                self.handle_scratch.push(handle);
            }
        }
        info!(count = self.handle_scratch.len(), "clearing every enemy");
        for &enemy in &self.handle_scratch {
            let _ = self.enemies.release(enemy);
            out_events.push(Event::EnemyKilled { enemy });
        }
    }

    fn refresh_facing(&mut self) {
        let anchor = self.anchor.position;
        if self.anchor.input.x < 0.0 {
            self.anchor.facing_left = true;
        } else if self.anchor.input.x > 0.0 {
            self.anchor.facing_left = false;
        }
        for (_, enemy) in self.enemies.iter_mut() {
            if enemy.is_alive() {
                enemy.face(anchor);
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetAnchorInput { direction } => {
            world.anchor.input = direction.clamp_length_max(1.0);
        }
        Command::SetAnchorSpeed { speed } => {
            world.anchor.speed = speed.max(0.0);
        }
        Command::SpawnEnemy { position, tier } => world.spawn_enemy(position, tier, out_events),
        Command::FireProjectile {
            kind,
            origin,
            direction,
            damage,
            penetration,
        } => world.fire_projectile(kind, origin, direction, damage, penetration, out_events),
        Command::ArrangeOrbit {
            weapon,
            kind,
            count,
            damage,
        } => world.arrange_orbit(weapon, kind, count, damage, out_events),
        Command::RotateOrbit { weapon, degrees } => {
            let Some(ring) = world.orbits.get_mut(&weapon) else {
                out_events.push(Event::OrbitMissing { weapon });
                return;
            };
            ring.rotate(degrees);
            ring.place(
                &mut world.projectiles,
                world.anchor.position,
                world.orbit_radius,
            );
        }
        Command::ClearEnemies => world.clear_enemies(out_events),
        Command::RefreshFacing => world.refresh_facing(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use horde_survival_core::{
        ActorHandle, ActorKind, AnchorSnapshot, EnemySnapshot, EnemyView, ProjectileSnapshot,
        ProjectileView, WeaponId,
    };

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Number of ticks processed since creation.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Captures the anchor's position, speed and facing.
    #[must_use]
    pub fn anchor(world: &World) -> AnchorSnapshot {
        AnchorSnapshot {
            position: world.anchor.position,
            speed: world.anchor.speed,
            facing_left: world.anchor.facing_left,
        }
    }

    /// Captures every active hostile actor in pool discovery order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|(handle, enemy)| EnemySnapshot {
                    handle,
                    position: enemy.position,
                    health: enemy.health(),
                    max_health: enemy.max_health(),
                    phase: enemy.phase(),
                    facing_left: enemy.facing_left,
                })
                .collect(),
        )
    }

    /// Captures a single hostile actor when its handle is still current.
    #[must_use]
    pub fn enemy(world: &World, handle: ActorHandle) -> Option<EnemySnapshot> {
        world.enemies.resolve(handle).map(|enemy| EnemySnapshot {
            handle,
            position: enemy.position,
            health: enemy.health(),
            max_health: enemy.max_health(),
            phase: enemy.phase(),
            facing_left: enemy.facing_left,
        })
    }

    /// Captures every active projectile in pool discovery order.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|(handle, projectile)| ProjectileSnapshot {
                    handle,
                    position: projectile.position,
                    velocity: projectile.velocity(),
                    damage: projectile.damage(),
                    penetration: projectile.penetration(),
                })
                .collect(),
        )
    }

    /// Handles of the projectiles attached to a weapon's ring.
    #[must_use]
    pub fn orbit_children(world: &World, weapon: WeaponId) -> &[ActorHandle] {
        world
            .orbits
            .get(&weapon)
            .map(|ring| ring.children())
            .unwrap_or_default()
    }

    /// Number of slots ever created for the kind, whichever pool holds it.
    #[must_use]
    pub fn pool_size(world: &World, kind: ActorKind) -> usize {
        world.enemies.slot_count(kind) + world.projectiles.slot_count(kind)
    }

    /// Number of active actors of the kind, whichever pool holds it.
    #[must_use]
    pub fn active_count(world: &World, kind: ActorKind) -> usize {
        world.enemies.active_count(kind) + world.projectiles.active_count(kind)
    }

    /// Kinds registered in the enemy pool, ascending.
    #[must_use]
    pub fn enemy_kinds(world: &World) -> Vec<ActorKind> {
        world.enemies.kinds().collect()
    }

    /// Kinds registered in the projectile pool, ascending.
    #[must_use]
    pub fn projectile_kinds(world: &World) -> Vec<ActorKind> {
        world.projectiles.kinds().collect()
    }
}
