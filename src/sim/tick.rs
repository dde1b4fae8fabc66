//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world deterministically. Steps run in a
//! fixed order: spawn, fire, move projectiles, move enemies, effects, collide,
//! cull, orient. Every step is total: bad values (non-finite aim, degenerate
//! headings) are dropped or corrected inside the step that sees them, so one
//! step can never cut the rest of the tick short.

use glam::Vec2;
use rand::Rng;

use super::geometry::{aim_direction, outside_bounds, perturb_direction, sample_edge_spawn};
use super::state::{Enemy, Explosion, GameEvent, GameState, Projectile};
use crate::consts::*;
use crate::settings::HitPolicy;
use crate::{degrees_toward, direction_from_degrees, normalize_degrees};

/// Where the turret should point this tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Aim {
    /// Keep the current heading
    #[default]
    Hold,
    /// Pointer position in play-area coordinates
    Pointer(Vec2),
    /// Hand angle in degrees, maths convention (counter-clockwise positive)
    Gesture(f32),
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub aim: Aim,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    state.time_ticks += 1;
    state.timers.clock += dt as f64;

    spawn_step(state);
    fire_step(state);
    advance_projectiles(state, dt);
    advance_enemies(state, dt);
    advance_explosions(state, dt);
    resolve_collisions(state);
    cull_step(state);
    orient_step(state, input.aim);
}

/// Spawn at most one enemy when the spawn interval has elapsed
pub(crate) fn spawn_step(state: &mut GameState) {
    if !state.timers.elapsed(state.timers.last_spawn, state.spawn_interval) {
        return;
    }
    state.timers.last_spawn = Some(state.timers.clock);

    let (edge, pos) = sample_edge_spawn(&mut state.rng, state.bounds);
    let variant = state.rng.random_range(0..ENEMY_VARIANTS);
    let dir = aim_direction(&mut state.rng, pos, state.bounds);

    let id = state.next_entity_id();
    state.enemies.push(Enemy::new(id, pos, dir, variant));
    state.events.push(GameEvent::EnemySpawned { id, variant, edge });
}

/// Bring the turret back after recovery, then fire at most one projectile
pub(crate) fn fire_step(state: &mut GameState) {
    let last_shot = state.timers.last_shot;

    if !state.turret.visible && state.timers.elapsed(last_shot, state.turret_recovery) {
        state.turret.visible = true;
        state.events.push(GameEvent::TurretShown);
    }

    if !state.timers.elapsed(last_shot, state.shot_interval) {
        return;
    }
    state.timers.last_shot = Some(state.timers.clock);

    let angle = state.turret.angle;
    let size = Vec2::splat(PROJECTILE_SIZE);
    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos: state.turret.pos - size * 0.5,
        dir: direction_from_degrees(angle),
        size,
        angle,
    });
    state.events.push(GameEvent::ProjectileFired { id, angle });

    if state.turret.visible {
        state.turret.visible = false;
        state.events.push(GameEvent::TurretHidden);
    }
}

fn advance_projectiles(state: &mut GameState, dt: f32) {
    for projectile in &mut state.projectiles {
        projectile.pos += projectile.dir * PROJECTILE_SPEED * dt;
    }
}

fn advance_enemies(state: &mut GameState, dt: f32) {
    for enemy in &mut state.enemies {
        if state.rng.random_bool(WANDER_CHANCE) {
            enemy.dir = perturb_direction(&mut state.rng, enemy.dir);
        }
        enemy.pos += enemy.dir * ENEMY_SPEED * dt;

        let spin = state.rng.random_range(1..=MAX_SPIN_STEP) as f32;
        enemy.spin = normalize_degrees(enemy.spin + spin);
    }
}

fn advance_explosions(state: &mut GameState, dt: f32) {
    for explosion in &mut state.explosions {
        explosion.age += dt;
    }
    state.explosions.retain(|e| !e.finished());
}

/// Pairwise projectile/enemy overlap, newest first on both sides.
/// Each projectile destroys at most one enemy per tick.
fn resolve_collisions(state: &mut GameState) {
    let mut i = state.projectiles.len();
    while i > 0 {
        i -= 1;
        let bounds = state.projectiles[i].bounds();
        let Some(j) = state
            .enemies
            .iter()
            .rposition(|enemy| enemy.bounds().intersects(&bounds))
        else {
            continue;
        };

        let enemy = state.enemies.remove(j);
        let center = enemy.center();
        state.explosions.push(Explosion::new(center));

        let projectile_id = state.projectiles[i].id;
        if state.hit_policy == HitPolicy::SingleHit {
            state.projectiles.remove(i);
        }

        state.events.push(GameEvent::EnemyDestroyed {
            enemy_id: enemy.id,
            projectile_id,
            center,
        });
        if state.score.record_kill() {
            state.events.push(GameEvent::NewBest {
                score: state.score.best,
            });
        }
    }
}

fn cull_step(state: &mut GameState) {
    let bounds = state.bounds;
    let events = &mut state.events;

    state.projectiles.retain(|p| {
        let keep = !outside_bounds(p.pos, bounds, PROJECTILE_CULL_MARGIN);
        if !keep {
            events.push(GameEvent::ProjectileExpired { id: p.id });
        }
        keep
    });
    state.enemies.retain(|e| {
        let keep = !outside_bounds(e.pos, bounds, ENEMY_CULL_MARGIN);
        if !keep {
            events.push(GameEvent::EnemyEscaped { id: e.id });
        }
        keep
    });
}

/// Point the turret. Pointer aim is rate limited; gesture aim is not and is
/// negated because hand angles are counter-clockwise while screen space is
/// clockwise.
fn orient_step(state: &mut GameState, aim: Aim) {
    let angle = match aim {
        Aim::Hold => return,
        Aim::Pointer(target) => {
            if !state
                .timers
                .elapsed(state.timers.last_rotation, state.min_rotation_interval)
            {
                return;
            }
            degrees_toward(state.turret.pos, target)
        }
        Aim::Gesture(hand_degrees) => -hand_degrees,
    };

    if !angle.is_finite() {
        log::debug!("Ignoring non-finite aim {:?}", aim);
        return;
    }

    if matches!(aim, Aim::Pointer(_)) {
        state.timers.last_rotation = Some(state.timers.clock);
    }
    state.turret.angle = normalize_degrees(angle);
    state.events.push(GameEvent::TurretRotated {
        angle: state.turret.angle,
    });
}
