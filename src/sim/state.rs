//! Game state and core simulation types
//!
//! Each live object is a single record in one owning `Vec`, so an entity's
//! position, heading and size can never drift apart.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Edge, Rect};
use crate::consts::*;
use crate::settings::{GameSettings, HitPolicy, SpawnRate};

/// A turret projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Unit heading
    pub dir: Vec2,
    pub size: Vec2,
    /// Heading in degrees when fired (sprite rotation)
    pub angle: f32,
}

impl Projectile {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// An incoming enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    /// Unit heading
    pub dir: Vec2,
    /// Sprite variant, also the size class
    pub variant: u8,
    pub size: Vec2,
    /// Cosmetic rotation in degrees
    pub spin: f32,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2, dir: Vec2, variant: u8) -> Self {
        let side = Self::size_for_variant(variant);
        Self {
            id,
            pos,
            dir,
            variant,
            size: Vec2::splat(side),
            spin: 0.0,
        }
    }

    /// Square side length for a size class
    pub fn size_for_variant(variant: u8) -> f32 {
        ENEMY_BASE_SIZE + ENEMY_SIZE_STEP * variant as f32
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// A short explosion animation left behind by a destroyed enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    /// Seconds since the explosion started
    pub age: f32,
}

impl Explosion {
    pub fn new(center: Vec2) -> Self {
        Self { center, age: 0.0 }
    }

    /// Animation frame to display
    pub fn frame(&self) -> u32 {
        (self.age * EXPLOSION_FPS) as u32
    }

    pub fn finished(&self) -> bool {
        self.frame() >= EXPLOSION_FRAMES
    }

    /// Sprite rectangle centered on the destroyed enemy
    pub fn bounds(&self) -> Rect {
        let size = Vec2::splat(EXPLOSION_SIZE);
        Rect::from_pos_size(self.center - size * 0.5, size)
    }
}

/// The player's turret
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    /// Pivot point (play-area center)
    pub pos: Vec2,
    /// Heading in degrees, screen space
    pub angle: f32,
    /// Hidden while the muzzle recovers after a shot
    pub visible: bool,
}

/// Current and best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreState {
    pub current: u64,
    pub best: u64,
}

impl ScoreState {
    pub fn new(best: u64) -> Self {
        Self { current: 0, best }
    }

    /// Count one kill; returns true when this set a new best
    pub fn record_kill(&mut self) -> bool {
        self.current += 1;
        if self.current > self.best {
            self.best = self.current;
            true
        } else {
            false
        }
    }

    /// HUD label text
    pub fn hud_line(&self) -> String {
        format!("Current Score: {} (High Score: {})", self.current, self.best)
    }
}

/// Something that happened during a tick, published to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: u32, variant: u8, edge: Edge },
    ProjectileFired { id: u32, angle: f32 },
    EnemyDestroyed { enemy_id: u32, projectile_id: u32, center: Vec2 },
    NewBest { score: u64 },
    ProjectileExpired { id: u32 },
    EnemyEscaped { id: u32 },
    TurretHidden,
    TurretShown,
    TurretRotated { angle: f32 },
}

/// Simulation timing state, all in seconds of simulated time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    pub clock: f64,
    pub last_spawn: Option<f64>,
    pub last_shot: Option<f64>,
    pub last_rotation: Option<f64>,
}

impl Timers {
    /// True when at least `interval` has passed since `last` (or it never happened)
    #[inline]
    pub fn elapsed(&self, last: Option<f64>, interval: f64) -> bool {
        match last {
            None => true,
            Some(t) => self.clock - t + TIMER_EPSILON >= interval,
        }
    }
}

/// Complete world state (deterministic given seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub timers: Timers,
    /// Play-area size
    pub bounds: Vec2,
    pub spawn_interval: f64,
    pub shot_interval: f64,
    pub turret_recovery: f64,
    pub min_rotation_interval: f64,
    pub hit_policy: HitPolicy,
    pub turret: Turret,
    /// Live projectiles in firing order
    pub projectiles: Vec<Projectile>,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub score: ScoreState,
    /// Events produced by the most recent tick
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new world with the given seed, settings and stored best score
    pub fn new(seed: u64, settings: &GameSettings, best_score: u64) -> Self {
        let bounds = Vec2::new(settings.play_width, settings.play_height);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            timers: Timers::default(),
            bounds,
            spawn_interval: settings.spawn_rate.interval_secs(),
            shot_interval: settings.shot_interval,
            turret_recovery: settings.turret_recovery,
            min_rotation_interval: settings.min_rotation_interval,
            hit_policy: settings.hit_policy,
            turret: Turret {
                pos: bounds * 0.5,
                angle: 0.0,
                visible: true,
            },
            projectiles: Vec::new(),
            enemies: Vec::new(),
            explosions: Vec::new(),
            score: ScoreState::new(best_score),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Change difficulty; takes effect on the next spawn gate
    pub fn set_spawn_rate(&mut self, rate: SpawnRate) {
        self.spawn_interval = rate.interval_secs();
    }

    /// Simulated seconds since the world started
    pub fn clock(&self) -> f64 {
        self.timers.clock
    }
}
