//! Turret Defense - a fixed-tick arcade defense game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, firing, movement, collisions, scoring)
//! - `gesture`: Camera hand-landmark aiming behind a fallback-safe adapter
//! - `control`: Pointer/gesture control-mode state machine
//! - `persistence`: Best-score history stores
//! - `session`: Composition root driving the tick loop for a host UI

pub mod assets;
pub mod control;
pub mod error;
pub mod gesture;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use control::{ControlMode, InputController};
pub use error::{GestureError, SettingsError, StoreError};
pub use session::{GameSession, Notice, TickReport};
pub use settings::{GameSettings, HitPolicy, SpawnRate};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the host timer)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Slack for comparing accumulated simulation time against intervals
    pub const TIMER_EPSILON: f64 = 1e-9;

    /// Default play area (logical pixels)
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 600.0;

    /// Turret timing (seconds)
    pub const SHOT_INTERVAL: f64 = 1.5;
    pub const TURRET_RECOVERY: f64 = 0.75;
    pub const MIN_ROTATION_INTERVAL: f64 = 1.0;

    /// Projectile defaults
    pub const PROJECTILE_SPEED: f32 = 300.0;
    pub const PROJECTILE_SIZE: f32 = 32.0;
    pub const PROJECTILE_CULL_MARGIN: f32 = 50.0;

    /// Enemy defaults
    pub const ENEMY_SPEED: f32 = 100.0;
    pub const ENEMY_VARIANTS: u8 = 4;
    pub const ENEMY_BASE_SIZE: f32 = 30.0;
    pub const ENEMY_SIZE_STEP: f32 = 10.0;
    pub const ENEMY_CULL_MARGIN: f32 = 100.0;
    /// Distance outside the play area where enemies appear
    pub const SPAWN_EDGE_OFFSET: f32 = 20.0;
    /// Max per-axis offset of the aim point from the play-area center
    pub const AIM_JITTER: f32 = 50.0;
    /// Per-tick chance that an enemy veers off its heading
    pub const WANDER_CHANCE: f64 = 0.02;
    /// Width of the uniform per-axis heading perturbation
    pub const WANDER_STRENGTH: f32 = 0.5;
    /// Cosmetic spin per tick is a random whole number of degrees in 1..=MAX
    pub const MAX_SPIN_STEP: u32 = 3;

    /// Explosion animation
    pub const EXPLOSION_FRAMES: u32 = 7;
    pub const EXPLOSION_FPS: f32 = 12.0;
    pub const EXPLOSION_SIZE: f32 = 100.0;
}

/// Normalize an angle in degrees to (-180, 180]
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 { 180.0 } else { wrapped }
}

/// Unit vector for a heading in degrees (screen space, +y down)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Heading in degrees from `from` toward `to` (screen space, +y down)
#[inline]
pub fn degrees_toward(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_degrees() {
        assert!((normalize_degrees(190.0) - -170.0).abs() < 1e-4);
        assert!((normalize_degrees(-180.0) - 180.0).abs() < 1e-4);
        assert!((normalize_degrees(725.0) - 5.0).abs() < 1e-3);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(540.0), 180.0);
    }

    #[test]
    fn test_normalize_degrees_huge_values() {
        for angle in [1.0e10, -1.0e10, f32::MAX, f32::MIN, 3.0e38] {
            let n = normalize_degrees(angle);
            assert!(n > -180.0 && n <= 180.0, "{angle} -> {n}");
        }
    }

    #[test]
    fn test_direction_round_trip() {
        let dir = direction_from_degrees(90.0);
        assert!(dir.x.abs() < 1e-6);
        assert!((dir.y - 1.0).abs() < 1e-6);
        assert!((degrees_toward(Vec2::ZERO, dir) - 90.0).abs() < 1e-3);
    }
}
