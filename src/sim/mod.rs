//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn/fire order)
//! - No rendering, camera or storage dependencies

pub mod geometry;
pub mod state;
pub mod tick;

pub use geometry::{Edge, Rect};
pub use state::{Enemy, Explosion, GameEvent, GameState, Projectile, ScoreState, Turret};
pub use tick::{Aim, TickInput, tick};
