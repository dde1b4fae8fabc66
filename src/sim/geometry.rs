//! Collision and spawn geometry
//!
//! Everything here works in screen space: origin at the top-left of the play
//! area, +x right, +y down. Entity positions are the top-left corner of their
//! bounding box.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_pos_size(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Overlap test; rectangles that only touch along an edge intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x <= b_max.x
            && other.min.x <= a_max.x
            && self.min.y <= b_max.y
            && other.min.y <= a_max.y
    }
}

/// Side of the play area an enemy enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Pick an edge uniformly, then a uniform point along it just outside the area
pub fn sample_edge_spawn<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2) -> (Edge, Vec2) {
    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let along: f32 = rng.random();
    let pos = match edge {
        Edge::Top => Vec2::new(along * bounds.x, -SPAWN_EDGE_OFFSET),
        Edge::Right => Vec2::new(bounds.x + SPAWN_EDGE_OFFSET, along * bounds.y),
        Edge::Bottom => Vec2::new(along * bounds.x, bounds.y + SPAWN_EDGE_OFFSET),
        Edge::Left => Vec2::new(-SPAWN_EDGE_OFFSET, along * bounds.y),
    };
    (edge, pos)
}

/// Unit heading from `from` toward the play-area center, jittered per axis
pub fn aim_direction<R: Rng + ?Sized>(rng: &mut R, from: Vec2, bounds: Vec2) -> Vec2 {
    let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * (2.0 * AIM_JITTER);
    let target = bounds * 0.5 + jitter;
    renormalize(target - from, Vec2::X)
}

/// Randomly veer a heading and bring it back to unit length
pub fn perturb_direction<R: Rng + ?Sized>(rng: &mut R, dir: Vec2) -> Vec2 {
    let delta = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * WANDER_STRENGTH;
    renormalize(dir + delta, dir)
}

/// Normalize `v`, keeping `fallback` when `v` has no usable direction
#[inline]
pub fn renormalize(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize()
        .unwrap_or_else(|| fallback.try_normalize().unwrap_or(Vec2::X))
}

/// True when a top-left position has left the play area plus `margin`.
/// Non-finite positions always count as outside.
pub fn outside_bounds(pos: Vec2, bounds: Vec2, margin: f32) -> bool {
    !pos.is_finite()
        || pos.x < -margin
        || pos.x > bounds.x + margin
        || pos.y < -margin
        || pos.y > bounds.y + margin
}
