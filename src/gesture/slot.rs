//! Latest-sample cell shared between the gesture worker and the tick

use std::sync::atomic::{AtomicU64, Ordering};

const VALID_BIT: u64 = 1 << 32;

/// One hand-angle reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureSample {
    /// Degrees, counter-clockwise positive
    pub angle: f32,
    pub valid: bool,
}

impl GestureSample {
    pub fn angle(&self) -> Option<f32> {
        self.valid.then_some(self.angle)
    }
}

/// Single-writer, single-reader slot. Readers may see a stale value; they
/// never block.
#[derive(Debug, Default)]
pub struct AngleSlot(AtomicU64);

impl AngleSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reading; `None` marks "no hand"
    pub fn publish(&self, angle: Option<f32>) {
        let packed = match angle {
            Some(a) => VALID_BIT | a.to_bits() as u64,
            None => 0,
        };
        self.0.store(packed, Ordering::Release);
    }

    pub fn latest(&self) -> GestureSample {
        let packed = self.0.load(Ordering::Acquire);
        GestureSample {
            angle: f32::from_bits(packed as u32),
            valid: packed & VALID_BIT != 0,
        }
    }

    pub fn clear(&self) {
        self.publish(None);
    }
}
