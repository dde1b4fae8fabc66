//! Hand-gesture aiming
//!
//! Camera frame → landmark model → index-finger angle. The camera and the
//! model are external collaborators behind [`FrameSource`], [`LandmarkModel`]
//! and [`GestureBackend`]; this module only owns the control-loop contract
//! around them:
//! - `adapter`: synchronous, fallback-safe sampling
//! - `worker`: the same adapter opened and sampled on a background thread
//! - `slot`: lock-free latest-sample cell between the two threads
//! - `frame`: RGB frames and the model input tensor

pub mod adapter;
pub mod frame;
pub mod slot;
pub mod worker;

pub use adapter::GestureAdapter;
pub use frame::{Frame, InputTensor};
pub use slot::{AngleSlot, GestureSample};
pub use worker::{GestureWorker, WorkerStatus};

use std::path::Path;

use glam::Vec2;

use crate::error::GestureError;

/// Points in the hand-landmark layout
pub const LANDMARK_COUNT: usize = 21;
/// Values per landmark in the model output (x, y, z/confidence)
pub const LANDMARK_STRIDE: usize = 3;
/// Square side of the model input image
pub const MODEL_INPUT_SIZE: usize = 224;

/// One hand landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A camera producing RGB frames
pub trait FrameSource: Send {
    /// Next frame, or `None` when the device has nothing new
    fn read_frame(&mut self) -> Result<Option<Frame>, GestureError>;

    /// Give the device back; called once when the owning adapter drops
    fn release(&mut self) {}
}

/// Opaque landmark model: 1x3xNxN RGB tensor in, flat landmark values out
pub trait LandmarkModel: Send {
    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>, GestureError>;
}

/// Opens cameras and loads models
pub trait GestureBackend: Send + Sync {
    fn open_camera(
        &self,
        index: u32,
        width: u32,
        height: u32,
    ) -> Result<Box<dyn FrameSource>, GestureError>;

    fn load_model(&self, path: &Path) -> Result<Box<dyn LandmarkModel>, GestureError>;
}

/// Backend for builds without a camera or inference runtime. Every open
/// fails, so gesture mode falls back to pointer control.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl GestureBackend for UnavailableBackend {
    fn open_camera(
        &self,
        index: u32,
        _width: u32,
        _height: u32,
    ) -> Result<Box<dyn FrameSource>, GestureError> {
        Err(GestureError::CameraUnavailable {
            index,
            reason: "no camera backend in this build".to_string(),
        })
    }

    fn load_model(&self, path: &Path) -> Result<Box<dyn LandmarkModel>, GestureError> {
        require_model_file(path)?;
        Err(GestureError::ModelLoad {
            path: path.to_path_buf(),
            reason: "no inference runtime in this build".to_string(),
        })
    }
}

/// Fail early with a clear error when the model file is not on disk
pub fn require_model_file(path: &Path) -> Result<(), GestureError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(GestureError::ModelMissing {
            path: path.to_path_buf(),
        })
    }
}

/// Split raw model output into landmarks; `None` when no hand was found
pub fn parse_landmarks(output: &[f32]) -> Option<Vec<Landmark>> {
    if output.len() < LANDMARK_COUNT * LANDMARK_STRIDE {
        return None;
    }
    let landmarks = output
        .chunks_exact(LANDMARK_STRIDE)
        .take(LANDMARK_COUNT)
        .map(|v| Landmark {
            x: v[0],
            y: v[1],
            z: v[2],
        })
        .collect();
    Some(landmarks)
}

/// Angle of the finger from base to tip in degrees, counter-clockwise positive.
/// Image y grows downward, hence the negated dy.
pub fn index_finger_angle(base: Vec2, tip: Vec2) -> f32 {
    let dx = tip.x - base.x;
    let dy = tip.y - base.y;
    (-dy).atan2(dx).to_degrees()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_finger_angle_flips_image_y() {
        // Tip straight up in image space (smaller y) is +90 degrees
        let up = index_finger_angle(Vec2::new(100.0, 100.0), Vec2::new(100.0, 50.0));
        assert!((up - 90.0).abs() < 1e-4);
        let right = index_finger_angle(Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0));
        assert!(right.abs() < 1e-4);
        let down_left = index_finger_angle(Vec2::ZERO, Vec2::new(-10.0, 10.0));
        assert!((down_left + 135.0).abs() < 1e-4);
    }

    #[test]
    fn test_parse_landmarks_needs_full_hand() {
        assert!(parse_landmarks(&[0.0; 62]).is_none());
        let values: Vec<f32> = (0..64).map(|i| i as f32).collect();
        let landmarks = parse_landmarks(&values).unwrap();
        assert_eq!(landmarks.len(), LANDMARK_COUNT);
        assert_eq!(
            landmarks[8],
            Landmark {
                x: 24.0,
                y: 25.0,
                z: 26.0
            }
        );
    }

    #[test]
    fn test_unavailable_backend_reports_missing_model() {
        let backend = UnavailableBackend;
        let err = backend
            .load_model(Path::new("/definitely/not/here.onnx"))
            .err()
            .unwrap();
        assert!(matches!(err, GestureError::ModelMissing { .. }));
        assert!(matches!(
            backend.open_camera(0, 640, 480).err().unwrap(),
            GestureError::CameraUnavailable { index: 0, .. }
        ));
    }
}
