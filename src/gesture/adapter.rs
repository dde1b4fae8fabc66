//! Fallback-safe hand-angle sampling
//!
//! The adapter owns the camera for as long as it lives. Dropping it (mode
//! switch, shutdown, or an error path) releases the device.

use glam::Vec2;

use super::{
    FrameSource, GestureBackend, LandmarkModel, MODEL_INPUT_SIZE, index_finger_angle,
    parse_landmarks,
};
use crate::error::GestureError;
use crate::settings::GestureSettings;

pub struct GestureAdapter {
    camera: Box<dyn FrameSource>,
    model: Box<dyn LandmarkModel>,
    mirror: bool,
    base_landmark: usize,
    tip_landmark: usize,
}

impl GestureAdapter {
    /// Load the landmark model, then open the camera
    pub fn initialize(
        backend: &dyn GestureBackend,
        settings: &GestureSettings,
    ) -> Result<Self, GestureError> {
        let model = backend.load_model(&settings.model_path)?;
        let camera = backend.open_camera(
            settings.camera_index,
            settings.capture_width,
            settings.capture_height,
        )?;
        log::info!(
            "Gesture input ready (camera {}, model {})",
            settings.camera_index,
            settings.model_path.display()
        );
        Ok(Self {
            camera,
            model,
            mirror: settings.mirror,
            base_landmark: settings.base_landmark,
            tip_landmark: settings.tip_landmark,
        })
    }

    /// Current hand angle in degrees, or `None` when no frame or no hand
    pub fn sample_angle(&mut self) -> Result<Option<f32>, GestureError> {
        let Some(mut frame) = self.camera.read_frame()? else {
            return Ok(None);
        };
        if self.mirror {
            frame.mirror_horizontal();
        }

        let input = frame.to_input_tensor(MODEL_INPUT_SIZE);
        let output = self.model.infer(&input)?;
        let Some(landmarks) = parse_landmarks(&output) else {
            return Ok(None);
        };

        let scale = Vec2::new(frame.width() as f32, frame.height() as f32);
        let (Some(base), Some(tip)) = (
            landmarks.get(self.base_landmark),
            landmarks.get(self.tip_landmark),
        ) else {
            return Ok(None);
        };
        let base = Vec2::new(base.x, base.y) * scale;
        let tip = Vec2::new(tip.x, tip.y) * scale;

        let angle = index_finger_angle(base, tip);
        Ok(angle.is_finite().then_some(angle))
    }
}

impl Drop for GestureAdapter {
    fn drop(&mut self) {
        self.camera.release();
        log::debug!("Gesture camera released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::testing::{FakeBackend, Step};
    use std::sync::atomic::Ordering;

    #[test]
    fn test_sample_angle_sequence() {
        let backend = FakeBackend::new([Step::Angle(30.0), Step::NoHand, Step::Angle(-120.0)]);
        let mut adapter = GestureAdapter::initialize(&backend, &GestureSettings::default()).unwrap();

        let first = adapter.sample_angle().unwrap().unwrap();
        assert!((first - 30.0).abs() < 1e-3);
        assert_eq!(adapter.sample_angle().unwrap(), None);
        let third = adapter.sample_angle().unwrap().unwrap();
        assert!((third + 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_inference_error_propagates() {
        let backend = FakeBackend::new([Step::Fail]);
        let mut adapter = GestureAdapter::initialize(&backend, &GestureSettings::default()).unwrap();
        assert!(matches!(
            adapter.sample_angle(),
            Err(GestureError::Inference(_))
        ));
    }

    #[test]
    fn test_camera_failure_is_reported() {
        let backend = FakeBackend::without_camera();
        let result = GestureAdapter::initialize(&backend, &GestureSettings::default());
        assert!(matches!(
            result.err(),
            Some(GestureError::CameraUnavailable { .. })
        ));
    }

    #[test]
    fn test_drop_releases_camera() {
        let backend = FakeBackend::new([]);
        let adapter = GestureAdapter::initialize(&backend, &GestureSettings::default()).unwrap();
        assert!(!backend.tally.camera_released.load(Ordering::SeqCst));
        drop(adapter);
        assert!(backend.tally.camera_released.load(Ordering::SeqCst));
    }
}
