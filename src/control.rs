//! Turret control mode
//!
//! Pointer and gesture control are mutually exclusive. Gesture input is
//! opened lazily the first time gesture mode is chosen; if it cannot be opened,
//! or it fails later, control drops back to the pointer and gesture mode stays
//! off for the rest of the session.

use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::GestureError;
use crate::gesture::{GestureAdapter, GestureBackend, GestureWorker, WorkerStatus};
use crate::session::Notice;
use crate::settings::GestureSettings;
use crate::sim::Aim;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    #[default]
    Pointer,
    Gesture,
}

/// How gesture samples reach the tick
enum GestureDriver {
    /// Sampled on the tick thread
    Inline(GestureAdapter),
    /// Sampled on a worker thread, read from its slot
    Threaded(GestureWorker),
}

pub struct InputController {
    mode: ControlMode,
    backend: Arc<dyn GestureBackend>,
    settings: GestureSettings,
    driver: Option<GestureDriver>,
    gesture_disabled: bool,
    notices: Vec<Notice>,
}

impl InputController {
    pub fn new(backend: Arc<dyn GestureBackend>, settings: GestureSettings) -> Self {
        Self {
            mode: ControlMode::Pointer,
            backend,
            settings,
            driver: None,
            gesture_disabled: false,
            notices: Vec::new(),
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn is_pointer_mode(&self) -> bool {
        self.mode == ControlMode::Pointer
    }

    pub fn is_gesture_mode(&self) -> bool {
        self.mode == ControlMode::Gesture
    }

    /// False once gesture input has failed this session
    pub fn gesture_available(&self) -> bool {
        !self.gesture_disabled
    }

    /// Switch modes; returns the mode actually in effect
    pub fn set_mode(&mut self, mode: ControlMode) -> ControlMode {
        match mode {
            ControlMode::Pointer => self.select_pointer(),
            ControlMode::Gesture => {
                self.select_gesture();
            }
        }
        self.mode
    }

    /// Pointer control; releases the camera if it was open
    pub fn select_pointer(&mut self) {
        if self.driver.take().is_some() {
            log::info!("Gesture input closed");
        }
        self.mode = ControlMode::Pointer;
    }

    /// Gesture control, opening the camera on first use. Returns false when
    /// gesture control is unavailable and pointer control stays in effect.
    pub fn select_gesture(&mut self) -> bool {
        if self.gesture_disabled {
            log::debug!("Gesture mode requested but disabled for this session");
            self.mode = ControlMode::Pointer;
            return false;
        }

        if self.driver.is_none() {
            let opened = if self.settings.threaded {
                GestureWorker::spawn(self.backend.clone(), self.settings.clone())
                    .map(GestureDriver::Threaded)
            } else {
                GestureAdapter::initialize(self.backend.as_ref(), &self.settings)
                    .map(GestureDriver::Inline)
            };
            match opened {
                Ok(driver) => self.driver = Some(driver),
                Err(e) => {
                    self.disable_gesture(e, true);
                    return false;
                }
            }
        }

        self.mode = ControlMode::Gesture;
        true
    }

    /// Aim for this tick. Never blocks on the worker and never fails: a
    /// gesture error switches to pointer control and this tick holds aim.
    pub fn aim(&mut self, pointer: Option<Vec2>) -> Aim {
        if self.mode == ControlMode::Pointer {
            return pointer.map(Aim::Pointer).unwrap_or(Aim::Hold);
        }

        let sample = match self.driver.as_mut() {
            Some(GestureDriver::Inline(adapter)) => adapter.sample_angle(),
            Some(GestureDriver::Threaded(worker)) => match worker.status() {
                WorkerStatus::Ready => Ok(worker.latest().angle()),
                WorkerStatus::Initializing => Ok(None),
                WorkerStatus::Failed | WorkerStatus::Stopped => {
                    Err(worker.take_error().unwrap_or(GestureError::WorkerStopped))
                }
            },
            None => Err(GestureError::Disabled),
        };

        match sample {
            Ok(Some(angle)) => Aim::Gesture(angle),
            Ok(None) => Aim::Hold,
            Err(e) => {
                let at_init = matches!(
                    e,
                    GestureError::CameraUnavailable { .. }
                        | GestureError::ModelMissing { .. }
                        | GestureError::ModelLoad { .. }
                );
                self.disable_gesture(e, at_init);
                Aim::Hold
            }
        }
    }

    /// Close gesture input for good and return to pointer control
    fn disable_gesture(&mut self, err: GestureError, at_init: bool) {
        log::warn!("Gesture control unavailable, switching to pointer: {err}");
        self.driver = None;
        self.gesture_disabled = true;
        self.mode = ControlMode::Pointer;
        self.notices.push(if at_init {
            Notice::CameraUnavailable(err.to_string())
        } else {
            Notice::GestureFailed(err.to_string())
        });
    }

    /// One-time notices raised since the last call
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Release the camera and model now
    pub fn shutdown(&mut self) {
        self.select_pointer();
    }
}
