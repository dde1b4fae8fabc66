//! Background gesture sampling
//!
//! Opening a camera and loading a model can take seconds, so the worker does
//! both on its own thread, then keeps sampling into an [`AngleSlot`]. The tick
//! only ever reads the slot and the status flag.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{AngleSlot, GestureAdapter, GestureBackend, GestureSample};
use crate::error::GestureError;
use crate::settings::GestureSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStatus {
    Initializing,
    Ready,
    Failed,
    Stopped,
}

impl WorkerStatus {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => WorkerStatus::Initializing,
            1 => WorkerStatus::Ready,
            2 => WorkerStatus::Failed,
            _ => WorkerStatus::Stopped,
        }
    }
}

/// State shared with the sampling thread
struct Shared {
    slot: AngleSlot,
    status: AtomicU8,
    stop: AtomicBool,
    error: Mutex<Option<GestureError>>,
}

impl Shared {
    fn set_status(&self, status: WorkerStatus) {
        self.status.store(status as u8, Ordering::Release);
    }

    fn fail(&self, err: GestureError) {
        if let Ok(mut guard) = self.error.lock() {
            *guard = Some(err);
        }
        self.slot.clear();
        self.set_status(WorkerStatus::Failed);
    }
}

pub struct GestureWorker {
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl GestureWorker {
    /// Start initializing on a new thread; returns immediately
    pub fn spawn(
        backend: Arc<dyn GestureBackend>,
        settings: GestureSettings,
    ) -> Result<Self, GestureError> {
        let shared = Arc::new(Shared {
            slot: AngleSlot::new(),
            status: AtomicU8::new(WorkerStatus::Initializing as u8),
            stop: AtomicBool::new(false),
            error: Mutex::new(None),
        });

        let thread_shared = shared.clone();
        let handle = thread::Builder::new()
            .name("gesture-input".to_string())
            .spawn(move || run(thread_shared, backend, settings))
            .map_err(|_| GestureError::WorkerStopped)?;

        Ok(Self {
            shared,
            handle: Some(handle),
        })
    }

    pub fn status(&self) -> WorkerStatus {
        WorkerStatus::from_u8(self.shared.status.load(Ordering::Acquire))
    }

    pub fn latest(&self) -> GestureSample {
        self.shared.slot.latest()
    }

    /// The error that moved the worker to `Failed`, once
    pub fn take_error(&self) -> Option<GestureError> {
        self.shared.error.lock().ok().and_then(|mut e| e.take())
    }

    /// Stop sampling and wait until the camera has been released
    pub fn stop(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::warn!("Gesture worker panicked");
            }
        }
    }
}

impl Drop for GestureWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(shared: Arc<Shared>, backend: Arc<dyn GestureBackend>, settings: GestureSettings) {
    let mut adapter = match GestureAdapter::initialize(backend.as_ref(), &settings) {
        Ok(adapter) => adapter,
        Err(e) => {
            shared.fail(e);
            return;
        }
    };

    if shared.stop.load(Ordering::Acquire) {
        shared.set_status(WorkerStatus::Stopped);
        return;
    }
    shared.set_status(WorkerStatus::Ready);

    let interval = Duration::from_millis(settings.sample_interval_ms);
    while !shared.stop.load(Ordering::Acquire) {
        match adapter.sample_angle() {
            Ok(angle) => shared.slot.publish(angle),
            Err(e) => {
                drop(adapter);
                shared.fail(e);
                return;
            }
        }
        thread::park_timeout(interval);
    }

    drop(adapter);
    shared.set_status(WorkerStatus::Stopped);
}
