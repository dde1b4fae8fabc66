//! Session start-up, gesture control through a real backend implementation,
//! and teardown ordering.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::Vec2;
use turret_defense::gesture::{
    Frame, FrameSource, GestureBackend, InputTensor, LANDMARK_COUNT, LANDMARK_STRIDE,
    LandmarkModel, UnavailableBackend,
};
use turret_defense::persistence::{ScoreStore, SqliteScoreStore};
use turret_defense::settings::{GestureSettings, ScoreBackend};
use turret_defense::sim::GameEvent;
use turret_defense::{ControlMode, GameSession, GameSettings, GestureError, Notice};

/// Hand pointing at a fixed angle until `fail_after` inferences have run
struct HandBackend {
    degrees: f32,
    fail_after: Option<usize>,
    infer_calls: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

impl HandBackend {
    fn new(degrees: f32, fail_after: Option<usize>) -> Self {
        Self {
            degrees,
            fail_after,
            infer_calls: Arc::default(),
            released: Arc::default(),
        }
    }
}

struct StillCamera {
    released: Arc<AtomicBool>,
}

impl FrameSource for StillCamera {
    fn read_frame(&mut self) -> Result<Option<Frame>, GestureError> {
        Ok(Frame::new(8, 8, vec![200; 8 * 8 * 3]))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

struct PointingModel {
    output: Vec<f32>,
    fail_after: Option<usize>,
    calls: Arc<AtomicUsize>,
}

impl LandmarkModel for PointingModel {
    fn infer(&mut self, input: &InputTensor) -> Result<Vec<f32>, GestureError> {
        assert_eq!(input.shape(), [1, 3, 224, 224]);
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.fail_after {
            Some(limit) if n >= limit => Err(GestureError::Inference("device lost".into())),
            _ => Ok(self.output.clone()),
        }
    }
}

impl GestureBackend for HandBackend {
    fn open_camera(
        &self,
        _index: u32,
        _width: u32,
        _height: u32,
    ) -> Result<Box<dyn FrameSource>, GestureError> {
        Ok(Box::new(StillCamera {
            released: self.released.clone(),
        }))
    }

    fn load_model(&self, _path: &Path) -> Result<Box<dyn LandmarkModel>, GestureError> {
        // Base at the center, tip a quarter frame away along the angle
        let mut output = vec![0.5; LANDMARK_COUNT * LANDMARK_STRIDE];
        let r = self.degrees.to_radians();
        output[8 * LANDMARK_STRIDE] = 0.5 + 0.25 * r.cos();
        output[8 * LANDMARK_STRIDE + 1] = 0.5 - 0.25 * r.sin();
        Ok(Box::new(PointingModel {
            output,
            fail_after: self.fail_after,
            calls: self.infer_calls.clone(),
        }))
    }
}

fn settings(threaded: bool) -> GameSettings {
    GameSettings {
        scores: ScoreBackend::Memory,
        gesture: GestureSettings {
            threaded,
            sample_interval_ms: 1,
            ..GestureSettings::default()
        },
        ..GameSettings::default()
    }
}

/// Tick until the turret turns or the deadline passes
fn first_rotation(session: &mut GameSession) -> Option<f32> {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        let report = session.tick_once(None)?;
        for event in &report.events {
            if let GameEvent::TurretRotated { angle } = event {
                return Some(*angle);
            }
        }
        thread::sleep(Duration::from_millis(1));
    }
    None
}

#[test]
fn test_inline_gesture_turns_turret_opposite_to_hand() {
    let backend = Arc::new(HandBackend::new(30.0, None));
    let mut session = GameSession::new(settings(false), 5, backend.clone()).unwrap();
    assert!(session.select_gesture());
    assert_eq!(session.control_mode(), ControlMode::Gesture);

    let angle = first_rotation(&mut session).unwrap();
    assert!((angle + 30.0).abs() < 1e-3, "angle {angle}");

    session.shutdown();
    assert!(backend.released.load(Ordering::SeqCst));
}

#[test]
fn test_threaded_gesture_reaches_tick() {
    let backend = Arc::new(HandBackend::new(-45.0, None));
    let mut session = GameSession::new(settings(true), 5, backend.clone()).unwrap();
    assert!(session.select_gesture());

    let angle = first_rotation(&mut session).unwrap();
    assert!((angle - 45.0).abs() < 1e-3, "angle {angle}");

    session.select_pointer();
    assert!(backend.released.load(Ordering::SeqCst));
    assert_eq!(session.control_mode(), ControlMode::Pointer);
}

#[test]
fn test_threaded_failure_falls_back_to_pointer() {
    let backend = Arc::new(HandBackend::new(10.0, Some(3)));
    let mut session = GameSession::new(settings(true), 5, backend.clone()).unwrap();
    assert!(session.select_gesture());

    let deadline = Instant::now() + Duration::from_secs(5);
    let mut notices = Vec::new();
    while session.control_mode() == ControlMode::Gesture && Instant::now() < deadline {
        notices.extend(session.tick_once(Some(Vec2::new(400.0, 0.0))).unwrap().notices);
        thread::sleep(Duration::from_millis(1));
    }
    notices.extend(session.tick_once(None).unwrap().notices);

    assert_eq!(session.control_mode(), ControlMode::Pointer);
    assert!(!session.gesture_available());
    assert!(matches!(notices.as_slice(), [Notice::GestureFailed(_)]));
    assert!(backend.released.load(Ordering::SeqCst));

    // No more sampling once disabled
    let calls = backend.infer_calls.load(Ordering::SeqCst);
    for _ in 0..20 {
        session.tick_once(None);
    }
    thread::sleep(Duration::from_millis(10));
    assert_eq!(backend.infer_calls.load(Ordering::SeqCst), calls);
    assert!(!session.select_gesture());
}

#[test]
fn test_pointer_mode_rate_limits_turning() {
    let mut session =
        GameSession::new(settings(false), 5, Arc::new(UnavailableBackend)).unwrap();
    // Straight down from the turret in screen space
    let below = Vec2::new(400.0, 500.0);
    let above = Vec2::new(400.0, 100.0);

    let mut rotations = Vec::new();
    for i in 0..120 {
        let pointer = if i < 30 { below } else { above };
        for event in session.tick_once(Some(pointer)).unwrap().events {
            if let GameEvent::TurretRotated { angle } = event {
                rotations.push((i, angle));
            }
        }
    }
    // Turns on the first tick, then at most once a second
    assert_eq!(rotations.len(), 2);
    assert_eq!(rotations[0].0, 0);
    assert!((rotations[0].1 - 90.0).abs() < 1e-3);
    assert_eq!(rotations[1].0, 60);
    assert!((rotations[1].1 + 90.0).abs() < 1e-3);
}

#[test]
fn test_best_score_survives_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("game_scores.db");
    SqliteScoreStore::open(&db).unwrap().append_score(12).unwrap();

    let with_db = || GameSettings {
        scores: ScoreBackend::Sqlite { path: db.clone() },
        ..settings(false)
    };

    let mut first = GameSession::new(with_db(), 1, Arc::new(UnavailableBackend)).unwrap();
    assert_eq!(first.score().best, 12);
    assert_eq!(first.score().current, 0);
    for _ in 0..10 {
        first.tick_once(None);
    }
    assert!(first.shutdown());
    assert!(first.tick_once(None).is_none());

    let second = GameSession::new(with_db(), 2, Arc::new(UnavailableBackend)).unwrap();
    assert!(second.score().best >= 12);
    drop(second);

    let store = SqliteScoreStore::open(&db).unwrap();
    // Seeded row plus one save per session
    assert_eq!(store.len().unwrap(), 3);
}
