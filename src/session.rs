//! Game session
//!
//! Owns one world and everything it talks to: the input controller, the score
//! store and the sprite catalog. The host calls [`GameSession::advance`] once
//! per frame (or [`GameSession::tick_once`] from its own timer) and draws from
//! the [`TickReport`]s it gets back or receives on a subscription.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::AssetCatalog;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::control::{ControlMode, InputController};
use crate::error::SettingsError;
use crate::gesture::GestureBackend;
use crate::persistence::{ScoreStore, load_best_score, open_store, save_best_score};
use crate::settings::{GameSettings, SpawnRate};
use crate::sim::{Enemy, Explosion, GameEvent, GameState, Projectile, ScoreState, TickInput, Turret, tick};

/// One-time message for the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notice {
    /// Gesture control could not start; pointer control is in effect
    CameraUnavailable(String),
    /// Gesture control stopped working mid-game
    GestureFailed(String),
    /// Sprites that will be drawn as fallbacks
    AssetsMissing { missing: usize },
    /// Scores from this session will not be kept
    ScoreStoreUnavailable(String),
}

/// Snapshot of the world after one tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub tick: u64,
    /// Simulated seconds
    pub clock: f64,
    pub turret: Turret,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub explosions: Vec<Explosion>,
    pub score: ScoreState,
    pub control_mode: ControlMode,
    pub events: Vec<GameEvent>,
    pub notices: Vec<Notice>,
}

impl TickReport {
    fn capture(state: &GameState, control_mode: ControlMode, notices: Vec<Notice>) -> Self {
        Self {
            tick: state.time_ticks,
            clock: state.clock(),
            turret: state.turret.clone(),
            projectiles: state.projectiles.clone(),
            enemies: state.enemies.clone(),
            explosions: state.explosions.clone(),
            score: state.score,
            control_mode,
            events: state.events.clone(),
            notices,
        }
    }
}

pub struct GameSession {
    state: GameState,
    input: InputController,
    store: Box<dyn ScoreStore>,
    assets: AssetCatalog,
    subscribers: Vec<Sender<TickReport>>,
    /// Notices raised outside the controller, published with the next tick
    pending: Vec<Notice>,
    accumulator: f32,
    stopped: bool,
}

impl GameSession {
    /// Build a session with the score store named in `settings`
    pub fn new(
        settings: GameSettings,
        seed: u64,
        backend: Arc<dyn GestureBackend>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;
        let (store, store_err) = open_store(&settings.scores);
        let mut session = Self::with_store(settings, seed, backend, store)?;
        if let Some(e) = store_err {
            session
                .pending
                .push(Notice::ScoreStoreUnavailable(e.to_string()));
        }
        Ok(session)
    }

    /// Build a session around an already opened score store
    pub fn with_store(
        settings: GameSettings,
        seed: u64,
        backend: Arc<dyn GestureBackend>,
        store: Box<dyn ScoreStore>,
    ) -> Result<Self, SettingsError> {
        settings.validate()?;

        let best = load_best_score(store.as_ref());
        let state = GameState::new(seed, &settings, best);

        let mut pending = Vec::new();
        let assets = match &settings.asset_dir {
            Some(dir) => AssetCatalog::load(dir),
            None => AssetCatalog::placeholders(),
        };
        if !assets.missing().is_empty() {
            pending.push(Notice::AssetsMissing {
                missing: assets.missing().len(),
            });
        }

        let mut input = InputController::new(backend, settings.gesture.clone());
        if settings.control_mode == ControlMode::Gesture {
            input.select_gesture();
        }

        log::info!(
            "Session started (seed {seed}, spawn rate {}, best {best})",
            settings.spawn_rate.as_str()
        );

        Ok(Self {
            state,
            input,
            store,
            assets,
            subscribers: Vec::new(),
            pending,
            accumulator: 0.0,
            stopped: false,
        })
    }

    /// Receive a report after every tick until the session shuts down
    pub fn subscribe(&mut self) -> Receiver<TickReport> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Run exactly one tick. `pointer` is the pointer position in play-area
    /// coordinates, if the host has one. Returns `None` after shutdown.
    pub fn tick_once(&mut self, pointer: Option<Vec2>) -> Option<TickReport> {
        if self.stopped {
            return None;
        }

        let aim = self.input.aim(pointer);
        tick(&mut self.state, &TickInput { aim }, SIM_DT);

        let mut notices = std::mem::take(&mut self.pending);
        notices.extend(self.input.drain_notices());
        for notice in &notices {
            log::info!("Notice: {notice:?}");
        }

        let report = TickReport::capture(&self.state, self.input.mode(), notices);
        self.publish(&report);
        Some(report)
    }

    /// Feed one frame's wall time; runs as many fixed ticks as fit (capped).
    /// Returns the reports of the ticks that ran.
    pub fn advance(&mut self, frame_dt: f32, pointer: Option<Vec2>) -> Vec<TickReport> {
        if self.stopped {
            return Vec::new();
        }

        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, 0.1)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut reports = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if let Some(report) = self.tick_once(pointer) {
                reports.push(report);
            }
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        reports
    }

    fn publish(&mut self, report: &TickReport) {
        // Receivers that hung up are dropped
        self.subscribers.retain(|tx| tx.send(report.clone()).is_ok());
    }

    pub fn set_spawn_rate(&mut self, rate: SpawnRate) {
        log::info!("Spawn rate set to {}", rate.as_str());
        self.state.set_spawn_rate(rate);
    }

    pub fn select_pointer(&mut self) {
        self.input.select_pointer();
    }

    /// Returns false when gesture control is unavailable
    pub fn select_gesture(&mut self) -> bool {
        self.input.select_gesture()
    }

    pub fn control_mode(&self) -> ControlMode {
        self.input.mode()
    }

    pub fn gesture_available(&self) -> bool {
        self.input.gesture_available()
    }

    pub fn world(&self) -> &GameState {
        &self.state
    }

    pub fn score(&self) -> ScoreState {
        self.state.score
    }

    pub fn assets(&self) -> &AssetCatalog {
        &self.assets
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// End the session: save the best score, then release the camera and
    /// model. Ticks after this do nothing. Returns whether the save succeeded.
    pub fn shutdown(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.stopped = true;

        let saved = save_best_score(self.store.as_ref(), self.state.score.best);
        self.input.shutdown();
        self.subscribers.clear();

        log::info!(
            "Session ended after {} ticks ({})",
            self.state.time_ticks,
            self.state.score.hud_line()
        );
        saved
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
