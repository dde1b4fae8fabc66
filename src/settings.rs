//! Game settings and preferences
//!
//! Persisted as a JSON file next to the score history. Missing fields fall
//! back to defaults so older files keep loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::control::ControlMode;
use crate::error::SettingsError;
use crate::gesture::LANDMARK_COUNT;

/// Enemy spawn rate presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SpawnRate {
    Fast,
    Medium,
    #[default]
    Slow,
}

impl SpawnRate {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnRate::Fast => "Fast",
            SpawnRate::Medium => "Medium",
            SpawnRate::Slow => "Slow",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Some(SpawnRate::Fast),
            "medium" | "med" => Some(SpawnRate::Medium),
            "slow" => Some(SpawnRate::Slow),
            _ => None,
        }
    }

    /// Seconds between enemy spawns
    pub fn interval_secs(&self) -> f64 {
        match self {
            SpawnRate::Fast => 0.5,
            SpawnRate::Medium => 1.0,
            SpawnRate::Slow => 2.0,
        }
    }
}

/// What happens to a projectile after it destroys an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HitPolicy {
    /// Projectile is consumed by its first hit
    #[default]
    SingleHit,
    /// Projectile keeps flying; it still scores at most one kill per tick
    Piercing,
}

/// Camera and landmark-model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub model_path: PathBuf,
    pub camera_index: u32,
    pub capture_width: u32,
    pub capture_height: u32,
    /// Mirror frames horizontally before inference, as a front camera shows
    /// the player
    pub mirror: bool,
    /// Open the camera and sample it on a worker thread. When false, opening
    /// and every frame read happen on the tick thread and block it.
    pub threaded: bool,
    /// Worker sampling cadence
    pub sample_interval_ms: u64,
    pub base_landmark: usize,
    pub tip_landmark: usize,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("Models").join("hand_landmark_sparse_Nx3x224x224.onnx"),
            camera_index: 0,
            capture_width: 640,
            capture_height: 480,
            mirror: true,
            threaded: true,
            sample_interval_ms: 33,
            // Index finger MCP and tip in the 21-point hand layout
            base_landmark: 5,
            tip_landmark: 8,
        }
    }
}

/// Where the best-score history lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScoreBackend {
    Sqlite { path: PathBuf },
    Json { path: PathBuf },
    Memory,
}

impl Default for ScoreBackend {
    fn default() -> Self {
        ScoreBackend::Sqlite {
            path: PathBuf::from("game_scores.db"),
        }
    }
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    // === Play area ===
    pub play_width: f32,
    pub play_height: f32,

    // === Difficulty ===
    pub spawn_rate: SpawnRate,
    /// Seconds between shots
    pub shot_interval: f64,
    /// Seconds the turret stays hidden after firing
    pub turret_recovery: f64,
    /// Minimum seconds between pointer-driven turret rotations
    pub min_rotation_interval: f64,
    pub hit_policy: HitPolicy,

    // === Input ===
    pub control_mode: ControlMode,
    pub gesture: GestureSettings,

    // === Storage ===
    pub scores: ScoreBackend,
    /// Sprite directory; `None` runs with placeholders
    pub asset_dir: Option<PathBuf>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            play_width: PLAY_WIDTH,
            play_height: PLAY_HEIGHT,

            spawn_rate: SpawnRate::Slow,
            shot_interval: SHOT_INTERVAL,
            turret_recovery: TURRET_RECOVERY,
            min_rotation_interval: MIN_ROTATION_INTERVAL,
            hit_policy: HitPolicy::SingleHit,

            control_mode: ControlMode::Pointer,
            gesture: GestureSettings::default(),

            scores: ScoreBackend::default(),
            asset_dir: None,
        }
    }
}

impl GameSettings {
    /// Create settings from a spawn-rate preset
    pub fn from_preset(rate: SpawnRate) -> Self {
        Self {
            spawn_rate: rate,
            ..Self::default()
        }
    }

    /// Check values that would make the simulation meaningless
    pub fn validate(&self) -> Result<(), SettingsError> {
        let area_ok = |v: f32| v.is_finite() && v > 0.0;
        if !area_ok(self.play_width) || !area_ok(self.play_height) {
            return Err(SettingsError::InvalidPlayArea {
                width: self.play_width,
                height: self.play_height,
            });
        }

        for (name, value) in [
            ("shot_interval", self.shot_interval),
            ("turret_recovery", self.turret_recovery),
            ("min_rotation_interval", self.min_rotation_interval),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SettingsError::InvalidInterval { name, value });
            }
        }

        for index in [self.gesture.base_landmark, self.gesture.tip_landmark] {
            if index >= LANDMARK_COUNT {
                return Err(SettingsError::LandmarkOutOfRange { index });
            }
        }

        Ok(())
    }

    /// Read and validate a settings file
    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is absent or bad
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
