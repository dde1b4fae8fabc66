use std::fmt;
use std::path::PathBuf;

/// Failures opening or running the hand-gesture pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureError {
    CameraUnavailable { index: u32, reason: String },
    ModelMissing { path: PathBuf },
    ModelLoad { path: PathBuf, reason: String },
    /// A camera stopped delivering frames
    FrameRead(String),
    Inference(String),
    /// Gesture control was switched off for the rest of the session.
    Disabled,
    WorkerStopped,
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CameraUnavailable { index, reason } => {
                write!(f, "camera {index} unavailable: {reason}")
            }
            Self::ModelMissing { path } => {
                write!(f, "hand landmark model not found at {}", path.display())
            }
            Self::ModelLoad { path, reason } => {
                write!(f, "failed to load model {}: {reason}", path.display())
            }
            Self::FrameRead(reason) => write!(f, "camera frame read failed: {reason}"),
            Self::Inference(reason) => write!(f, "landmark inference failed: {reason}"),
            Self::Disabled => write!(f, "gesture control disabled for this session"),
            Self::WorkerStopped => write!(f, "gesture worker stopped unexpectedly"),
        }
    }
}

impl std::error::Error for GestureError {}

/// Failures reading or writing the score history.
#[derive(Debug)]
pub enum StoreError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    Json(serde_json::Error),
    LockPoisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "score database error: {e}"),
            Self::Io(e) => write!(f, "score file error: {e}"),
            Self::Json(e) => write!(f, "score file is not valid JSON: {e}"),
            Self::LockPoisoned => write!(f, "score store lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Sqlite(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::LockPoisoned => None,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Settings that cannot start a game. The only fatal class of error.
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidPlayArea { width: f32, height: f32 },
    InvalidInterval { name: &'static str, value: f64 },
    LandmarkOutOfRange { index: usize },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "settings file error: {e}"),
            Self::Parse(e) => write!(f, "settings file is not valid JSON: {e}"),
            Self::InvalidPlayArea { width, height } => {
                write!(f, "play area must be positive and finite, got {width}x{height}")
            }
            Self::InvalidInterval { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            Self::LandmarkOutOfRange { index } => {
                write!(f, "landmark index {index} out of range (0..21)")
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}
