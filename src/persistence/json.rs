//! Score history as a JSON file
//!
//! Used when no database is wanted. Every save appends an entry; the file is
//! rewritten through a temporary file so a crash never leaves it half written.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::ScoreStore;
use crate::error::StoreError;

/// A single saved score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: u64,
    /// Unix timestamp (ms) when saved
    pub timestamp: f64,
}

/// Everything ever saved, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistory {
    pub entries: Vec<ScoreEntry>,
}

impl ScoreHistory {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest saved score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.score).max()
    }
}

#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the whole history; a missing file is an empty history
    pub fn history(&self) -> Result<ScoreHistory, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ScoreHistory::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, history: &ScoreHistory) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(history)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ScoreStore for JsonScoreStore {
    fn best_score(&self) -> Result<Option<u64>, StoreError> {
        Ok(self.history()?.top_score())
    }

    fn append_score(&self, score: u64) -> Result<(), StoreError> {
        let mut history = self.history()?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        history.entries.push(ScoreEntry { score, timestamp });
        self.write(&history)?;
        log::debug!(
            "Score history saved ({} entries) to {}",
            history.entries.len(),
            self.path.display()
        );
        Ok(())
    }
}
