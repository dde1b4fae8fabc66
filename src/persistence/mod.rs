//! Best-score persistence
//!
//! Stores keep every saved score; "best" is the maximum over the history.
//! The free functions [`load_best_score`] and [`save_best_score`] are the
//! game's entry points and never fail: a broken store degrades to "no
//! history" with a warning.

pub mod json;
pub mod sqlite;

pub use json::JsonScoreStore;
pub use sqlite::SqliteScoreStore;

use std::sync::Mutex;

use crate::error::StoreError;
use crate::settings::ScoreBackend;

/// Append-only score history
pub trait ScoreStore: Send {
    /// Highest score ever saved, `None` with no history
    fn best_score(&self) -> Result<Option<u64>, StoreError>;

    /// Append one score
    fn append_score(&self, score: u64) -> Result<(), StoreError>;
}

/// Best score, or 0 when there is none or the store cannot be read
pub fn load_best_score(store: &dyn ScoreStore) -> u64 {
    match store.best_score() {
        Ok(best) => {
            let best = best.unwrap_or(0);
            log::info!("Loaded best score {best}");
            best
        }
        Err(e) => {
            log::warn!("Score loading failed: {e}");
            0
        }
    }
}

/// Append `score`; returns false (after logging) when the store rejects it
pub fn save_best_score(store: &dyn ScoreStore, score: u64) -> bool {
    match store.append_score(score) {
        Ok(()) => {
            log::info!("Saved best score {score}");
            true
        }
        Err(e) => {
            log::warn!("Score saving failed: {e}");
            false
        }
    }
}

/// Open the configured store. Falls back to an in-memory history when the
/// configured one cannot be opened; the error is returned alongside so the
/// caller can tell the player once.
pub fn open_store(backend: &ScoreBackend) -> (Box<dyn ScoreStore>, Option<StoreError>) {
    let opened: Result<Box<dyn ScoreStore>, StoreError> = match backend {
        ScoreBackend::Sqlite { path } => {
            SqliteScoreStore::open(path).map(|s| Box::new(s) as Box<dyn ScoreStore>)
        }
        ScoreBackend::Json { path } => Ok(Box::new(JsonScoreStore::new(path))),
        ScoreBackend::Memory => Ok(Box::new(MemoryScoreStore::new())),
    };

    match opened {
        Ok(store) => (store, None),
        Err(e) => {
            log::warn!("Score store unavailable, scores will not persist: {e}");
            (Box::new(MemoryScoreStore::new()), Some(e))
        }
    }
}

/// Score history that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    scores: Mutex<Vec<u64>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved scores, oldest first
    pub fn history(&self) -> Vec<u64> {
        self.scores.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn best_score(&self) -> Result<Option<u64>, StoreError> {
        let scores = self.scores.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(scores.iter().copied().max())
    }

    fn append_score(&self, score: u64) -> Result<(), StoreError> {
        self.scores
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(score);
        Ok(())
    }
}
