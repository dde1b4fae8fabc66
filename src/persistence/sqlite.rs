use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, params};

use super::ScoreStore;
use crate::error::StoreError;

/// Score history in a SQLite table, one row per saved score.
pub struct SqliteScoreStore {
    conn: Mutex<Connection>,
}

impl SqliteScoreStore {
    /// Open (or create) the database file and its table.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA busy_timeout=5000;")?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS GameScores (
                Id    INTEGER PRIMARY KEY AUTOINCREMENT,
                Score INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of saved rows.
    pub fn len(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM GameScores", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl ScoreStore for SqliteScoreStore {
    fn best_score(&self) -> Result<Option<u64>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let best: Option<i64> =
            conn.query_row("SELECT MAX(Score) FROM GameScores", [], |row| row.get(0))?;
        Ok(best.map(|v| v.max(0) as u64))
    }

    fn append_score(&self, score: u64) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let score = i64::try_from(score).unwrap_or(i64::MAX);
        conn.execute("INSERT INTO GameScores (Score) VALUES (?1)", params![score])?;
        Ok(())
    }
}
