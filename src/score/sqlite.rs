use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, Row, params};

use super::store::{ScoreRecord, ScoreStore, now_unix_s};
use crate::error::StoreError;

/// SQLite-backed score table, one row per session.
///
/// The connection sits behind a mutex, so writes are serialized.
pub struct SqliteScoreStore {
    user: String,
    conn: Mutex<Connection>,
}

impl SqliteScoreStore {
    /// Open (or create) the database file and the `scores` table
    pub fn open(path: &Path, user: impl Into<String>) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )?;
        Self::with_connection(conn, user)
    }

    pub fn open_in_memory(user: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, user)
    }

    fn with_connection(conn: Connection, user: impl Into<String>) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS scores (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                user        TEXT NOT NULL,
                session     TEXT NOT NULL UNIQUE,
                value       INTEGER NOT NULL,
                created_at  INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_scores_value ON scores (value DESC);",
        )?;

        Ok(Self {
            user: user.into(),
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ScoreRecord> {
    Ok(ScoreRecord {
        user: row.get(0)?,
        session: row.get(1)?,
        value: row.get(2)?,
        created_at: row.get(3)?,
    })
}

impl ScoreStore for SqliteScoreStore {
    fn current_score(&self, session: &str) -> Result<u32, StoreError> {
        let conn = self.conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM scores WHERE session = ?1",
                params![session],
                |row| row.get::<_, u32>(0),
            )
            .optional()?;
        Ok(value.unwrap_or(0))
    }

    fn set_current_score(&self, session: &str, value: u32) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO scores (user, session, value, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(session) DO UPDATE SET value = excluded.value
             WHERE scores.user = excluded.user",
            params![self.user, session, value, now_unix_s()],
        )?;
        Ok(())
    }

    fn high_score(&self) -> Result<Option<ScoreRecord>, StoreError> {
        Ok(self.scores(1)?.into_iter().next())
    }

    fn scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user, session, value, created_at FROM scores
             ORDER BY value DESC, created_at ASC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], record_from_row)?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}
