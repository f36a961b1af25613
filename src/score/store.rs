use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// One persisted score, keyed by session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub user: String,
    pub session: String,
    pub value: u32,
    /// Unix seconds when the session first recorded a score
    pub created_at: i64,
}

/// Durable per-session score storage.
///
/// Writes for the same session overwrite each other; the latest write wins.
pub trait ScoreStore: Send + Sync {
    /// Score recorded for `session`, zero when nothing was recorded yet
    fn current_score(&self, session: &str) -> Result<u32, StoreError>;

    fn set_current_score(&self, session: &str, value: u32) -> Result<(), StoreError>;

    /// Highest score across all sessions
    fn high_score(&self) -> Result<Option<ScoreRecord>, StoreError>;

    /// Top `limit` scores, highest first
    fn scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError>;
}

pub(crate) fn now_unix_s() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs() as i64)
        .unwrap_or(0)
}

/// Process-local store, lost on exit
pub struct MemoryScoreStore {
    user: String,
    records: Mutex<HashMap<String, ScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn current_score(&self, session: &str) -> Result<u32, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(session).map(|record| record.value).unwrap_or(0))
    }

    fn set_current_score(&self, session: &str, value: u32) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records
            .entry(session.to_string())
            .and_modify(|record| record.value = value)
            .or_insert_with(|| ScoreRecord {
                user: self.user.clone(),
                session: session.to_string(),
                value,
                created_at: now_unix_s(),
            });
        Ok(())
    }

    fn high_score(&self) -> Result<Option<ScoreRecord>, StoreError> {
        Ok(self.scores(1)?.into_iter().next())
    }

    fn scores(&self, limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let mut sorted: Vec<ScoreRecord> = records.values().cloned().collect();
        sorted.sort_by(|a, b| b.value.cmp(&a.value).then(a.created_at.cmp(&b.created_at)));
        sorted.truncate(limit);
        Ok(sorted)
    }
}
