//! Error types shared by the level loader and the score/session collaborators.

use thiserror::Error;

/// Failure reading or writing persisted scores
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("score store lock poisoned")]
    Poisoned,
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure obtaining or discarding a session identity
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session lock poisoned")]
    Poisoned,
}

/// Rejected level ladder or level definition
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level ladder is empty")]
    EmptyLadder,
    #[error("level {ordinal}: {reason}")]
    InvalidLevel { ordinal: u32, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(ordinal: u32, reason: impl Into<String>) -> Self {
        ConfigError::InvalidLevel {
            ordinal,
            reason: reason.into(),
        }
    }
}
