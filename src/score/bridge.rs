//! Non-blocking write-through of the current score.
//!
//! The tick loop only ever pushes onto an unbounded queue. A dedicated worker
//! task drains the queue and applies each write on the blocking pool, so
//! storage latency never reaches gameplay. Writes are applied in arrival
//! order; failures are logged and dropped.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::session::SessionManager;
use super::store::{ScoreRecord, ScoreStore};

/// One pending score write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreWrite {
    pub session: String,
    pub value: u32,
}

/// Receiving end of the write queue, consumed by [`PersistenceWorker`]
pub type ScoreQueue = mpsc::UnboundedReceiver<ScoreWrite>;

/// Engine-facing handle to score storage and session identity
#[derive(Clone)]
pub struct ScoreBridge {
    store: Arc<dyn ScoreStore>,
    sessions: Arc<dyn SessionManager>,
    writes: mpsc::UnboundedSender<ScoreWrite>,
}

impl ScoreBridge {
    pub fn new(
        store: Arc<dyn ScoreStore>,
        sessions: Arc<dyn SessionManager>,
    ) -> (Self, ScoreQueue) {
        let (writes, queue) = mpsc::unbounded_channel();
        (
            Self {
                store,
                sessions,
                writes,
            },
            queue,
        )
    }

    /// Read the session's persisted score, falling back to zero on failure
    pub fn hydrate(&self) -> u32 {
        let session = match self.sessions.current_session() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("no session for score hydration, starting at 0: {err}");
                return 0;
            }
        };

        match self.store.current_score(&session) {
            Ok(score) => {
                tracing::info!(session = %session, score, "score hydrated");
                score
            }
            Err(err) => {
                tracing::warn!(session = %session, "score hydration failed, starting at 0: {err}");
                0
            }
        }
    }

    /// Queue a write of `value` for the current session without waiting
    pub fn record(&self, value: u32) {
        let session = match self.sessions.current_session() {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(score = value, "score not persisted, no session: {err}");
                return;
            }
        };

        if self.writes.send(ScoreWrite { session, value }).is_err() {
            tracing::warn!(score = value, "score not persisted, worker stopped");
        }
    }

    /// Drop the current session so the next game starts a fresh one
    pub fn end_session(&self) {
        if let Err(err) = self.sessions.destroy_current_session() {
            tracing::error!("failed to destroy session: {err}");
        }
    }

    pub fn high_score(&self) -> Option<ScoreRecord> {
        self.store.high_score().unwrap_or_else(|err| {
            tracing::warn!("failed to read high score: {err}");
            None
        })
    }

    pub fn leaderboard(&self, limit: usize) -> Vec<ScoreRecord> {
        self.store.scores(limit).unwrap_or_else(|err| {
            tracing::warn!("failed to read leaderboard: {err}");
            Vec::new()
        })
    }
}

/// Background task that applies queued score writes
pub struct PersistenceWorker {
    handle: JoinHandle<usize>,
}

impl PersistenceWorker {
    /// Start draining `queue`; must be called inside a tokio runtime
    pub fn spawn(store: Arc<dyn ScoreStore>, mut queue: ScoreQueue) -> Self {
        let handle = tokio::spawn(async move {
            tracing::info!("persistence worker started");
            let mut applied = 0;

            while let Some(write) = queue.recv().await {
                let store = Arc::clone(&store);
                let ScoreWrite { session, value } = write;
                let result = tokio::task::spawn_blocking(move || {
                    store
                        .set_current_score(&session, value)
                        .map_err(|err| (session, err))
                })
                .await;

                match result {
                    Ok(Ok(())) => applied += 1,
                    Ok(Err((session, err))) => {
                        tracing::warn!(session = %session, score = value, "score write failed: {err}");
                    }
                    Err(err) => {
                        tracing::error!(score = value, "score write task failed: {err}");
                    }
                }
            }

            tracing::info!(applied, "persistence worker stopped");
            applied
        });

        Self { handle }
    }

    /// Wait for the queue to drain and close.
    ///
    /// Returns once every [`ScoreBridge`] clone has been dropped; yields the
    /// number of writes that reached the store.
    pub async fn shutdown(self) -> usize {
        match self.handle.await {
            Ok(applied) => applied,
            Err(err) => {
                tracing::error!("persistence worker panicked: {err}");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::score::session::InMemorySessionManager;
    use crate::score::store::MemoryScoreStore;

    struct FailingStore;

    impl ScoreStore for FailingStore {
        fn current_score(&self, _session: &str) -> Result<u32, StoreError> {
            Err(StoreError::Poisoned)
        }
        fn set_current_score(&self, _session: &str, _value: u32) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
        fn high_score(&self) -> Result<Option<ScoreRecord>, StoreError> {
            Err(StoreError::Poisoned)
        }
        fn scores(&self, _limit: usize) -> Result<Vec<ScoreRecord>, StoreError> {
            Err(StoreError::Poisoned)
        }
    }

    fn memory_bridge() -> (ScoreBridge, ScoreQueue, Arc<MemoryScoreStore>, Arc<InMemorySessionManager>) {
        let store = Arc::new(MemoryScoreStore::new("ada"));
        let sessions = Arc::new(InMemorySessionManager::new());
        let (bridge, queue) = ScoreBridge::new(store.clone(), sessions.clone());
        (bridge, queue, store, sessions)
    }

    #[test]
    fn test_record_queues_without_runtime() {
        let (bridge, mut queue, _store, sessions) = memory_bridge();
        bridge.record(10);
        bridge.record(20);

        let session = sessions.current_session().unwrap();
        assert_eq!(
            queue.try_recv().unwrap(),
            ScoreWrite { session: session.clone(), value: 10 }
        );
        assert_eq!(queue.try_recv().unwrap().value, 20);
        assert!(queue.try_recv().is_err());
    }

    #[test]
    fn test_hydrate_reads_current_session() {
        let (bridge, _queue, store, sessions) = memory_bridge();
        let session = sessions.current_session().unwrap();
        store.set_current_score(&session, 700).unwrap();
        store.set_current_score("other", 50).unwrap();

        assert_eq!(bridge.hydrate(), 700);
    }

    #[test]
    fn test_hydrate_failure_degrades_to_zero() {
        let sessions = Arc::new(InMemorySessionManager::new());
        let (bridge, _queue) = ScoreBridge::new(Arc::new(FailingStore), sessions);

        assert_eq!(bridge.hydrate(), 0);
        assert!(bridge.high_score().is_none());
        assert!(bridge.leaderboard(5).is_empty());
    }

    #[test]
    fn test_end_session_rotates_identity() {
        let (bridge, mut queue, _store, sessions) = memory_bridge();
        bridge.record(10);
        bridge.end_session();
        bridge.record(20);

        let first = queue.try_recv().unwrap().session;
        let second = queue.try_recv().unwrap().session;
        assert_ne!(first, second);
        assert_eq!(sessions.current_session().unwrap(), second);
    }

    #[test]
    fn test_record_after_worker_gone_is_silent() {
        let (bridge, queue, _store, _sessions) = memory_bridge();
        drop(queue);
        bridge.record(10);
    }

    #[tokio::test]
    async fn test_worker_applies_writes_in_order() {
        let (bridge, queue, store, sessions) = memory_bridge();
        let worker = PersistenceWorker::spawn(store.clone(), queue);

        for value in [10, 20, 30] {
            bridge.record(value);
        }
        drop(bridge);

        assert_eq!(worker.shutdown().await, 3);
        let session = sessions.current_session().unwrap();
        assert_eq!(store.current_score(&session).unwrap(), 30);
    }

    #[tokio::test]
    async fn test_worker_survives_failed_writes() {
        let sessions = Arc::new(InMemorySessionManager::new());
        let store: Arc<dyn ScoreStore> = Arc::new(FailingStore);
        let (bridge, queue) = ScoreBridge::new(store.clone(), sessions);
        let worker = PersistenceWorker::spawn(store, queue);

        bridge.record(10);
        bridge.record(20);
        drop(bridge);

        assert_eq!(worker.shutdown().await, 0);
    }
}
