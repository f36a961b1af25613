//! Score persistence and session identity, consumed by the engine through
//! [`ScoreBridge`].

pub mod bridge;
pub mod session;
pub mod sqlite;
pub mod store;

pub use bridge::{PersistenceWorker, ScoreBridge, ScoreQueue, ScoreWrite};
pub use session::{InMemorySessionManager, SessionManager};
pub use sqlite::SqliteScoreStore;
pub use store::{MemoryScoreStore, ScoreRecord, ScoreStore};
