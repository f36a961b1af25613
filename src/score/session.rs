use std::sync::Mutex;

use uuid::Uuid;

use crate::error::SessionError;

/// Source of the opaque id that scopes one play-through's score
pub trait SessionManager: Send + Sync {
    /// Current session, created lazily when none exists
    fn current_session(&self) -> Result<String, SessionError>;

    /// Forget the current session; the next lookup creates a fresh one
    fn destroy_current_session(&self) -> Result<(), SessionError>;

    /// Replace the current session with a new one
    fn create_new_session(&self) -> Result<String, SessionError>;
}

/// Session ids held in process memory only
#[derive(Default)]
pub struct InMemorySessionManager {
    session: Mutex<Option<String>>,
}

impl InMemorySessionManager {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionManager for InMemorySessionManager {
    fn current_session(&self) -> Result<String, SessionError> {
        let mut session = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        let id = session.get_or_insert_with(|| {
            let id = Uuid::new_v4().simple().to_string();
            tracing::info!(session = %id, "session created");
            id
        });
        Ok(id.clone())
    }

    fn destroy_current_session(&self) -> Result<(), SessionError> {
        let mut session = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        if let Some(id) = session.take() {
            tracing::info!(session = %id, "session destroyed");
        }
        Ok(())
    }

    fn create_new_session(&self) -> Result<String, SessionError> {
        let mut session = self.session.lock().map_err(|_| SessionError::Poisoned)?;
        let id = Uuid::new_v4().simple().to_string();
        tracing::info!(session = %id, "session created");
        *session = Some(id.clone());
        Ok(id)
    }
}
