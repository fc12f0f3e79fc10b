//! In-memory session repository.
//!
//! Sessions are stored as JSON so that whatever is saved has to survive the
//! same encoding a persistent store would apply.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialog::{Session, SessionKey};
use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::SessionRepository;

#[derive(Debug, Clone)]
struct StoredSession {
    last_activity: Timestamp,
    encoded: String,
}

#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionKey, StoredSession>>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        let Some(stored) = sessions.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(&stored.encoded)
            .map(Some)
            .map_err(|e| DomainError::storage(format!("Corrupt session {}: {}", key, e)))
    }

    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let encoded = serde_json::to_string(session)
            .map_err(|e| DomainError::storage(format!("Cannot encode session {}: {}", session.key, e)))?;
        self.sessions.write().await.insert(
            session.key,
            StoredSession {
                last_activity: session.last_activity,
                encoded,
            },
        );
        Ok(())
    }

    async fn remove_idle(&self, cutoff: &Timestamp) -> Result<Vec<SessionKey>, DomainError> {
        let mut sessions = self.sessions.write().await;
        let idle: Vec<SessionKey> = sessions
            .iter()
            .filter(|(_, stored)| stored.last_activity.is_before(cutoff))
            .map(|(key, _)| *key)
            .collect();
        for key in &idle {
            sessions.remove(key);
        }
        Ok(idle)
    }
}
