//! Session repository port.
//!
//! Holds the dialog state of every `(user, chat)` pair between messages.

use crate::domain::dialog::{Session, SessionKey};
use crate::domain::foundation::{DomainError, Timestamp};
use async_trait::async_trait;

/// Repository port for dialog sessions.
///
/// Callers serialize access per key; implementations only need to be safe
/// for concurrent use across distinct keys.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Load the session for a key.
    ///
    /// Returns `None` for a first contact or an evicted session.
    async fn load(&self, key: &SessionKey) -> Result<Option<Session>, DomainError>;

    /// Insert or replace a session.
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Remove every session with no activity since `cutoff`.
    ///
    /// Returns the keys that were removed.
    async fn remove_idle(&self, cutoff: &Timestamp) -> Result<Vec<SessionKey>, DomainError>;
}
