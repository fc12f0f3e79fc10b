//! Session store: loads and saves dialog sessions, serializes dispatch per
//! session key and owns the process-wide lonely-user slot.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::OwnedMutexGuard;
use tokio::task::JoinHandle;

use crate::domain::dialog::{Session, SessionKey};
use crate::domain::foundation::{DomainError, ProfileId, Timestamp};
use crate::ports::SessionRepository;

/// The one participant waiting to hear about new meeting candidates.
///
/// Shared by all sessions. Only two operations touch the slot, both under
/// the same lock.
#[derive(Debug, Default)]
pub struct LonelyUserSlot {
    slot: Mutex<Option<ProfileId>>,
}

impl LonelyUserSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `profile` unless someone is already waiting.
    ///
    /// Returns true if `profile` is the waiting participant afterwards.
    pub fn register_if_empty(&self, profile: ProfileId) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        match *slot {
            Some(waiting) => waiting == profile,
            None => {
                *slot = Some(profile);
                true
            }
        }
    }

    /// Clears the slot if `profile` is still the one waiting.
    ///
    /// Returns false when the slot was taken by someone else meanwhile.
    pub fn take_if(&self, profile: ProfileId) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if *slot == Some(profile) {
            *slot = None;
            true
        } else {
            false
        }
    }

    /// Current occupant, for diagnostics.
    pub fn waiting(&self) -> Option<ProfileId> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Front of the session repository used by the dispatcher.
pub struct SessionStore {
    repository: Arc<dyn SessionRepository>,
    locks: Mutex<HashMap<SessionKey, Arc<tokio::sync::Mutex<()>>>>,
    lonely: Arc<LonelyUserSlot>,
}

impl SessionStore {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self {
            repository,
            locks: Mutex::new(HashMap::new()),
            lonely: Arc::new(LonelyUserSlot::new()),
        }
    }

    pub fn lonely_slot(&self) -> Arc<LonelyUserSlot> {
        Arc::clone(&self.lonely)
    }

    /// Waits for exclusive use of the session `key`.
    ///
    /// Waiters are served in the order they called, so events for one key
    /// are applied in arrival order.
    pub async fn lock(&self, key: SessionKey) -> OwnedMutexGuard<()> {
        let mutex = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(key).or_default())
        };
        mutex.lock_owned().await
    }

    /// Loads the session for `key`, or a fresh one on first contact.
    pub async fn load(&self, key: SessionKey) -> Result<Session, DomainError> {
        Ok(self
            .repository
            .load(&key)
            .await?
            .unwrap_or_else(|| Session::new(key)))
    }

    pub async fn save(&self, session: &Session) -> Result<(), DomainError> {
        self.repository.save(session).await
    }

    /// Removes sessions idle for longer than `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration, now: Timestamp) -> Result<usize, DomainError> {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let cutoff = now.minus_seconds(ttl_secs);
        let removed = self.repository.remove_idle(&cutoff).await?;

        // Locks nobody holds or waits on are recreated on demand.
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, mutex| Arc::strong_count(mutex) > 1);

        if !removed.is_empty() {
            tracing::info!(evicted = removed.len(), "Evicted idle sessions");
        }
        Ok(removed.len())
    }

    /// Runs `evict_idle` every `every` until the runtime shuts down.
    pub fn spawn_eviction(self: Arc<Self>, ttl: Duration, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                if let Err(e) = self.evict_idle(ttl, Timestamp::now()).await {
                    tracing::warn!(error = %e, "Session eviction failed");
                }
            }
        })
    }
}
