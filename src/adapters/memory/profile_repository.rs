//! In-memory profile repository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ProfileId, UserId};
use crate::domain::meetup::{MessengerIdentity, Profile};
use crate::ports::ProfileRepository;

/// Profiles kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileRepository {
    profiles: Arc<RwLock<Vec<Profile>>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a profile as-is, replacing one with the same ID.
    pub async fn insert(&self, profile: Profile) {
        let mut profiles = self.profiles.write().await;
        profiles.retain(|p| p.id != profile.id);
        profiles.push(profile);
    }

    pub async fn count(&self) -> usize {
        self.profiles.read().await.len()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn get_or_create(&self, identity: &MessengerIdentity) -> Result<Profile, DomainError> {
        let mut profiles = self.profiles.write().await;
        if let Some(existing) = profiles.iter().find(|p| p.user_id == identity.user_id) {
            return Ok(existing.clone());
        }
        let profile = Profile::from_identity(identity);
        profiles.push(profile.clone());
        Ok(profile)
    }

    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.id == *id).cloned())
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| p.user_id == *user_id).cloned())
    }

    async fn update(&self, profile: &Profile) -> Result<(), DomainError> {
        let mut profiles = self.profiles.write().await;
        let slot = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ProfileNotFound, "Profile not found")
                    .with_detail("profile_id", profile.id.to_string())
            })?;
        *slot = profile.clone();
        Ok(())
    }

    async fn list_ready_to_meet(&self) -> Result<Vec<Profile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().filter(|p| p.ready_to_meet).cloned().collect())
    }
}
