//! Profile repository port.
//!
//! Profiles are owned by the storage collaborator. The dialog creates them on
//! first contact and updates them when the meeting survey is confirmed.

use crate::domain::foundation::{DomainError, ProfileId, UserId};
use crate::domain::meetup::{MessengerIdentity, Profile};
use async_trait::async_trait;

/// Repository port for participant profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns the profile linked to the sender, creating it on first contact.
    ///
    /// A new profile takes its name from the sender's first name and its
    /// contact from the sender's username.
    async fn get_or_create(&self, identity: &MessengerIdentity) -> Result<Profile, DomainError>;

    /// Find a profile by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &ProfileId) -> Result<Option<Profile>, DomainError>;

    /// Find the profile linked to a messenger user.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Option<Profile>, DomainError>;

    /// Update an existing profile.
    ///
    /// # Errors
    ///
    /// - `ProfileNotFound` if the profile doesn't exist
    async fn update(&self, profile: &Profile) -> Result<(), DomainError>;

    /// All profiles that completed the meeting survey.
    async fn list_ready_to_meet(&self) -> Result<Vec<Profile>, DomainError>;
}
