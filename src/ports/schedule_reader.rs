//! Schedule reader port (read side).
//!
//! The program is edited outside the bot; the dialog only reads it.

use crate::domain::foundation::{DomainError, EventGroupId, EventId, PresentationId, ProfileId};
use crate::domain::meetup::{Event, EventGroup, Presentation};
use async_trait::async_trait;

/// Read-only access to event groups, events and presentations.
///
/// Event lists are ordered by start time.
#[async_trait]
pub trait ScheduleReader: Send + Sync {
    /// All event groups in program order.
    async fn list_event_groups(&self) -> Result<Vec<EventGroup>, DomainError>;

    /// Find a group by its exact title.
    async fn find_event_group_by_title(
        &self,
        title: &str,
    ) -> Result<Option<EventGroup>, DomainError>;

    /// Find a group by its ID.
    async fn find_event_group(&self, id: &EventGroupId)
        -> Result<Option<EventGroup>, DomainError>;

    /// Events of one group.
    async fn events_in_group(&self, group: &EventGroupId) -> Result<Vec<Event>, DomainError>;

    /// Events during which talks are given, across all groups.
    async fn presentation_events(&self) -> Result<Vec<Event>, DomainError>;

    /// Find an event by its ID.
    async fn find_event(&self, id: &EventId) -> Result<Option<Event>, DomainError>;

    /// Talks given during an event.
    async fn presentations_for_event(
        &self,
        event: &EventId,
    ) -> Result<Vec<Presentation>, DomainError>;

    /// Find a presentation by its ID.
    async fn find_presentation(
        &self,
        id: &PresentationId,
    ) -> Result<Option<Presentation>, DomainError>;

    /// Talks given by a speaker. Empty for non-speakers.
    async fn presentations_by_speaker(
        &self,
        speaker: &ProfileId,
    ) -> Result<Vec<Presentation>, DomainError>;
}
