//! In-memory event program.

use async_trait::async_trait;
use chrono::NaiveTime;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, EventGroupId, EventId, PresentationId, ProfileId};
use crate::domain::meetup::{Event, EventGroup, Presentation};
use crate::ports::ScheduleReader;

#[derive(Debug, Default)]
struct Program {
    groups: Vec<EventGroup>,
    events: Vec<Event>,
    presentations: Vec<Presentation>,
}

/// Event program held in memory, filled through the `add_*` methods or a
/// [`ScheduleSeed`](super::ScheduleSeed).
#[derive(Debug, Clone, Default)]
pub struct InMemoryScheduleReader {
    program: Arc<RwLock<Program>>,
}

impl InMemoryScheduleReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_group(&self, title: impl Into<String>) -> EventGroup {
        let group = EventGroup {
            id: EventGroupId::new(),
            title: title.into(),
        };
        self.program.write().await.groups.push(group.clone());
        group
    }

    pub async fn add_event(
        &self,
        group: &EventGroupId,
        title: impl Into<String>,
        time_from: NaiveTime,
        time_to: NaiveTime,
        is_presentation: bool,
    ) -> Event {
        let event = Event {
            id: EventId::new(),
            group_id: *group,
            title: title.into(),
            time_from,
            time_to,
            is_presentation,
        };
        self.program.write().await.events.push(event.clone());
        event
    }

    pub async fn add_presentation(
        &self,
        event: &EventId,
        speaker: &ProfileId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Presentation {
        let presentation = Presentation {
            id: PresentationId::new(),
            event_id: *event,
            speaker_id: *speaker,
            title: title.into(),
            description: description.into(),
        };
        self.program
            .write()
            .await
            .presentations
            .push(presentation.clone());
        presentation
    }
}

fn by_start_time(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by_key(|e| (e.time_from, e.time_to));
    events
}

#[async_trait]
impl ScheduleReader for InMemoryScheduleReader {
    async fn list_event_groups(&self) -> Result<Vec<EventGroup>, DomainError> {
        Ok(self.program.read().await.groups.clone())
    }

    async fn find_event_group_by_title(
        &self,
        title: &str,
    ) -> Result<Option<EventGroup>, DomainError> {
        let program = self.program.read().await;
        Ok(program.groups.iter().find(|g| g.title == title).cloned())
    }

    async fn find_event_group(
        &self,
        id: &EventGroupId,
    ) -> Result<Option<EventGroup>, DomainError> {
        let program = self.program.read().await;
        Ok(program.groups.iter().find(|g| g.id == *id).cloned())
    }

    async fn events_in_group(&self, group: &EventGroupId) -> Result<Vec<Event>, DomainError> {
        let program = self.program.read().await;
        Ok(by_start_time(
            program
                .events
                .iter()
                .filter(|e| e.group_id == *group)
                .cloned()
                .collect(),
        ))
    }

    async fn presentation_events(&self) -> Result<Vec<Event>, DomainError> {
        let program = self.program.read().await;
        Ok(by_start_time(
            program
                .events
                .iter()
                .filter(|e| e.is_presentation)
                .cloned()
                .collect(),
        ))
    }

    async fn find_event(&self, id: &EventId) -> Result<Option<Event>, DomainError> {
        let program = self.program.read().await;
        Ok(program.events.iter().find(|e| e.id == *id).cloned())
    }

    async fn presentations_for_event(
        &self,
        event: &EventId,
    ) -> Result<Vec<Presentation>, DomainError> {
        let program = self.program.read().await;
        Ok(program
            .presentations
            .iter()
            .filter(|p| p.event_id == *event)
            .cloned()
            .collect())
    }

    async fn find_presentation(
        &self,
        id: &PresentationId,
    ) -> Result<Option<Presentation>, DomainError> {
        let program = self.program.read().await;
        Ok(program.presentations.iter().find(|p| p.id == *id).cloned())
    }

    async fn presentations_by_speaker(
        &self,
        speaker: &ProfileId,
    ) -> Result<Vec<Presentation>, DomainError> {
        let program = self.program.read().await;
        Ok(program
            .presentations
            .iter()
            .filter(|p| p.speaker_id == *speaker)
            .cloned()
            .collect())
    }
}
