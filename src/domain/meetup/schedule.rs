//! Event program: groups, events and the talks given during them.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventGroupId, EventId, PresentationId, ProfileId};

/// A named section of the program, such as a track or a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventGroup {
    pub id: EventGroupId,
    pub title: String,
}

/// A time slot in the program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub group_id: EventGroupId,
    pub title: String,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
    /// True when speakers present talks during this slot.
    pub is_presentation: bool,
}

impl Event {
    /// Button caption, e.g. `10:00-10:45 Opening`.
    pub fn caption(&self) -> String {
        format!(
            "{}-{} {}",
            self.time_from.format("%H:%M"),
            self.time_to.format("%H:%M"),
            self.title
        )
    }
}

/// A talk given by a speaker during an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: PresentationId,
    pub event_id: EventId,
    pub speaker_id: ProfileId,
    pub title: String,
    pub description: String,
}
