//! YAML seed for the in-memory event program.
//!
//! ```yaml
//! groups:
//!   - title: Main stage
//!     events:
//!       - title: Opening
//!         from: "10:00"
//!         to: "10:30"
//!         presentations:
//!           - title: Async Rust in production
//!             description: Lessons learned
//!             speaker: { user_id: 42, name: Alice, username: alice }
//! ```
//!
//! An event is a presentation slot when it lists presentations, unless
//! `is_presentation` says otherwise.

use chrono::NaiveTime;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::schedule_reader::InMemoryScheduleReader;
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::meetup::MessengerIdentity;
use crate::ports::ProfileRepository;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid time '{value}' in event '{event}', expected HH:MM")]
    InvalidTime { event: String, value: String },

    #[error("Failed to store seeded profile: {0}")]
    Storage(#[from] DomainError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSeed {
    #[serde(default)]
    pub groups: Vec<GroupSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroupSeed {
    pub title: String,
    #[serde(default)]
    pub events: Vec<EventSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventSeed {
    pub title: String,
    pub from: String,
    pub to: String,
    pub is_presentation: Option<bool>,
    #[serde(default)]
    pub presentations: Vec<PresentationSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresentationSeed {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub speaker: SpeakerSeed,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeakerSeed {
    pub user_id: i64,
    pub name: String,
    pub username: Option<String>,
}

fn parse_time(event: &str, value: &str) -> Result<NaiveTime, SeedError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| SeedError::InvalidTime {
        event: event.to_string(),
        value: value.to_string(),
    })
}

impl ScheduleSeed {
    pub fn from_yaml(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Loads the program into `schedule`, creating speaker profiles that do
    /// not exist yet. Returns the number of presentations installed.
    pub async fn install(
        &self,
        schedule: &InMemoryScheduleReader,
        profiles: &dyn ProfileRepository,
    ) -> Result<usize, SeedError> {
        let mut installed = 0;
        for group_seed in &self.groups {
            let group = schedule.add_group(&group_seed.title).await;
            for event_seed in &group_seed.events {
                let time_from = parse_time(&event_seed.title, &event_seed.from)?;
                let time_to = parse_time(&event_seed.title, &event_seed.to)?;
                let is_presentation = event_seed
                    .is_presentation
                    .unwrap_or(!event_seed.presentations.is_empty());
                let event = schedule
                    .add_event(
                        &group.id,
                        &event_seed.title,
                        time_from,
                        time_to,
                        is_presentation,
                    )
                    .await;

                for talk in &event_seed.presentations {
                    let identity = MessengerIdentity::new(
                        UserId::new(talk.speaker.user_id),
                        &talk.speaker.name,
                        talk.speaker.username.clone(),
                    );
                    let speaker = profiles.get_or_create(&identity).await?;
                    schedule
                        .add_presentation(&event.id, &speaker.id, &talk.title, &talk.description)
                        .await;
                    installed += 1;
                }
            }
        }
        Ok(installed)
    }
}
