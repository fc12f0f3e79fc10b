//! Program browsing: groups, then events with their talks.

use std::sync::Arc;

use crate::domain::dialog::{DialogError, DialogState, FlowContext, ProgramContext, Session, Step};
use crate::domain::meetup::Event;
use crate::ports::{ProfileRepository, ScheduleReader};

use super::choices_with_back;

pub struct ProgramHandler {
    schedule: Arc<dyn ScheduleReader>,
    profiles: Arc<dyn ProfileRepository>,
    columns: usize,
}

impl ProgramHandler {
    pub fn new(
        schedule: Arc<dyn ScheduleReader>,
        profiles: Arc<dyn ProfileRepository>,
        columns: usize,
    ) -> Self {
        Self {
            schedule,
            profiles,
            columns,
        }
    }

    /// Lists the program sections. Also used by `Back` from the event list.
    pub async fn open(&self, session: &mut Session) -> Result<Step, DialogError> {
        let groups = self.schedule.list_event_groups().await?;
        if groups.is_empty() {
            return Ok(Step::to(DialogState::MainMenu).say("The program has not been published yet."));
        }

        session
            .context
            .begin(FlowContext::Program(ProgramContext::default()));
        let keyboard = choices_with_back(groups.into_iter().map(|g| g.title), self.columns);
        Ok(Step::to(DialogState::EventGroupChoice).ask("Choose a section of the program:", keyboard))
    }

    pub async fn choose_group(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let group = self
            .schedule
            .find_event_group_by_title(text)
            .await?
            .ok_or_else(|| DialogError::invalid_input("Choose a section from the list."))?;
        let events = self.schedule.events_in_group(&group.id).await?;
        if events.is_empty() {
            return Ok(Step::to(DialogState::EventGroupChoice)
                .say(format!("There are no events in \"{}\" yet.", group.title)));
        }

        session.context.program_mut()?.group = Some(group.id);
        let keyboard = choices_with_back(events.iter().map(Event::caption), self.columns);
        Ok(Step::to(DialogState::EventChoice).ask(format!("{}: choose an event", group.title), keyboard))
    }

    /// Describes the chosen event and its talks; the event list stays open.
    pub async fn show_event(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let group = session
            .context
            .program_mut()?
            .group
            .ok_or(DialogError::MissingContext("program"))?;
        let event = self
            .schedule
            .events_in_group(&group)
            .await?
            .into_iter()
            .find(|e| e.caption() == text)
            .ok_or_else(|| DialogError::invalid_input("Choose an event from the list."))?;

        let mut body = format!("*{}*", event.caption());
        for talk in self.schedule.presentations_for_event(&event.id).await? {
            let speaker = self
                .profiles
                .find_by_id(&talk.speaker_id)
                .await?
                .map(|p| p.name)
                .unwrap_or_else(|| "TBA".to_string());
            body.push_str(&format!("\n\n*{}*\nSpeaker: {}", talk.title, speaker));
            if !talk.description.is_empty() {
                body.push('\n');
                body.push_str(&talk.description);
            }
        }

        Ok(Step::to(DialogState::EventChoice).markdown(body, None))
    }
}
