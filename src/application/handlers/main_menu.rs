//! Main menu, greeting and help.

use std::sync::Arc;

use crate::domain::dialog::{captions, DialogError, DialogState, Keyboard, Step};
use crate::domain::foundation::ProfileId;
use crate::domain::meetup::Profile;
use crate::ports::ScheduleReader;

/// Text sent with the main menu keyboard.
pub const MENU_PROMPT: &str = "Choose what you are interested in:";

const HELP_TEXT: &str = "Program - browse the event program\n\
Ask a question - send a question to a speaker\n\
Answer a question - answer questions about your talk (speakers only)\n\
Donate - support the meetup\n\
Meet someone - get introduced to other participants\n\
\n\
Main menu - return here from anywhere";

pub struct MainMenuHandler {
    schedule: Arc<dyn ScheduleReader>,
    columns: usize,
}

impl MainMenuHandler {
    pub fn new(schedule: Arc<dyn ScheduleReader>, columns: usize) -> Self {
        Self { schedule, columns }
    }

    /// A profile is a speaker when any presentation references it.
    pub async fn is_speaker(&self, profile: &ProfileId) -> Result<bool, DialogError> {
        Ok(!self
            .schedule
            .presentations_by_speaker(profile)
            .await?
            .is_empty())
    }

    /// Main menu keyboard; "Answer a question" is offered to speakers only.
    pub async fn keyboard(&self, profile: &ProfileId) -> Result<Keyboard, DialogError> {
        let mut items = vec![captions::PROGRAM, captions::ASK_QUESTION];
        if self.is_speaker(profile).await? {
            items.push(captions::ANSWER_QUESTION);
        }
        items.extend([captions::DONATE, captions::MEET]);
        Ok(Keyboard::from_captions(items, self.columns))
    }

    /// First message of a new session. The engine attaches the keyboard.
    pub fn greet(&self, profile: &Profile) -> Step {
        Step::to(DialogState::MainMenu)
            .say(format!("Hello, {}!", profile.name))
            .say(MENU_PROMPT)
    }

    pub fn show(&self) -> Step {
        Step::to(DialogState::MainMenu).say(MENU_PROMPT)
    }

    /// Help keeps the current state and re-sends the current keyboard.
    pub fn help(&self, state: DialogState, keyboard: Option<Keyboard>) -> Step {
        Step::to(state).prompt(HELP_TEXT, keyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryScheduleReader;
    use chrono::NaiveTime;

    async fn handler_with_speaker() -> (MainMenuHandler, ProfileId) {
        let schedule = InMemoryScheduleReader::new();
        let group = schedule.add_group("Day").await;
        let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let event = schedule
            .add_event(&group.id, "Talks", time, time, true)
            .await;
        let speaker = ProfileId::new();
        schedule
            .add_presentation(&event.id, &speaker, "Talk", "")
            .await;
        (MainMenuHandler::new(Arc::new(schedule), 2), speaker)
    }

    #[tokio::test]
    async fn speakers_get_the_answer_button() {
        let (handler, speaker) = handler_with_speaker().await;

        let keyboard = handler.keyboard(&speaker).await.unwrap();

        assert!(keyboard.contains(captions::ANSWER_QUESTION));
        assert_eq!(keyboard.rows.len(), 3);
    }

    #[tokio::test]
    async fn listeners_do_not_get_the_answer_button() {
        let (handler, _) = handler_with_speaker().await;

        let keyboard = handler.keyboard(&ProfileId::new()).await.unwrap();

        assert!(!keyboard.contains(captions::ANSWER_QUESTION));
        assert_eq!(
            keyboard.rows,
            vec![
                vec![captions::PROGRAM.to_string(), captions::ASK_QUESTION.to_string()],
                vec![captions::DONATE.to_string(), captions::MEET.to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn help_keeps_state_and_keyboard() {
        let (handler, _) = handler_with_speaker().await;
        let keyboard = Keyboard::single(captions::NEXT_PERSON);

        let step = handler.help(DialogState::MeetChoice, Some(keyboard.clone()));

        assert_eq!(step.next, DialogState::MeetChoice);
        assert_eq!(step.last_keyboard(), Some(&keyboard));
    }
}
