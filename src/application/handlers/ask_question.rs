//! Asking a speaker: talk time, speaker, question text, confirmation.

use std::sync::Arc;

use crate::domain::dialog::{
    captions, AskContext, DialogError, DialogState, FlowContext, Notification, Session, Step,
};
use crate::domain::foundation::{ChatId, EventId};
use crate::domain::meetup::{Event, Presentation, Profile, QuestionRecord};
use crate::ports::{ProfileRepository, QuestionRepository, ScheduleReader};

use super::{actions, choices_with_back, free_text_keyboard};

const WRITE_QUESTION: &str = "Write your question:";

pub struct AskQuestionHandler {
    schedule: Arc<dyn ScheduleReader>,
    profiles: Arc<dyn ProfileRepository>,
    questions: Arc<dyn QuestionRepository>,
    columns: usize,
}

impl AskQuestionHandler {
    pub fn new(
        schedule: Arc<dyn ScheduleReader>,
        profiles: Arc<dyn ProfileRepository>,
        questions: Arc<dyn QuestionRepository>,
        columns: usize,
    ) -> Self {
        Self {
            schedule,
            profiles,
            questions,
            columns,
        }
    }

    /// Lists the time slots with talks. Also used by `Back` from the
    /// speaker list.
    pub async fn open(&self, session: &mut Session) -> Result<Step, DialogError> {
        let events = self.schedule.presentation_events().await?;
        if events.is_empty() {
            return Ok(Step::to(DialogState::MainMenu).say("There are no talks to ask about yet."));
        }

        session.context.begin(FlowContext::Ask(AskContext::default()));
        let keyboard = choices_with_back(events.iter().map(Event::caption), self.columns);
        Ok(Step::to(DialogState::ChooseEventTime).ask("Choose the time of the talk:", keyboard))
    }

    pub async fn choose_slot(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let event = self
            .schedule
            .presentation_events()
            .await?
            .into_iter()
            .find(|e| e.caption() == text)
            .ok_or_else(|| DialogError::invalid_input("Choose a time from the list."))?;

        let speakers = self.speakers(&event.id).await?;
        if speakers.is_empty() {
            return Ok(Step::to(DialogState::ChooseEventTime)
                .say("No talks are scheduled in this slot. Choose another time."));
        }

        let ctx = session.context.ask_mut()?;
        ctx.event = Some(event.id);
        ctx.presentation = None;
        ctx.draft = None;

        let names = speakers.into_iter().map(|(_, speaker)| speaker.name);
        Ok(Step::to(DialogState::ChooseSpeaker)
            .ask("Choose the speaker:", choices_with_back(names, self.columns)))
    }

    pub async fn choose_speaker(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let event = session
            .context
            .ask_mut()?
            .event
            .ok_or(DialogError::MissingContext("question"))?;
        if self.schedule.find_event(&event).await?.is_none() {
            return Err(DialogError::lookup_miss(format!("event {}", event)));
        }

        let (talk, speaker) = self
            .speakers(&event)
            .await?
            .into_iter()
            .find(|(_, speaker)| speaker.name == text)
            .ok_or_else(|| DialogError::invalid_input("Choose a speaker from the list."))?;

        session.context.ask_mut()?.presentation = Some(talk.id);
        Ok(Step::to(DialogState::Question).ask(
            format!("Question to {} about \"{}\".\n{}", speaker.name, talk.title, WRITE_QUESTION),
            free_text_keyboard(),
        ))
    }

    pub fn draft(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DialogError::invalid_input(WRITE_QUESTION));
        }

        session.context.ask_mut()?.draft = Some(text.to_string());
        Ok(Step::to(DialogState::SaveQuestion).ask(
            format!("Your question:\n{}", text),
            actions(&[captions::SEND, captions::REWRITE]),
        ))
    }

    pub fn rewrite(&self, session: &mut Session) -> Result<Step, DialogError> {
        session.context.ask_mut()?.draft = None;
        Ok(Step::to(DialogState::Question).ask(WRITE_QUESTION, free_text_keyboard()))
    }

    /// Stores the question and lets the speaker know about it.
    pub async fn send(&self, session: &mut Session) -> Result<Step, DialogError> {
        let asker = session.context.profile()?;
        let ctx = session.context.ask_mut()?;
        let (presentation, draft) = match (ctx.presentation, ctx.draft.clone()) {
            (Some(presentation), Some(draft)) => (presentation, draft),
            _ => return Err(DialogError::MissingContext("question")),
        };

        let talk = self
            .schedule
            .find_presentation(&presentation)
            .await?
            .ok_or_else(|| DialogError::lookup_miss(format!("presentation {}", presentation)))?;

        let question = QuestionRecord::new(talk.id, talk.speaker_id, asker, draft)?;
        self.questions.create(&question).await?;
        tracing::info!(
            question_id = %question.id,
            presentation_id = %talk.id,
            "Question submitted"
        );

        let mut step = Step::to(DialogState::MainMenu).say("Your question has been sent to the speaker.");
        if let Some(speaker) = self.profiles.find_by_id(&talk.speaker_id).await? {
            step = step.notify(Notification {
                chat: ChatId::private(speaker.user_id),
                text: format!(
                    "New question about \"{}\". Open \"{}\" to reply.",
                    talk.title,
                    captions::ANSWER_QUESTION
                ),
            });
        }
        Ok(step)
    }

    /// Talks of an event paired with their speakers' profiles.
    async fn speakers(&self, event: &EventId) -> Result<Vec<(Presentation, Profile)>, DialogError> {
        let mut speakers = Vec::new();
        for talk in self.schedule.presentations_for_event(event).await? {
            if let Some(speaker) = self.profiles.find_by_id(&talk.speaker_id).await? {
                speakers.push((talk, speaker));
            }
        }
        Ok(speakers)
    }
}
