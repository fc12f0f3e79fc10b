//! The meeting survey: name, company, job, then confirm or retry.
//!
//! Confirmation saves the answers, lets a waiting lonely participant know
//! that someone new is available, and resumes the state the survey was
//! started from.

use std::sync::Arc;

use crate::application::session_store::LonelyUserSlot;
use crate::domain::dialog::{
    captions, DialogError, DialogState, FlowContext, Notification, Session, Step,
};
use crate::domain::foundation::{ChatId, ProfileId};
use crate::domain::survey::SurveyStep;
use crate::ports::ProfileRepository;

use super::{actions, free_text_keyboard};

pub struct SurveyHandler {
    profiles: Arc<dyn ProfileRepository>,
    lonely: Arc<LonelyUserSlot>,
}

impl SurveyHandler {
    pub fn new(profiles: Arc<dyn ProfileRepository>, lonely: Arc<LonelyUserSlot>) -> Self {
        Self { profiles, lonely }
    }

    /// Records the answer for the current step and asks the next question.
    pub fn input(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let step = session
            .state
            .and_then(SurveyStep::from_state)
            .ok_or(DialogError::MissingContext("survey"))?;
        let ctx = session.context.survey_mut()?;
        let next = ctx
            .record(step, text)
            .map_err(|_| DialogError::invalid_input(step.prompt()))?;

        if next == SurveyStep::Confirm {
            return Ok(Step::to(DialogState::SurveyConfirm).ask(
                format!("{}\n\n{}", ctx.summary(), next.prompt()),
                actions(&[captions::CONFIRM, captions::RETRY]),
            ));
        }
        Ok(Step::to(next.state()).ask(next.prompt(), free_text_keyboard()))
    }

    /// Discards this attempt's answers and starts over.
    pub fn retry(&self, session: &mut Session) -> Result<Step, DialogError> {
        session.context.survey_mut()?.restart();
        Ok(Step::to(DialogState::SurveyName).ask(SurveyStep::Name.prompt(), free_text_keyboard()))
    }

    pub async fn confirm(&self, session: &mut Session) -> Result<Step, DialogError> {
        let id = session.context.profile()?;
        let ctx = session.context.survey_mut()?;
        let resume_to = ctx.resume_to;
        let answers = ctx.answers().ok_or(DialogError::MissingContext("survey"))?;

        let mut profile = self
            .profiles
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DialogError::lookup_miss(format!("profile {}", id)))?;
        profile.complete_survey(answers)?;
        self.profiles.update(&profile).await?;
        tracing::info!(profile_id = %profile.id, "Meeting survey completed");

        let step = Step::to(resume_to).say("Thanks! Your profile has been saved.");
        let mut step = self.notify_lonely(profile.id, step).await?;

        if resume_to == DialogState::MeetChoice {
            session.context.begin(FlowContext::Meet);
            step = step.ask(
                format!("Tap \"{}\" to meet someone.", captions::NEXT_PERSON),
                actions(&[captions::NEXT_PERSON]),
            );
        } else {
            session.context.reset_flow();
        }
        Ok(step)
    }

    /// Adds the one-time notification for the waiting participant, unless
    /// that is `completer`. The slot is cleared only after the waiting
    /// profile has been read, and the step records the claim.
    async fn notify_lonely(&self, completer: ProfileId, step: Step) -> Result<Step, DialogError> {
        let Some(waiting) = self.lonely.waiting().filter(|w| *w != completer) else {
            return Ok(step);
        };

        let profile = self.profiles.find_by_id(&waiting).await?;
        if !self.lonely.take_if(waiting) {
            return Ok(step);
        }

        match profile {
            Some(profile) => {
                tracing::info!(profile_id = %waiting, "Notifying waiting participant");
                Ok(step.claim_lonely(waiting).notify(Notification {
                    chat: ChatId::private(profile.user_id),
                    text: format!(
                        "Someone new is ready to meet! Tap \"{}\" to see who.",
                        captions::MEET
                    ),
                }))
            }
            None => {
                tracing::warn!(profile_id = %waiting, "Waiting participant no longer exists");
                Ok(step)
            }
        }
    }
}
