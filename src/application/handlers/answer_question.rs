//! Speakers answering their question queue.

use std::sync::Arc;

use crate::application::question_relay::QuestionRelay;
use crate::domain::dialog::{
    captions, AnswerContext, DialogError, DialogState, FlowContext, Session, Step,
};
use crate::domain::foundation::ErrorCode;
use crate::domain::meetup::QuestionRecord;
use crate::domain::relay::RelayPosition;
use crate::ports::ScheduleReader;

use super::actions;

pub struct AnswerQuestionHandler {
    relay: QuestionRelay,
    schedule: Arc<dyn ScheduleReader>,
}

impl AnswerQuestionHandler {
    pub fn new(relay: QuestionRelay, schedule: Arc<dyn ScheduleReader>) -> Self {
        Self { relay, schedule }
    }

    /// Starts at the front of the queue with the cursor reset.
    pub async fn open(&self, session: &mut Session) -> Result<Step, DialogError> {
        let speaker = session.context.profile()?;
        if self.schedule.presentations_by_speaker(&speaker).await?.is_empty() {
            return Ok(Step::to(DialogState::MainMenu)
                .say("Only speakers can answer questions. Use \"Ask a question\" to ask one."));
        }

        session
            .context
            .begin(FlowContext::Answer(AnswerContext::new(speaker)));
        let position = self.relay.peek_or_advance(&speaker, 0, false).await?;
        self.present(session, position, false)
    }

    /// Moves the cursor to the next question, wrapping to the first one
    /// when the end of the queue is passed.
    pub async fn next(&self, session: &mut Session) -> Result<Step, DialogError> {
        let ctx = session.context.answer_mut()?;
        let (speaker, cursor) = (ctx.speaker, ctx.question_number);
        let position = self.relay.peek_or_advance(&speaker, cursor, true).await?;
        self.present(session, position, true)
    }

    /// Answers the question on screen and relays the answer to its asker.
    pub async fn answer(&self, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        let ctx = session.context.answer_mut()?;
        let question = ctx.current.ok_or(DialogError::MissingContext("answer"))?;
        if text.trim().is_empty() {
            return Err(DialogError::invalid_input("Write your answer:"));
        }

        let keyboard = actions(&[captions::NEXT_QUESTION]);
        let relayed = match self.relay.answer(&question, text).await {
            Ok(relayed) => relayed,
            Err(err) if err.code == ErrorCode::QuestionAlreadyAnswered => {
                session.context.answer_mut()?.current = None;
                return Ok(Step::to(DialogState::NextQuestion)
                    .ask("This question has already been answered.", keyboard));
            }
            Err(err) => return Err(err.into()),
        };

        session.context.answer_mut()?.current = None;
        tracing::info!(question_id = %relayed.question.id, "Question answered");

        let mut step = Step::to(DialogState::NextQuestion).ask("Your answer has been sent.", keyboard);
        if let Some(notification) = relayed.notification {
            step = step.notify(notification);
        }
        Ok(step)
    }

    fn present(
        &self,
        session: &mut Session,
        position: RelayPosition<QuestionRecord>,
        advancing: bool,
    ) -> Result<Step, DialogError> {
        let ctx = session.context.answer_mut()?;
        ctx.question_number = position.cursor;
        ctx.current = position.question.as_ref().map(|q| q.id);

        let Some(question) = position.question else {
            return Ok(Step::to(DialogState::MainMenu).say("You have no unanswered questions."));
        };

        let mut step = Step::to(DialogState::SpeakerAnswerView);
        if advancing && !position.advanced {
            step = step.say("No more new questions, back to the first one.");
        }
        Ok(step.ask(
            format!(
                "Question {}:\n{}\n\nWrite your answer or tap \"{}\".",
                position.cursor + 1,
                question.text,
                captions::NEXT_QUESTION
            ),
            actions(&[captions::NEXT_QUESTION]),
        ))
    }
}
