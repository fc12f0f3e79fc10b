//! Question relay: the speaker's live queue and answer delivery.

use std::sync::Arc;

use crate::domain::dialog::Notification;
use crate::domain::foundation::{ChatId, DomainError, ProfileId, QuestionId};
use crate::domain::meetup::QuestionRecord;
use crate::domain::relay::{peek_or_advance, RelayPosition};
use crate::ports::{ProfileRepository, QuestionRepository};

/// An answered question and the message for its asker.
#[derive(Debug, Clone)]
pub struct RelayedAnswer {
    pub question: QuestionRecord,
    /// `None` when the asker's profile no longer exists.
    pub notification: Option<Notification>,
}

pub struct QuestionRelay {
    questions: Arc<dyn QuestionRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl QuestionRelay {
    pub fn new(questions: Arc<dyn QuestionRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            questions,
            profiles,
        }
    }

    /// Looks up the question at the cursor in the speaker's current queue.
    ///
    /// The queue is fetched fresh on every call.
    pub async fn peek_or_advance(
        &self,
        speaker: &ProfileId,
        cursor: usize,
        advance: bool,
    ) -> Result<RelayPosition<QuestionRecord>, DomainError> {
        let active = self.questions.active_for_speaker(speaker).await?;
        let position = peek_or_advance(&active, cursor, advance);
        tracing::debug!(
            speaker = %speaker,
            queue_len = active.len(),
            cursor = position.cursor,
            advanced = position.advanced,
            "Question queue position"
        );
        Ok(position)
    }

    /// Stores the answer and builds the message relayed to the asker.
    ///
    /// Fails with `QuestionAlreadyAnswered` on a second attempt.
    pub async fn answer(&self, question: &QuestionId, text: &str) -> Result<RelayedAnswer, DomainError> {
        let answered = self.questions.mark_answered(question, text).await?;

        let notification = match self.profiles.find_by_id(&answered.asker_id).await? {
            Some(asker) => Some(Notification {
                chat: ChatId::private(asker.user_id),
                text: format!("Question: {}\nAnswer: {}", answered.text, answered.answer),
            }),
            None => {
                tracing::warn!(
                    question_id = %answered.id,
                    asker_id = %answered.asker_id,
                    "Asker profile is gone, answer not relayed"
                );
                None
            }
        };

        Ok(RelayedAnswer {
            question: answered,
            notification,
        })
    }
}
