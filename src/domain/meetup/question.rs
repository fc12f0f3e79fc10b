//! Questions asked by listeners to speakers.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, PresentationId, ProfileId, QuestionId, Timestamp, ValidationError,
};

/// A question addressed to the speaker of a presentation.
///
/// A question is active until it is answered. Answering is one-shot: once
/// inactive, the record leaves the speaker's queue and cannot be answered
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub presentation_id: PresentationId,
    /// Speaker of the presentation at the time the question was asked.
    pub speaker_id: ProfileId,
    pub asker_id: ProfileId,
    pub text: String,
    pub answer: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl QuestionRecord {
    /// Creates a new active question.
    pub fn new(
        presentation_id: PresentationId,
        speaker_id: ProfileId,
        asker_id: ProfileId,
        text: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("question"));
        }
        Ok(Self {
            id: QuestionId::new(),
            presentation_id,
            speaker_id,
            asker_id,
            text,
            answer: String::new(),
            is_active: true,
            created_at: Timestamp::now(),
        })
    }

    /// Records the speaker's answer and deactivates the question.
    pub fn answer(&mut self, answer: impl Into<String>) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::new(
                ErrorCode::QuestionAlreadyAnswered,
                "Question has already been answered",
            )
            .with_detail("question_id", self.id.to_string()));
        }
        let answer = answer.into();
        if answer.trim().is_empty() {
            return Err(ValidationError::empty_field("answer").into());
        }
        self.answer = answer;
        self.is_active = false;
        Ok(())
    }
}
