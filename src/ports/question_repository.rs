//! Question repository port.
//!
//! Implementations must make `mark_answered` visible to the next
//! `active_for_speaker` call: the relay recomputes the speaker's queue from
//! it on every request.

use crate::domain::foundation::{DomainError, ProfileId, QuestionId};
use crate::domain::meetup::QuestionRecord;
use async_trait::async_trait;

/// Repository port for speaker questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Save a new question.
    async fn create(&self, question: &QuestionRecord) -> Result<(), DomainError>;

    /// Find a question by its ID.
    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<QuestionRecord>, DomainError>;

    /// Unanswered questions addressed to a speaker, oldest first.
    async fn active_for_speaker(
        &self,
        speaker: &ProfileId,
    ) -> Result<Vec<QuestionRecord>, DomainError>;

    /// Stores the answer and deactivates the question in one step.
    ///
    /// # Errors
    ///
    /// - `QuestionNotFound` if the question doesn't exist
    /// - `QuestionAlreadyAnswered` if it was answered before
    async fn mark_answered(
        &self,
        id: &QuestionId,
        answer: &str,
    ) -> Result<QuestionRecord, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn QuestionRepository) {}
    }
}
