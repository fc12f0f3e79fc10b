//! In-memory question repository.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, ProfileId, QuestionId};
use crate::domain::meetup::QuestionRecord;
use crate::ports::QuestionRepository;

/// Questions kept in creation order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<Vec<QuestionRecord>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<QuestionRecord> {
        self.questions.read().await.clone()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: &QuestionRecord) -> Result<(), DomainError> {
        let mut questions = self.questions.write().await;
        if questions.iter().any(|q| q.id == question.id) {
            return Err(DomainError::storage("Question already exists")
                .with_detail("question_id", question.id.to_string()));
        }
        questions.push(question.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &QuestionId) -> Result<Option<QuestionRecord>, DomainError> {
        let questions = self.questions.read().await;
        Ok(questions.iter().find(|q| q.id == *id).cloned())
    }

    async fn active_for_speaker(
        &self,
        speaker: &ProfileId,
    ) -> Result<Vec<QuestionRecord>, DomainError> {
        let questions = self.questions.read().await;
        let mut active: Vec<QuestionRecord> = questions
            .iter()
            .filter(|q| q.is_active && q.speaker_id == *speaker)
            .cloned()
            .collect();
        // Stable: equal timestamps keep insertion order.
        active.sort_by_key(|q| q.created_at);
        Ok(active)
    }

    async fn mark_answered(
        &self,
        id: &QuestionId,
        answer: &str,
    ) -> Result<QuestionRecord, DomainError> {
        let mut questions = self.questions.write().await;
        let question = questions.iter_mut().find(|q| q.id == *id).ok_or_else(|| {
            DomainError::new(ErrorCode::QuestionNotFound, "Question not found")
                .with_detail("question_id", id.to_string())
        })?;
        question.answer(answer)?;
        Ok(question.clone())
    }
}
