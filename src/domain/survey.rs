//! The meeting survey: a short nested form (name, company, job, confirm).
//!
//! The survey runs inside the flat dialog state enum. The state to resume
//! after confirmation is carried explicitly in the survey context, so the
//! sub-dialog never needs to know who started it.

use serde::{Deserialize, Serialize};

use super::dialog::DialogState;
use super::foundation::ValidationError;
use super::meetup::SurveyAnswers;

/// Position within the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurveyStep {
    Name,
    Company,
    Job,
    Confirm,
}

impl SurveyStep {
    /// Dialog state that represents this step.
    pub fn state(&self) -> DialogState {
        match self {
            SurveyStep::Name => DialogState::SurveyName,
            SurveyStep::Company => DialogState::SurveyCompany,
            SurveyStep::Job => DialogState::SurveyJob,
            SurveyStep::Confirm => DialogState::SurveyConfirm,
        }
    }

    pub fn from_state(state: DialogState) -> Option<Self> {
        match state {
            DialogState::SurveyName => Some(SurveyStep::Name),
            DialogState::SurveyCompany => Some(SurveyStep::Company),
            DialogState::SurveyJob => Some(SurveyStep::Job),
            DialogState::SurveyConfirm => Some(SurveyStep::Confirm),
            _ => None,
        }
    }

    pub fn prompt(&self) -> &'static str {
        match self {
            SurveyStep::Name => "What is your name?",
            SurveyStep::Company => "Which company do you work for?",
            SurveyStep::Job => "What is your position?",
            SurveyStep::Confirm => "Is everything correct?",
        }
    }
}

/// Values entered during the current survey attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyContext {
    pub name: Option<String>,
    pub company: Option<String>,
    pub job: Option<String>,
    /// Parent state entered once the survey is confirmed.
    pub resume_to: DialogState,
}

impl SurveyContext {
    pub fn new(resume_to: DialogState) -> Self {
        Self {
            name: None,
            company: None,
            job: None,
            resume_to,
        }
    }

    /// Stores the answer for `step` and returns the step that follows.
    pub fn record(&mut self, step: SurveyStep, text: &str) -> Result<SurveyStep, ValidationError> {
        let value = text.trim();
        let (field, slot, next) = match step {
            SurveyStep::Name => ("name", &mut self.name, SurveyStep::Company),
            SurveyStep::Company => ("company", &mut self.company, SurveyStep::Job),
            SurveyStep::Job => ("job", &mut self.job, SurveyStep::Confirm),
            SurveyStep::Confirm => {
                return Err(ValidationError::invalid_format(
                    "survey",
                    "confirm or retry the survey",
                ))
            }
        };
        if value.is_empty() {
            return Err(ValidationError::empty_field(field));
        }
        *slot = Some(value.to_string());
        Ok(next)
    }

    /// Discards the values of this attempt.
    pub fn restart(&mut self) {
        self.name = None;
        self.company = None;
        self.job = None;
    }

    /// All three answers, if every step was completed.
    pub fn answers(&self) -> Option<SurveyAnswers> {
        Some(SurveyAnswers {
            name: self.name.clone()?,
            company: self.company.clone()?,
            job: self.job.clone()?,
        })
    }

    pub fn summary(&self) -> String {
        format!(
            "Name: {}\nCompany: {}\nPosition: {}",
            self.name.as_deref().unwrap_or("-"),
            self.company.as_deref().unwrap_or("-"),
            self.job.as_deref().unwrap_or("-"),
        )
    }
}
