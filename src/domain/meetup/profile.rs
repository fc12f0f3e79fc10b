//! Attendee and speaker profiles.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProfileId, UserId, ValidationError};

/// Identity of the sender as reported by the messenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessengerIdentity {
    pub user_id: UserId,
    pub first_name: String,
    pub username: Option<String>,
}

impl MessengerIdentity {
    pub fn new(user_id: UserId, first_name: impl Into<String>, username: Option<String>) -> Self {
        Self {
            user_id,
            first_name: first_name.into(),
            username,
        }
    }
}

/// Answers collected by the meeting survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyAnswers {
    pub name: String,
    pub company: String,
    pub job: String,
}

/// A meetup participant.
///
/// A profile is a speaker when at least one presentation references it; the
/// flag is derived from the schedule rather than stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub name: String,
    pub username: Option<String>,
    pub company: Option<String>,
    pub job: Option<String>,
    /// Set once the meeting survey has been completed.
    pub ready_to_meet: bool,
}

impl Profile {
    /// Creates a profile for a first-time sender.
    pub fn from_identity(identity: &MessengerIdentity) -> Self {
        Self {
            id: ProfileId::new(),
            user_id: identity.user_id,
            name: identity.first_name.clone(),
            username: identity.username.clone(),
            company: None,
            job: None,
            ready_to_meet: false,
        }
    }

    /// Stores the survey answers and marks the profile as open to meetings.
    pub fn complete_survey(&mut self, answers: SurveyAnswers) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &answers.name),
            ("company", &answers.company),
            ("job", &answers.job),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::empty_field(field));
            }
        }
        self.name = answers.name;
        self.company = Some(answers.company);
        self.job = Some(answers.job);
        self.ready_to_meet = true;
        Ok(())
    }

    /// Card shown to someone browsing meeting candidates.
    pub fn card(&self) -> String {
        let mut lines = vec![self.name.clone()];
        if let Some(company) = self.company.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!("Company: {}", company));
        }
        if let Some(job) = self.job.as_deref().filter(|j| !j.is_empty()) {
            lines.push(format!("Position: {}", job));
        }
        if let Some(username) = self.username.as_deref().filter(|u| !u.is_empty()) {
            lines.push(format!("Contact: @{}", username));
        }
        lines.join("\n")
    }
}
