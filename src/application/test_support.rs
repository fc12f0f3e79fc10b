//! Shared fixtures for application unit tests.

use std::sync::Arc;

use chrono::NaiveTime;

use super::engine::Collaborators;
use crate::adapters::memory::{
    InMemoryProfileRepository, InMemoryQuestionRepository, InMemoryScheduleReader,
};
use crate::adapters::payment::MockPaymentGateway;
use crate::domain::dialog::{DialogState, Session, SessionKey};
use crate::domain::foundation::UserId;
use crate::domain::meetup::{
    Event, MessengerIdentity, Presentation, Profile, QuestionRecord, SurveyAnswers,
};
use crate::ports::{ProfileRepository, QuestionRepository, ScheduleReader};

/// In-memory collaborators with helpers to populate them.
pub(crate) struct World {
    pub profiles: InMemoryProfileRepository,
    pub schedule: InMemoryScheduleReader,
    pub questions: InMemoryQuestionRepository,
    pub payments: MockPaymentGateway,
}

impl World {
    pub const GROUP: &'static str = "Main stage";

    pub fn new() -> Self {
        Self {
            profiles: InMemoryProfileRepository::new(),
            schedule: InMemoryScheduleReader::new(),
            questions: InMemoryQuestionRepository::new(),
            payments: MockPaymentGateway::new(),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            profiles: Arc::new(self.profiles.clone()),
            schedule: Arc::new(self.schedule.clone()),
            questions: Arc::new(self.questions.clone()),
            payments: Arc::new(self.payments.clone()),
        }
    }

    pub async fn participant(&self, user_id: i64, name: &str) -> Profile {
        let identity = MessengerIdentity::new(UserId::new(user_id), name, Some(name.to_lowercase()));
        self.profiles.get_or_create(&identity).await.unwrap()
    }

    /// A participant who already completed the meeting survey.
    pub async fn ready_participant(&self, user_id: i64, name: &str) -> Profile {
        let mut profile = self.participant(user_id, name).await;
        profile
            .complete_survey(SurveyAnswers {
                name: name.to_string(),
                company: "Acme".to_string(),
                job: "Engineer".to_string(),
            })
            .unwrap();
        self.profiles.update(&profile).await.unwrap();
        profile
    }

    /// Adds a talk by `speaker` to the main stage, creating the group once.
    pub async fn talk(
        &self,
        speaker: &Profile,
        from: &str,
        to: &str,
        title: &str,
    ) -> (Event, Presentation) {
        let group = match self.schedule.find_event_group_by_title(Self::GROUP).await.unwrap() {
            Some(group) => group,
            None => self.schedule.add_group(Self::GROUP).await,
        };
        let parse = |t: &str| NaiveTime::parse_from_str(t, "%H:%M").unwrap();
        let event = self
            .schedule
            .add_event(&group.id, title, parse(from), parse(to), true)
            .await;
        let presentation = self
            .schedule
            .add_presentation(&event.id, &speaker.id, title, "")
            .await;
        (event, presentation)
    }

    pub async fn question(&self, talk: &Presentation, asker: &Profile, text: &str) -> QuestionRecord {
        let question = QuestionRecord::new(talk.id, talk.speaker_id, asker.id, text).unwrap();
        self.questions.create(&question).await.unwrap();
        question
    }

    /// A session already linked to `profile` and sitting in `state`.
    pub fn session_for(&self, profile: &Profile, state: DialogState) -> Session {
        let mut session = Session::new(SessionKey::private(profile.user_id));
        session.state = Some(state);
        session.context.profile_id = Some(profile.id);
        session
    }
}
