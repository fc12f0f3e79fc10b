//! "Meet someone": candidate cards, or the survey for first-timers.

use std::sync::Arc;

use crate::application::matchmaker::{MatchPick, Matchmaker};
use crate::application::session_store::LonelyUserSlot;
use crate::domain::dialog::{captions, DialogError, DialogState, FlowContext, Session, Step};
use crate::domain::survey::{SurveyContext, SurveyStep};
use crate::ports::ProfileRepository;

use super::{actions, free_text_keyboard};

pub struct MeetHandler {
    profiles: Arc<dyn ProfileRepository>,
    matchmaker: Matchmaker,
    lonely: Arc<LonelyUserSlot>,
}

impl MeetHandler {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        matchmaker: Matchmaker,
        lonely: Arc<LonelyUserSlot>,
    ) -> Self {
        Self {
            profiles,
            matchmaker,
            lonely,
        }
    }

    /// Shows a first candidate, or starts the survey if the requester has
    /// not filled it in yet.
    pub async fn open(&self, session: &mut Session) -> Result<Step, DialogError> {
        let id = session.context.profile()?;
        let profile = self
            .profiles
            .find_by_id(&id)
            .await?
            .ok_or_else(|| DialogError::lookup_miss(format!("profile {}", id)))?;

        if !profile.ready_to_meet {
            session
                .context
                .begin(FlowContext::Survey(SurveyContext::new(DialogState::MeetChoice)));
            return Ok(Step::to(DialogState::SurveyName)
                .say("Before we introduce you to others, tell us a little about yourself.")
                .ask(SurveyStep::Name.prompt(), free_text_keyboard()));
        }

        session.context.begin(FlowContext::Meet);
        self.next_person(session).await
    }

    pub async fn next_person(&self, session: &mut Session) -> Result<Step, DialogError> {
        let requester = session.context.profile()?;
        let ctx = session.context.meet_mut()?;

        match self.matchmaker.pick(requester, ctx).await? {
            MatchPick::Candidate {
                profile,
                round_restarted,
            } => {
                let mut step = Step::to(DialogState::MeetChoice);
                if round_restarted {
                    step = step.say("You have seen everyone, starting over.");
                }
                Ok(step.ask(profile.card(), actions(&[captions::NEXT_PERSON])))
            }
            MatchPick::Lonely => {
                if self.lonely.register_if_empty(requester) {
                    tracing::info!(profile_id = %requester, "Waiting for meeting candidates");
                }
                Ok(Step::to(DialogState::MainMenu).say(
                    "Nobody else is ready to meet yet. We will let you know when someone joins.",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::World;

    fn handler(world: &World, lonely: Arc<LonelyUserSlot>) -> MeetHandler {
        let profiles: Arc<dyn ProfileRepository> = Arc::new(world.profiles.clone());
        MeetHandler::new(
            Arc::clone(&profiles),
            Matchmaker::with_seed(profiles, 1),
            lonely,
        )
    }

    #[tokio::test]
    async fn first_timer_is_sent_to_the_survey() {
        let world = World::new();
        let ann = world.participant(1, "Ann").await;
        let mut session = world.session_for(&ann, DialogState::MainMenu);

        let step = handler(&world, Arc::default()).open(&mut session).await.unwrap();

        assert_eq!(step.next, DialogState::SurveyName);
        let survey = session.context.survey_mut().unwrap();
        assert_eq!(survey.resume_to, DialogState::MeetChoice);
    }

    #[tokio::test]
    async fn ready_requester_sees_a_candidate_card() {
        let world = World::new();
        let ann = world.ready_participant(1, "Ann").await;
        world.ready_participant(2, "Bob").await;
        let mut session = world.session_for(&ann, DialogState::MainMenu);

        let step = handler(&world, Arc::default()).open(&mut session).await.unwrap();

        assert_eq!(step.next, DialogState::MeetChoice);
        assert!(step.replies[0].text.starts_with("Bob"));
        assert!(step.last_keyboard().unwrap().contains(captions::NEXT_PERSON));
    }

    #[tokio::test]
    async fn lonely_requester_is_registered_once() {
        let world = World::new();
        let ann = world.ready_participant(1, "Ann").await;
        let lonely = Arc::new(LonelyUserSlot::new());
        let handler = handler(&world, Arc::clone(&lonely));
        let mut session = world.session_for(&ann, DialogState::MainMenu);

        let step = handler.open(&mut session).await.unwrap();

        assert_eq!(step.next, DialogState::MainMenu);
        assert_eq!(lonely.waiting(), Some(ann.id));
    }
}
