//! Typed per-session dialog context.
//!
//! Each flow keeps its accumulated values in its own struct. The session
//! holds at most one flow context at a time, selected when the flow starts;
//! a handler asking for the wrong one gets `DialogError::MissingContext`.

use serde::{Deserialize, Serialize};

use super::error::DialogError;
use crate::domain::donation::DonationAmount;
use crate::domain::foundation::{EventGroupId, EventId, PresentationId, ProfileId, QuestionId};
use crate::domain::matchmaking::MatchContext;
use crate::domain::survey::SurveyContext;

/// Program browsing: the group whose events are listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramContext {
    pub group: Option<EventGroupId>,
}

/// Asking a question: the chosen talk and the draft text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskContext {
    pub event: Option<EventId>,
    pub presentation: Option<PresentationId>,
    pub draft: Option<String>,
}

/// Answering questions: the speaker's cursor into their live queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerContext {
    pub speaker: ProfileId,
    /// 0-based index into the speaker's active questions.
    pub question_number: usize,
    /// Question currently shown and awaiting an answer.
    pub current: Option<QuestionId>,
}

impl AnswerContext {
    pub fn new(speaker: ProfileId) -> Self {
        Self {
            speaker,
            question_number: 0,
            current: None,
        }
    }
}

/// Donation: the amount of the invoice awaiting payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonateContext {
    pub amount: Option<DonationAmount>,
}

/// Context of the flow the session is currently in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum FlowContext {
    #[default]
    Idle,
    Program(ProgramContext),
    Ask(AskContext),
    Answer(AnswerContext),
    Donate(DonateContext),
    Meet,
    Survey(SurveyContext),
}

/// Everything a session remembers between messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Profile linked to the sender. Survives returns to the main menu.
    pub profile_id: Option<ProfileId>,
    /// Candidates already shown. Survives returns to the main menu and is
    /// cleared only when every eligible profile has been shown.
    #[serde(default)]
    pub matches: MatchContext,
    pub flow: FlowContext,
}

impl SessionContext {
    pub fn profile(&self) -> Result<ProfileId, DialogError> {
        self.profile_id.ok_or(DialogError::MissingContext("profile"))
    }

    /// Replaces the current flow context.
    pub fn begin(&mut self, flow: FlowContext) {
        self.flow = flow;
    }

    /// Drops the flow context, keeping the profile link and shown candidates.
    pub fn reset_flow(&mut self) {
        self.flow = FlowContext::Idle;
    }

    pub fn program_mut(&mut self) -> Result<&mut ProgramContext, DialogError> {
        match &mut self.flow {
            FlowContext::Program(ctx) => Ok(ctx),
            _ => Err(DialogError::MissingContext("program")),
        }
    }

    pub fn ask_mut(&mut self) -> Result<&mut AskContext, DialogError> {
        match &mut self.flow {
            FlowContext::Ask(ctx) => Ok(ctx),
            _ => Err(DialogError::MissingContext("question")),
        }
    }

    pub fn answer_mut(&mut self) -> Result<&mut AnswerContext, DialogError> {
        match &mut self.flow {
            FlowContext::Answer(ctx) => Ok(ctx),
            _ => Err(DialogError::MissingContext("answer")),
        }
    }

    pub fn donate_mut(&mut self) -> Result<&mut DonateContext, DialogError> {
        match &mut self.flow {
            FlowContext::Donate(ctx) => Ok(ctx),
            _ => Err(DialogError::MissingContext("donation")),
        }
    }

    /// Exclusion set, available while the matchmaking flow is active.
    pub fn meet_mut(&mut self) -> Result<&mut MatchContext, DialogError> {
        match self.flow {
            FlowContext::Meet => Ok(&mut self.matches),
            _ => Err(DialogError::MissingContext("matchmaking")),
        }
    }

    pub fn survey_mut(&mut self) -> Result<&mut SurveyContext, DialogError> {
        match &mut self.flow {
            FlowContext::Survey(ctx) => Ok(ctx),
            _ => Err(DialogError::MissingContext("survey")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialog::DialogState;

    #[test]
    fn reset_keeps_profile_link() {
        let profile = ProfileId::new();
        let mut ctx = SessionContext {
            profile_id: Some(profile),
            flow: FlowContext::Ask(AskContext::default()),
            ..SessionContext::default()
        };

        ctx.reset_flow();

        assert_eq!(ctx.flow, FlowContext::Idle);
        assert_eq!(ctx.profile_id, Some(profile));
        assert!(ctx.profile().is_ok());
    }

    #[test]
    fn wrong_flow_is_missing_context() {
        let mut ctx = SessionContext::default();
        ctx.begin(FlowContext::Program(ProgramContext::default()));

        assert!(ctx.program_mut().is_ok());
        assert!(matches!(ctx.ask_mut(), Err(DialogError::MissingContext("question"))));
        assert!(matches!(ctx.survey_mut(), Err(DialogError::MissingContext("survey"))));
    }

    #[test]
    fn shown_candidates_survive_leaving_the_flow() {
        let seen = ProfileId::new();
        let mut ctx = SessionContext::default();
        ctx.begin(FlowContext::Meet);
        ctx.meet_mut().unwrap().record(seen);

        ctx.reset_flow();
        assert!(matches!(ctx.meet_mut(), Err(DialogError::MissingContext("matchmaking"))));

        ctx.begin(FlowContext::Meet);
        assert!(ctx.meet_mut().unwrap().has_seen(&seen));
    }

    #[test]
    fn missing_profile_is_reported() {
        let ctx = SessionContext::default();
        assert!(matches!(ctx.profile(), Err(DialogError::MissingContext("profile"))));
    }

    #[test]
    fn flow_context_serializes_with_tag() {
        let ctx = FlowContext::Survey(SurveyContext::new(DialogState::MeetChoice));
        let json = serde_json::to_value(&ctx).unwrap();
        assert_eq!(json["flow"], "survey");
        assert_eq!(json["resume_to"], "meet_choice");

        let back: FlowContext = serde_json::from_value(json).unwrap();
        assert_eq!(back, ctx);
    }
}
