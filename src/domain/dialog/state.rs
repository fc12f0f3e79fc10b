//! Dialog state machine.
//!
//! Every session sits in exactly one of these states. The machine is cyclic:
//! each path leads back to `MainMenu` or to its parent state, and every state
//! can be left for `MainMenu` through the reserved caption.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// A named point in the dialog that determines which triggers are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    MainMenu,

    // Program browsing
    EventGroupChoice,
    EventChoice,

    // Asking a speaker
    ChooseEventTime,
    ChooseSpeaker,
    Question,
    SaveQuestion,

    // Speaker answering the queue
    SpeakerAnswerView,
    NextQuestion,

    // Donation
    InputDonateAmount,
    CheckPayment,

    // Matchmaking
    MeetChoice,

    // Survey sub-dialog
    SurveyName,
    SurveyCompany,
    SurveyJob,
    SurveyConfirm,
}

impl DialogState {
    /// All states, in declaration order.
    pub const ALL: [DialogState; 16] = [
        DialogState::MainMenu,
        DialogState::EventGroupChoice,
        DialogState::EventChoice,
        DialogState::ChooseEventTime,
        DialogState::ChooseSpeaker,
        DialogState::Question,
        DialogState::SaveQuestion,
        DialogState::SpeakerAnswerView,
        DialogState::NextQuestion,
        DialogState::InputDonateAmount,
        DialogState::CheckPayment,
        DialogState::MeetChoice,
        DialogState::SurveyName,
        DialogState::SurveyCompany,
        DialogState::SurveyJob,
        DialogState::SurveyConfirm,
    ];

    /// Returns true for the states of the nested survey.
    pub fn is_survey(&self) -> bool {
        matches!(
            self,
            Self::SurveyName | Self::SurveyCompany | Self::SurveyJob | Self::SurveyConfirm
        )
    }

    /// States reachable from this one besides itself and `MainMenu`.
    fn forward_targets(&self) -> &'static [DialogState] {
        use DialogState::*;
        match self {
            MainMenu => &[
                EventGroupChoice,
                ChooseEventTime,
                SpeakerAnswerView,
                InputDonateAmount,
                MeetChoice,
                SurveyName,
            ],
            EventGroupChoice => &[EventChoice],
            EventChoice => &[EventGroupChoice],
            ChooseEventTime => &[ChooseSpeaker],
            ChooseSpeaker => &[ChooseEventTime, Question],
            Question => &[SaveQuestion],
            SaveQuestion => &[Question],
            SpeakerAnswerView => &[NextQuestion],
            NextQuestion => &[SpeakerAnswerView],
            InputDonateAmount => &[CheckPayment],
            CheckPayment => &[InputDonateAmount],
            MeetChoice => &[SurveyName],
            SurveyName => &[SurveyCompany],
            SurveyCompany => &[SurveyJob],
            SurveyJob => &[SurveyConfirm],
            SurveyConfirm => &[SurveyName, MeetChoice],
        }
    }
}

impl StateMachine for DialogState {
    fn can_transition_to(&self, target: &Self) -> bool {
        *target == DialogState::MainMenu
            || target == self
            || self.forward_targets().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        let mut targets = vec![DialogState::MainMenu];
        if *self != DialogState::MainMenu {
            targets.push(*self);
        }
        for target in self.forward_targets() {
            if !targets.contains(target) {
                targets.push(*target);
            }
        }
        targets
    }
}
