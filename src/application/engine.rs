//! Dialog engine: resolves a trigger against the session's state, runs the
//! matching handler and commits the state it returns.
//!
//! Reserved captions are checked before the route table:
//! - `Main menu` and `/start` leave any flow for the main menu
//! - `/help` answers without changing state
//!
//! Input that matches no route gets the same fallback everywhere: the
//! options prompt is re-sent with the keyboard the user last saw.

use std::sync::Arc;

use crate::application::matchmaker::Matchmaker;
use crate::application::question_relay::QuestionRelay;
use crate::application::session_store::LonelyUserSlot;
use crate::domain::dialog::{
    captions, is_main_menu_request, DialogError, DialogState, Session, Step, Trigger,
    EVENT_CAPTION,
};
use crate::domain::donation::PaymentOutcome;
use crate::domain::foundation::StateMachine;
use crate::domain::meetup::{MessengerIdentity, Profile};
use crate::ports::{PaymentGateway, ProfileRepository, QuestionRepository, ScheduleReader};

use super::handlers::{
    AnswerQuestionHandler, AskQuestionHandler, DonateHandler, InvoiceTemplate, MainMenuHandler,
    MeetHandler, ProgramHandler, SurveyHandler, MENU_PROMPT,
};

/// Sent with the last keyboard when input matches no option.
pub const FALLBACK_PROMPT: &str = "Please choose one of the options below.";

const RESET_NOTICE: &str = "That is no longer available. Returning to the main menu.";

/// Ports the handlers work with.
#[derive(Clone)]
pub struct Collaborators {
    pub profiles: Arc<dyn ProfileRepository>,
    pub schedule: Arc<dyn ScheduleReader>,
    pub questions: Arc<dyn QuestionRepository>,
    pub payments: Arc<dyn PaymentGateway>,
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Buttons per keyboard row.
    pub keyboard_columns: usize,
    pub invoice: InvoiceTemplate,
    /// Fixed seed for candidate draws; entropy when `None`.
    pub match_seed: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            keyboard_columns: 2,
            invoice: InvoiceTemplate::default(),
            match_seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    OpenProgram,
    OpenAsk,
    OpenAnswer,
    OpenDonate,
    OpenMeet,
    BackToMainMenu,
    ChooseGroup,
    BackToGroups,
    ShowEvent,
    ChooseSlot,
    BackToSlots,
    ChooseSpeaker,
    DraftQuestion,
    SendQuestion,
    RewriteQuestion,
    NextQuestion,
    AnswerQuestion,
    EnterAmount,
    NextPerson,
    SurveyInput,
    ConfirmSurvey,
    RetrySurvey,
}

#[derive(Debug, Clone, Copy)]
struct Route {
    trigger: Trigger,
    action: Action,
}

fn route(trigger: Trigger, action: Action) -> Route {
    Route { trigger, action }
}

/// Routes of a state, in the order they are tried.
fn routes(state: DialogState) -> Vec<Route> {
    use Action::*;
    use DialogState as S;
    use Trigger::{AnyText, Exact, Pattern};

    match state {
        S::MainMenu => vec![
            route(Exact(captions::PROGRAM), OpenProgram),
            route(Exact(captions::ASK_QUESTION), OpenAsk),
            route(Exact(captions::ANSWER_QUESTION), OpenAnswer),
            route(Exact(captions::DONATE), OpenDonate),
            route(Exact(captions::MEET), OpenMeet),
        ],
        S::EventGroupChoice => vec![
            route(Exact(captions::BACK), BackToMainMenu),
            route(AnyText, ChooseGroup),
        ],
        S::EventChoice => vec![
            route(Exact(captions::BACK), BackToGroups),
            route(Pattern(&EVENT_CAPTION), ShowEvent),
        ],
        S::ChooseEventTime => vec![
            route(Exact(captions::BACK), BackToMainMenu),
            route(Pattern(&EVENT_CAPTION), ChooseSlot),
        ],
        S::ChooseSpeaker => vec![
            route(Exact(captions::BACK), BackToSlots),
            route(AnyText, ChooseSpeaker),
        ],
        S::Question => vec![route(AnyText, DraftQuestion)],
        S::SaveQuestion => vec![
            route(Exact(captions::SEND), SendQuestion),
            route(Exact(captions::REWRITE), RewriteQuestion),
        ],
        S::SpeakerAnswerView => vec![
            route(Exact(captions::NEXT_QUESTION), NextQuestion),
            route(AnyText, AnswerQuestion),
        ],
        S::NextQuestion => vec![route(Exact(captions::NEXT_QUESTION), NextQuestion)],
        S::InputDonateAmount => vec![route(AnyText, EnterAmount)],
        // Waiting for the payment signal; text falls through to the fallback.
        S::CheckPayment => Vec::new(),
        S::MeetChoice => vec![route(Exact(captions::NEXT_PERSON), NextPerson)],
        S::SurveyName | S::SurveyCompany | S::SurveyJob => vec![route(AnyText, SurveyInput)],
        S::SurveyConfirm => vec![
            route(Exact(captions::CONFIRM), ConfirmSurvey),
            route(Exact(captions::RETRY), RetrySurvey),
        ],
    }
}

/// First route of `state` whose trigger matches `text`.
fn resolve(state: DialogState, text: &str) -> Option<Action> {
    routes(state)
        .into_iter()
        .find(|r| r.trigger.matches(text))
        .map(|r| r.action)
}

pub struct DialogEngine {
    profiles: Arc<dyn ProfileRepository>,
    main_menu: MainMenuHandler,
    program: ProgramHandler,
    ask: AskQuestionHandler,
    answer: AnswerQuestionHandler,
    donate: DonateHandler,
    meet: MeetHandler,
    survey: SurveyHandler,
    lonely: Arc<LonelyUserSlot>,
}

impl DialogEngine {
    pub fn new(
        collaborators: Collaborators,
        settings: EngineSettings,
        lonely: Arc<LonelyUserSlot>,
    ) -> Self {
        let Collaborators {
            profiles,
            schedule,
            questions,
            payments,
        } = collaborators;
        let columns = settings.keyboard_columns.max(1);
        let matchmaker = match settings.match_seed {
            Some(seed) => Matchmaker::with_seed(Arc::clone(&profiles), seed),
            None => Matchmaker::new(Arc::clone(&profiles)),
        };

        Self {
            main_menu: MainMenuHandler::new(Arc::clone(&schedule), columns),
            program: ProgramHandler::new(Arc::clone(&schedule), Arc::clone(&profiles), columns),
            ask: AskQuestionHandler::new(
                Arc::clone(&schedule),
                Arc::clone(&profiles),
                Arc::clone(&questions),
                columns,
            ),
            answer: AnswerQuestionHandler::new(
                QuestionRelay::new(questions, Arc::clone(&profiles)),
                schedule,
            ),
            donate: DonateHandler::new(payments, settings.invoice),
            meet: MeetHandler::new(Arc::clone(&profiles), matchmaker, Arc::clone(&lonely)),
            survey: SurveyHandler::new(Arc::clone(&profiles), Arc::clone(&lonely)),
            profiles,
            lonely,
        }
    }

    /// Handles one inbound text for the session and commits the next state.
    ///
    /// Only `DialogError::Collaborator` is returned; every other error is
    /// turned into a step here. On error the session must not be saved.
    pub async fn handle_text(
        &self,
        session: &mut Session,
        sender: &MessengerIdentity,
        text: &str,
    ) -> Result<Step, DialogError> {
        let profile = self.ensure_profile(session, sender).await?;

        let Some(current) = session.state else {
            tracing::info!(profile_id = %profile.id, "New session");
            let step = self.main_menu.greet(&profile);
            return self.commit(session, DialogState::MainMenu, step).await;
        };

        if is_main_menu_request(text) {
            session.context.reset_flow();
            return self.commit(session, current, self.main_menu.show()).await;
        }
        if text == captions::HELP_COMMAND {
            let step = self.main_menu.help(current, session.last_keyboard.clone());
            return self.commit(session, current, step).await;
        }

        let step = match resolve(current, text) {
            Some(action) => match self.run(action, session, text).await {
                Ok(step) => step,
                Err(err) => self.recover(session, current, err)?,
            },
            None => {
                tracing::debug!(state = ?current, "No route matched, re-prompting");
                Step::to(current).prompt(FALLBACK_PROMPT, session.last_keyboard.clone())
            }
        };
        self.commit(session, current, step).await
    }

    /// Applies the provider's payment signal to a session waiting in
    /// `CheckPayment`. Signals for sessions in any other state are ignored.
    pub async fn handle_payment(
        &self,
        session: &mut Session,
        outcome: PaymentOutcome,
    ) -> Result<Option<Step>, DialogError> {
        if session.state != Some(DialogState::CheckPayment) {
            tracing::warn!(
                state = ?session.state,
                outcome = ?outcome,
                "Payment signal outside checkout, ignored"
            );
            return Ok(None);
        }

        tracing::info!(outcome = ?outcome, "Payment completed");
        let step = self.donate.on_outcome(outcome);
        self.commit(session, DialogState::CheckPayment, step)
            .await
            .map(Some)
    }

    async fn run(&self, action: Action, session: &mut Session, text: &str) -> Result<Step, DialogError> {
        match action {
            Action::OpenProgram | Action::BackToGroups => self.program.open(session).await,
            Action::OpenAsk | Action::BackToSlots => self.ask.open(session).await,
            Action::OpenAnswer => self.answer.open(session).await,
            Action::OpenDonate => Ok(self.donate.open(session)),
            Action::OpenMeet => self.meet.open(session).await,
            Action::BackToMainMenu => Ok(Step::to(DialogState::MainMenu)),
            Action::ChooseGroup => self.program.choose_group(session, text).await,
            Action::ShowEvent => self.program.show_event(session, text).await,
            Action::ChooseSlot => self.ask.choose_slot(session, text).await,
            Action::ChooseSpeaker => self.ask.choose_speaker(session, text).await,
            Action::DraftQuestion => self.ask.draft(session, text),
            Action::SendQuestion => self.ask.send(session).await,
            Action::RewriteQuestion => self.ask.rewrite(session),
            Action::NextQuestion => self.answer.next(session).await,
            Action::AnswerQuestion => self.answer.answer(session, text).await,
            Action::EnterAmount => self.donate.enter_amount(session, text).await,
            Action::NextPerson => self.meet.next_person(session).await,
            Action::SurveyInput => self.survey.input(session, text),
            Action::ConfirmSurvey => self.survey.confirm(session).await,
            Action::RetrySurvey => self.survey.retry(session),
        }
    }

    /// Turns recoverable errors into a step; collaborator failures escape.
    fn recover(
        &self,
        session: &mut Session,
        current: DialogState,
        err: DialogError,
    ) -> Result<Step, DialogError> {
        match err {
            DialogError::InvalidInput { prompt } => {
                Ok(Step::to(current).prompt(prompt, session.last_keyboard.clone()))
            }
            err if err.resets_to_main_menu() => {
                tracing::warn!(state = ?current, error = %err, "Returning to main menu");
                session.context.reset_flow();
                Ok(Step::to(DialogState::MainMenu).say(RESET_NOTICE))
            }
            err => Err(err),
        }
    }

    /// Validates the transition, attaches the main menu keyboard when the
    /// step ends there, and stores the new state on the session.
    ///
    /// A lonely-slot claim carried by a step that is not committed goes back
    /// to the slot.
    async fn commit(
        &self,
        session: &mut Session,
        from: DialogState,
        step: Step,
    ) -> Result<Step, DialogError> {
        let claim = step.lonely_claim;
        let committed = self.apply(session, from, step).await;
        if let (Err(_), Some(waiting)) = (&committed, claim) {
            self.lonely.register_if_empty(waiting);
        }
        committed
    }

    async fn apply(
        &self,
        session: &mut Session,
        from: DialogState,
        step: Step,
    ) -> Result<Step, DialogError> {
        let mut step = step;
        if !from.can_transition_to(&step.next) {
            tracing::warn!(from = ?from, to = ?step.next, "Handler returned an invalid transition");
            if let Some(waiting) = step.lonely_claim {
                self.lonely.register_if_empty(waiting);
            }
            step = Step::to(DialogState::MainMenu).say(RESET_NOTICE);
        }

        if step.next == DialogState::MainMenu {
            session.context.reset_flow();
            let profile = session.context.profile()?;
            let keyboard = self.main_menu.keyboard(&profile).await?;
            step = step.finish_with(MENU_PROMPT, keyboard);
        }

        if let Some(keyboard) = step.last_keyboard() {
            session.last_keyboard = Some(keyboard.clone());
        }
        if session.state != Some(step.next) {
            tracing::debug!(from = ?from, to = ?step.next, "State transition");
        }
        session.state = Some(step.next);
        Ok(step)
    }

    /// Links the session to the sender's profile, creating it on first
    /// contact or when the linked profile has disappeared.
    async fn ensure_profile(
        &self,
        session: &mut Session,
        sender: &MessengerIdentity,
    ) -> Result<Profile, DialogError> {
        if let Some(id) = session.context.profile_id {
            if let Some(profile) = self.profiles.find_by_id(&id).await? {
                return Ok(profile);
            }
        }
        let profile = self.profiles.get_or_create(sender).await?;
        session.context.profile_id = Some(profile.id);
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::World;
    use crate::domain::dialog::{FlowContext, Keyboard, SessionKey};
    use crate::domain::foundation::UserId;

    fn engine(world: &World) -> DialogEngine {
        DialogEngine::new(
            world.collaborators(),
            EngineSettings {
                match_seed: Some(3),
                ..EngineSettings::default()
            },
            Arc::new(LonelyUserSlot::new()),
        )
    }

    fn identity(id: i64, name: &str) -> MessengerIdentity {
        MessengerIdentity::new(UserId::new(id), name, None)
    }

    async fn started(engine: &DialogEngine, id: i64, name: &str) -> Session {
        let mut session = Session::new(SessionKey::private(UserId::new(id)));
        engine
            .handle_text(&mut session, &identity(id, name), "/start")
            .await
            .unwrap();
        session
    }

    mod routing {
        use super::*;

        #[test]
        fn no_route_shadows_reserved_captions() {
            for state in DialogState::ALL {
                for route in routes(state) {
                    assert!(
                        !matches!(route.trigger, Trigger::Exact(c) if is_main_menu_request(c)),
                        "{:?} shadows a reserved caption",
                        state
                    );
                }
            }
        }

        #[test]
        fn exact_caption_wins_over_any_text() {
            assert_eq!(
                resolve(DialogState::SpeakerAnswerView, captions::NEXT_QUESTION),
                Some(Action::NextQuestion)
            );
            assert_eq!(
                resolve(DialogState::SpeakerAnswerView, "Great question"),
                Some(Action::AnswerQuestion)
            );
        }

        #[test]
        fn event_captions_are_matched_by_pattern() {
            assert_eq!(
                resolve(DialogState::ChooseEventTime, "10:00-10:45 Opening"),
                Some(Action::ChooseSlot)
            );
            assert_eq!(resolve(DialogState::ChooseEventTime, "Opening"), None);
        }

        #[test]
        fn checkout_has_no_text_routes() {
            assert_eq!(resolve(DialogState::CheckPayment, "150"), None);
        }
    }

    #[tokio::test]
    async fn first_message_greets_and_shows_menu() {
        let world = World::new();
        let engine = engine(&world);
        let mut session = Session::new(SessionKey::private(UserId::new(1)));

        let step = engine
            .handle_text(&mut session, &identity(1, "Ann"), "anything")
            .await
            .unwrap();

        assert_eq!(step.replies[0].text, "Hello, Ann!");
        assert_eq!(session.state, Some(DialogState::MainMenu));
        assert!(session.context.profile_id.is_some());
        assert!(step.last_keyboard().unwrap().contains(captions::PROGRAM));
        assert_eq!(session.last_keyboard.as_ref(), step.last_keyboard());
    }

    #[tokio::test]
    async fn main_menu_is_honored_from_every_state() {
        let world = World::new();
        let engine = engine(&world);

        for state in DialogState::ALL {
            let mut session = started(&engine, 1, "Ann").await;
            let profile = session.context.profile_id;
            session.state = Some(state);

            engine
                .handle_text(&mut session, &identity(1, "Ann"), captions::MAIN_MENU)
                .await
                .unwrap();

            assert_eq!(session.state, Some(DialogState::MainMenu), "from {:?}", state);
            assert_eq!(session.context.flow, FlowContext::Idle);
            assert_eq!(session.context.profile_id, profile);
        }
    }

    #[tokio::test]
    async fn unmatched_input_re_sends_last_keyboard() {
        let world = World::new();
        let engine = engine(&world);
        let mut session = started(&engine, 1, "Ann").await;
        let menu = session.last_keyboard.clone().unwrap();

        let step = engine
            .handle_text(&mut session, &identity(1, "Ann"), "gibberish")
            .await
            .unwrap();

        assert_eq!(step.next, DialogState::MainMenu);
        assert_eq!(step.replies.len(), 1);
        assert_eq!(step.replies[0].text, FALLBACK_PROMPT);
        assert_eq!(step.replies[0].keyboard.as_ref(), Some(&menu));
    }

    #[tokio::test]
    async fn help_keeps_the_state() {
        let world = World::new();
        let engine = engine(&world);
        let mut session = started(&engine, 1, "Ann").await;
        engine
            .handle_text(&mut session, &identity(1, "Ann"), captions::DONATE)
            .await
            .unwrap();

        engine
            .handle_text(&mut session, &identity(1, "Ann"), captions::HELP_COMMAND)
            .await
            .unwrap();

        assert_eq!(session.state, Some(DialogState::InputDonateAmount));
        assert!(session.context.donate_mut().is_ok());
    }

    #[tokio::test]
    async fn missing_context_recovers_to_main_menu() {
        let world = World::new();
        let engine = engine(&world);
        let mut session = started(&engine, 1, "Ann").await;
        session.state = Some(DialogState::SaveQuestion);

        let step = engine
            .handle_text(&mut session, &identity(1, "Ann"), captions::SEND)
            .await
            .unwrap();

        assert_eq!(step.next, DialogState::MainMenu);
        assert_eq!(step.replies[0].text, RESET_NOTICE);
        assert!(step.last_keyboard().is_some());
    }

    #[tokio::test]
    async fn invalid_amount_stays_in_amount_prompt() {
        let world = World::new();
        let engine = engine(&world);
        let mut session = started(&engine, 1, "Ann").await;
        engine
            .handle_text(&mut session, &identity(1, "Ann"), captions::DONATE)
            .await
            .unwrap();

        let step = engine
            .handle_text(&mut session, &identity(1, "Ann"), "lots")
            .await
            .unwrap();

        assert_eq!(step.next, DialogState::InputDonateAmount);
        assert_eq!(step.last_keyboard(), Some(&Keyboard::single(captions::MAIN_MENU)));
        assert!(world.payments.invoices().is_empty());
    }

    #[tokio::test]
    async fn payment_signal_outside_checkout_is_ignored() {
        let world = World::new();
        let engine = engine(&world);
        let mut session = started(&engine, 1, "Ann").await;

        let step = engine
            .handle_payment(&mut session, PaymentOutcome::Succeeded)
            .await
            .unwrap();

        assert!(step.is_none());
        assert_eq!(session.state, Some(DialogState::MainMenu));
    }

    #[tokio::test]
    async fn payment_failure_returns_to_amount_prompt() {
        let world = World::new();
        let engine = engine(&world);
        let mut session = started(&engine, 1, "Ann").await;
        for text in [captions::DONATE, "150"] {
            engine
                .handle_text(&mut session, &identity(1, "Ann"), text)
                .await
                .unwrap();
        }
        assert_eq!(session.state, Some(DialogState::CheckPayment));

        engine
            .handle_payment(&mut session, PaymentOutcome::Failed)
            .await
            .unwrap();
        assert_eq!(session.state, Some(DialogState::InputDonateAmount));

        engine
            .handle_text(&mut session, &identity(1, "Ann"), "200")
            .await
            .unwrap();
        engine
            .handle_payment(&mut session, PaymentOutcome::Succeeded)
            .await
            .unwrap();
        assert_eq!(session.state, Some(DialogState::MainMenu));
        assert_eq!(world.payments.invoices().len(), 2);
    }
}
