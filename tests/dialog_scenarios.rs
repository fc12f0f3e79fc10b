//! End-to-end dialog scenarios.
//!
//! Drives the dispatcher the way the transport would: one inbound event at
//! a time, with in-memory collaborators, a recording messenger and a mock
//! payment gateway. The schedule is seeded from YAML like the demo binary.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use meetup_bot::adapters::{
    InMemoryProfileRepository, InMemoryQuestionRepository, InMemoryScheduleReader,
    InMemorySessionRepository, MockPaymentGateway, RecordingMessenger, ScheduleSeed,
};
use meetup_bot::application::handlers::MENU_PROMPT;
use meetup_bot::application::{
    Collaborators, DialogEngine, DispatchReport, Dispatcher, EngineSettings, InboundEvent,
    SessionStore, FALLBACK_PROMPT,
};
use meetup_bot::domain::dialog::{captions, DialogState, OutboundMessage, SessionKey};
use meetup_bot::domain::donation::{PaymentOutcome, DONATE_PAYLOAD};
use meetup_bot::domain::foundation::{ChatId, Timestamp, UserId};
use meetup_bot::domain::meetup::MessengerIdentity;
use meetup_bot::ports::{DeliveryError, Messenger, ProfileRepository};

// =============================================================================
// Test Infrastructure
// =============================================================================

const SCHEDULE: &str = r#"
groups:
  - title: Main stage
    events:
      - title: Registration
        from: "09:30"
        to: "10:00"
      - title: Async Rust in production
        from: "10:00"
        to: "10:45"
        presentations:
          - title: Async Rust in production
            speaker:
              user_id: 1001
              name: Anna
              username: anna_rs
"#;

const TALK: &str = "10:00-10:45 Async Rust in production";

/// Delays every delivery so the session lock is held across an await.
struct SlowMessenger {
    inner: RecordingMessenger,
}

#[async_trait]
impl Messenger for SlowMessenger {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        tokio::time::sleep(Duration::from_millis(2)).await;
        self.inner.send(message).await
    }
}

struct App {
    dispatcher: Dispatcher,
    messenger: RecordingMessenger,
    payments: MockPaymentGateway,
    profiles: InMemoryProfileRepository,
    store: Arc<SessionStore>,
}

async fn app() -> App {
    build(false).await
}

async fn build(slow: bool) -> App {
    let profiles = InMemoryProfileRepository::new();
    let schedule = InMemoryScheduleReader::new();
    ScheduleSeed::from_yaml(SCHEDULE)
        .unwrap()
        .install(&schedule, &profiles)
        .await
        .unwrap();

    let payments = MockPaymentGateway::new();
    let store = Arc::new(SessionStore::new(Arc::new(InMemorySessionRepository::new())));
    let engine = DialogEngine::new(
        Collaborators {
            profiles: Arc::new(profiles.clone()),
            schedule: Arc::new(schedule),
            questions: Arc::new(InMemoryQuestionRepository::new()),
            payments: Arc::new(payments.clone()),
        },
        EngineSettings {
            match_seed: Some(7),
            ..EngineSettings::default()
        },
        store.lonely_slot(),
    );

    let messenger = RecordingMessenger::new();
    let outbound: Arc<dyn Messenger> = if slow {
        Arc::new(SlowMessenger {
            inner: messenger.clone(),
        })
    } else {
        Arc::new(messenger.clone())
    };
    let dispatcher = Dispatcher::new(
        engine,
        Arc::clone(&store),
        outbound,
        Arc::new(payments.clone()),
    );

    App {
        dispatcher,
        messenger,
        payments,
        profiles,
        store,
    }
}

fn person(id: i64, name: &str) -> MessengerIdentity {
    MessengerIdentity::new(UserId::new(id), name, Some(name.to_lowercase()))
}

fn chat_of(who: &MessengerIdentity) -> ChatId {
    ChatId::private(who.user_id)
}

impl App {
    async fn say(&self, who: &MessengerIdentity, text: &str) -> DispatchReport {
        self.dispatcher
            .handle(InboundEvent::text(who.clone(), chat_of(who), text))
            .await
            .unwrap()
    }

    async fn say_all(&self, who: &MessengerIdentity, texts: &[&str]) -> DispatchReport {
        let mut last = None;
        for text in texts {
            last = Some(self.say(who, text).await);
        }
        last.expect("at least one text")
    }

    fn last_text(&self, who: &MessengerIdentity) -> String {
        self.messenger.last_to(chat_of(who)).unwrap().text
    }

    fn texts(&self, who: &MessengerIdentity) -> Vec<String> {
        self.messenger.texts_to(chat_of(who))
    }

    async fn ask(&self, who: &MessengerIdentity, question: &str) {
        let report = self
            .say_all(
                who,
                &["/start", captions::ASK_QUESTION, TALK, "Anna", question, captions::SEND],
            )
            .await;
        assert_eq!(report.state, Some(DialogState::MainMenu));
    }
}

// =============================================================================
// Main menu and fallback
// =============================================================================

#[tokio::test]
async fn main_menu_resets_from_every_flow() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    let paths: &[(&[&str], DialogState)] = &[
        (&[captions::PROGRAM], DialogState::EventGroupChoice),
        (&[captions::PROGRAM, "Main stage"], DialogState::EventChoice),
        (&[captions::ASK_QUESTION], DialogState::ChooseEventTime),
        (&[captions::ASK_QUESTION, TALK], DialogState::ChooseSpeaker),
        (&[captions::ASK_QUESTION, TALK, "Anna"], DialogState::Question),
        (&[captions::ASK_QUESTION, TALK, "Anna", "Why?"], DialogState::SaveQuestion),
        (&[captions::DONATE], DialogState::InputDonateAmount),
        (&[captions::DONATE, "100"], DialogState::CheckPayment),
        (&[captions::MEET], DialogState::SurveyName),
        (&[captions::MEET, "Ivan", "Acme"], DialogState::SurveyJob),
    ];

    app.say(&ivan, "/start").await;
    for (path, reached) in paths {
        let report = app.say_all(&ivan, path).await;
        assert_eq!(report.state, Some(*reached), "path {:?}", path);

        let report = app.say(&ivan, captions::MAIN_MENU).await;
        assert_eq!(report.state, Some(DialogState::MainMenu), "after {:?}", path);
        let last = app.messenger.last_to(chat_of(&ivan)).unwrap();
        assert_eq!(last.text, MENU_PROMPT);
        assert!(last.keyboard.unwrap().contains(captions::PROGRAM));
    }
}

#[tokio::test]
async fn unrecognized_text_repeats_the_current_keyboard() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    app.say_all(&ivan, &["/start", captions::PROGRAM]).await;

    let report = app.say(&ivan, "what is this").await;

    assert_eq!(report.state, Some(DialogState::EventGroupChoice));
    let last = app.messenger.last_to(chat_of(&ivan)).unwrap();
    assert_eq!(last.text, FALLBACK_PROMPT);
    let keyboard = last.keyboard.unwrap();
    assert!(keyboard.contains("Main stage"));
    assert!(keyboard.contains(captions::BACK));
}

#[tokio::test]
async fn first_contact_greets_whatever_was_typed() {
    let app = app().await;
    let ivan = person(7, "Ivan");

    let report = app.say(&ivan, "hello?").await;

    assert_eq!(report.state, Some(DialogState::MainMenu));
    assert_eq!(app.texts(&ivan), vec!["Hello, Ivan!".to_string(), MENU_PROMPT.to_string()]);
}

// =============================================================================
// Questions and answers
// =============================================================================

#[tokio::test]
async fn speaker_walks_the_question_queue_and_answers() {
    let app = app().await;
    let anna = person(1001, "Anna");
    let ivan = person(7, "Ivan");

    app.ask(&ivan, "Q1").await;
    app.ask(&ivan, "Q2").await;
    assert_eq!(
        app.texts(&anna)
            .iter()
            .filter(|t| t.starts_with("New question"))
            .count(),
        2
    );

    let report = app.say_all(&anna, &["/start", captions::ANSWER_QUESTION]).await;
    assert_eq!(report.state, Some(DialogState::SpeakerAnswerView));
    assert!(app.last_text(&anna).starts_with("Question 1:\nQ1"));

    app.say(&anna, captions::NEXT_QUESTION).await;
    assert!(app.last_text(&anna).starts_with("Question 2:\nQ2"));

    app.messenger.clear();
    app.say(&anna, captions::NEXT_QUESTION).await;
    let shown = app.texts(&anna);
    assert_eq!(shown[0], "No more new questions, back to the first one.");
    assert!(shown[1].starts_with("Question 1:\nQ1"));

    let report = app.say(&anna, "A1").await;
    assert_eq!(report.state, Some(DialogState::NextQuestion));
    assert_eq!(app.last_text(&anna), "Your answer has been sent.");
    assert_eq!(app.last_text(&ivan), "Question: Q1\nAnswer: A1");

    let report = app.say(&anna, captions::NEXT_QUESTION).await;
    assert_eq!(report.state, Some(DialogState::SpeakerAnswerView));
    assert!(app.last_text(&anna).contains("Q2"));
}

#[tokio::test]
async fn listener_cannot_open_the_speaker_queue() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    app.say(&ivan, "/start").await;

    let report = app.say(&ivan, captions::ANSWER_QUESTION).await;

    assert_eq!(report.state, Some(DialogState::MainMenu));
    assert!(app.texts(&ivan).iter().any(|t| t.starts_with("Only speakers")));
}

#[tokio::test]
async fn rewrite_replaces_the_draft_before_sending() {
    let app = app().await;
    let anna = person(1001, "Anna");
    let ivan = person(7, "Ivan");

    app.say_all(
        &ivan,
        &["/start", captions::ASK_QUESTION, TALK, "Anna", "Frist draft", captions::REWRITE],
    )
    .await;
    let report = app.say_all(&ivan, &["First draft", captions::SEND]).await;
    assert_eq!(report.state, Some(DialogState::MainMenu));

    app.say_all(&anna, &["/start", captions::ANSWER_QUESTION]).await;
    assert!(app.last_text(&anna).starts_with("Question 1:\nFirst draft"));
}

// =============================================================================
// Donations
// =============================================================================

#[tokio::test]
async fn donation_invoice_precheck_and_payment() {
    let app = app().await;
    let ivan = person(7, "Ivan");

    let report = app.say_all(&ivan, &["/start", captions::DONATE, "150"]).await;
    assert_eq!(report.state, Some(DialogState::CheckPayment));

    let invoice = app.payments.last_invoice().unwrap();
    assert_eq!(invoice.amount_minor, 15_000);
    assert_eq!(invoice.currency, "RUB");
    assert_eq!(invoice.payload, DONATE_PAYLOAD);
    assert_eq!(invoice.chat, chat_of(&ivan));

    app.dispatcher
        .handle(InboundEvent::PreCheckout {
            query_id: "pc-1".into(),
            sender: ivan.clone(),
            payload: invoice.payload.clone(),
        })
        .await
        .unwrap();
    assert!(app.payments.prechecks()[0].1.ok());

    let report = app
        .dispatcher
        .handle(InboundEvent::Payment {
            sender: ivan.clone(),
            chat: chat_of(&ivan),
            outcome: PaymentOutcome::Succeeded,
        })
        .await
        .unwrap();
    assert_eq!(report.state, Some(DialogState::MainMenu));
    assert!(app.texts(&ivan).contains(&"Thank you for your support!".to_string()));
}

#[tokio::test]
async fn failed_payment_asks_for_the_amount_again() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    app.say_all(&ivan, &["/start", captions::DONATE, "50"]).await;

    let report = app
        .dispatcher
        .handle(InboundEvent::Payment {
            sender: ivan.clone(),
            chat: chat_of(&ivan),
            outcome: PaymentOutcome::Failed,
        })
        .await
        .unwrap();

    assert_eq!(report.state, Some(DialogState::InputDonateAmount));
    let report = app.say(&ivan, "75").await;
    assert_eq!(report.state, Some(DialogState::CheckPayment));
    assert_eq!(app.payments.invoices().len(), 2);
}

#[tokio::test]
async fn invalid_amount_keeps_waiting_for_a_number() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    app.say_all(&ivan, &["/start", captions::DONATE]).await;

    for text in ["a lot", "-5", "0"] {
        let report = app.say(&ivan, text).await;
        assert_eq!(report.state, Some(DialogState::InputDonateAmount), "{}", text);
    }
    assert!(app.payments.invoices().is_empty());
}

// =============================================================================
// Matchmaking and the survey
// =============================================================================

#[tokio::test]
async fn lonely_participant_is_told_once_when_someone_joins() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    let olga = person(8, "Olga");
    let petr = person(9, "Petr");
    let survey = |name: &'static str| {
        [captions::MEET, name, "Acme", "Engineer", captions::CONFIRM]
    };

    app.say(&ivan, "/start").await;
    let report = app.say_all(&ivan, &survey("Ivan")).await;
    assert_eq!(report.state, Some(DialogState::MeetChoice));
    let report = app.say(&ivan, captions::NEXT_PERSON).await;
    assert_eq!(report.state, Some(DialogState::MainMenu));
    assert!(app.texts(&ivan).iter().any(|t| t.starts_with("Nobody else is ready")));

    app.say(&olga, "/start").await;
    app.say_all(&olga, &survey("Olga")).await;
    let joined = |who: &MessengerIdentity| {
        app.texts(who)
            .iter()
            .filter(|t| t.starts_with("Someone new is ready to meet"))
            .count()
    };
    assert_eq!(joined(&ivan), 1);
    assert_eq!(joined(&olga), 0);

    let report = app.say(&olga, captions::NEXT_PERSON).await;
    assert_eq!(report.state, Some(DialogState::MeetChoice));
    assert!(app.last_text(&olga).starts_with("Ivan\nCompany: Acme"));

    app.say(&petr, "/start").await;
    app.say_all(&petr, &survey("Petr")).await;
    assert_eq!(joined(&ivan), 1);
    assert_eq!(joined(&petr), 0);
}

#[tokio::test]
async fn single_candidate_is_shown_again_after_a_reset() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    let olga = person(8, "Olga");
    for (who, name) in [(&ivan, "Ivan"), (&olga, "Olga")] {
        app.say_all(who, &["/start", captions::MEET, name, "Acme", "Engineer", captions::CONFIRM])
            .await;
    }

    app.say(&olga, captions::NEXT_PERSON).await;
    assert!(app.last_text(&olga).starts_with("Ivan"));

    app.messenger.clear();
    let report = app.say(&olga, captions::NEXT_PERSON).await;

    assert_eq!(report.state, Some(DialogState::MeetChoice));
    let shown = app.texts(&olga);
    assert_eq!(shown[0], "You have seen everyone, starting over.");
    assert!(shown[1].starts_with("Ivan"));
}

#[tokio::test]
async fn shown_candidates_are_remembered_across_menu_visits() {
    let app = app().await;
    let olga = person(8, "Olga");
    let petr = person(9, "Petr");
    let ivan = person(7, "Ivan");
    for (who, name) in [(&olga, "Olga"), (&petr, "Petr"), (&ivan, "Ivan")] {
        app.say_all(who, &["/start", captions::MEET, name, "Acme", "Engineer", captions::CONFIRM])
            .await;
    }
    let name_on_card = |text: String| text.lines().next().unwrap_or_default().to_string();

    app.say(&ivan, captions::NEXT_PERSON).await;
    let first = name_on_card(app.last_text(&ivan));

    app.say(&ivan, captions::MAIN_MENU).await;
    let report = app.say(&ivan, captions::MEET).await;
    assert_eq!(report.state, Some(DialogState::MeetChoice));
    let second = name_on_card(app.last_text(&ivan));

    assert_ne!(first, second);
    let mut both = vec![first, second];
    both.sort();
    assert_eq!(both, vec!["Olga".to_string(), "Petr".to_string()]);

    app.messenger.clear();
    app.say(&ivan, captions::NEXT_PERSON).await;
    let shown = app.texts(&ivan);
    assert_eq!(shown[0], "You have seen everyone, starting over.");
}

#[tokio::test]
async fn survey_retry_discards_the_first_attempt() {
    let app = app().await;
    let olga = person(8, "Olga");

    let report = app
        .say_all(&olga, &["/start", captions::MEET, "Olga", "Acme", "Engineer"])
        .await;
    assert_eq!(report.state, Some(DialogState::SurveyConfirm));
    assert!(app.last_text(&olga).contains("Company: Acme"));

    let report = app.say(&olga, captions::RETRY).await;
    assert_eq!(report.state, Some(DialogState::SurveyName));

    let report = app.say(&olga, "   ").await;
    assert_eq!(report.state, Some(DialogState::SurveyName));
    assert_eq!(app.last_text(&olga), "What is your name?");

    let report = app
        .say_all(&olga, &["Olga K", "Initech", "CTO", captions::CONFIRM])
        .await;
    assert_eq!(report.state, Some(DialogState::MeetChoice));

    let profile = app
        .profiles
        .find_by_user(&UserId::new(8))
        .await
        .unwrap()
        .unwrap();
    assert!(profile.ready_to_meet);
    assert_eq!(profile.name, "Olga K");
    assert_eq!(profile.company.as_deref(), Some("Initech"));
    assert_eq!(profile.job.as_deref(), Some("CTO"));
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn events_for_one_session_apply_in_arrival_order() {
    let app = build(true).await;
    let olga = person(8, "Olga");
    app.say_all(&olga, &["/start", captions::MEET]).await;

    let (dispatcher, sender) = (&app.dispatcher, &olga);
    let send = move |text: &'static str| {
        dispatcher.handle(InboundEvent::text(sender.clone(), chat_of(sender), text))
    };
    let (name, company, job) = tokio::join!(send("Olga"), send("Acme"), send("Engineer"));

    assert_eq!(name.unwrap().state, Some(DialogState::SurveyCompany));
    assert_eq!(company.unwrap().state, Some(DialogState::SurveyJob));
    assert_eq!(job.unwrap().state, Some(DialogState::SurveyConfirm));
    assert!(app
        .last_text(&olga)
        .starts_with("Name: Olga\nCompany: Acme\nPosition: Engineer"));
}

#[tokio::test]
async fn evicted_session_starts_over() {
    let app = app().await;
    let ivan = person(7, "Ivan");
    app.say_all(&ivan, &["/start", captions::DONATE]).await;

    tokio::time::sleep(Duration::from_millis(5)).await;
    let evicted = app
        .store
        .evict_idle(Duration::ZERO, Timestamp::now())
        .await
        .unwrap();
    assert_eq!(evicted, 1);

    app.messenger.clear();
    let report = app.say(&ivan, "150").await;

    assert_eq!(report.state, Some(DialogState::MainMenu));
    assert_eq!(app.texts(&ivan)[0], "Hello, Ivan!");
    assert!(app.payments.invoices().is_empty());

    let key = SessionKey::private(ivan.user_id);
    let session = app.store.load(key).await.unwrap();
    assert_eq!(session.state, Some(DialogState::MainMenu));
}
