//! Console demo of the meetup bot.
//!
//! Each stdin line is `<user_id> <text>`. Payment signals are typed as
//! `<user_id> /precheck <payload>`, `<user_id> /paid` and `<user_id> /failed`.

use std::sync::Arc;

use meetup_bot::adapters::{
    ConsoleMessenger, ConsolePaymentGateway, InMemoryProfileRepository,
    InMemoryQuestionRepository, InMemoryScheduleReader, InMemorySessionRepository, ScheduleSeed,
};
use meetup_bot::application::{
    Collaborators, DialogEngine, DispatchReport, Dispatcher, InboundEvent, SessionStore,
};
use meetup_bot::config::AppConfig;
use meetup_bot::domain::donation::PaymentOutcome;
use meetup_bot::domain::foundation::{ChatId, UserId};
use meetup_bot::domain::meetup::MessengerIdentity;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.dialog.log_level));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let profiles = Arc::new(InMemoryProfileRepository::new());
    let schedule = Arc::new(InMemoryScheduleReader::new());
    if let Some(path) = &config.dialog.schedule_seed_path {
        let installed = ScheduleSeed::from_file(path)?
            .install(&schedule, &*profiles)
            .await?;
        tracing::info!(path = %path, presentations = installed, "Schedule seeded");
    } else {
        tracing::warn!("No schedule seed configured. Set MEETUP_BOT__DIALOG__SCHEDULE_SEED_PATH.");
    }

    let payments = Arc::new(ConsolePaymentGateway::new(
        config.payment.provider_token.clone(),
    ));
    let store = Arc::new(SessionStore::new(Arc::new(
        InMemorySessionRepository::new(),
    )));
    let engine = DialogEngine::new(
        Collaborators {
            profiles,
            schedule,
            questions: Arc::new(InMemoryQuestionRepository::new()),
            payments: payments.clone(),
        },
        config.engine_settings(),
        store.lonely_slot(),
    );
    let dispatcher = Dispatcher::new(
        engine,
        Arc::clone(&store),
        Arc::new(ConsoleMessenger::new()),
        payments,
    );

    let eviction = Arc::clone(&store).spawn_eviction(
        config.dialog.session_idle_ttl(),
        config.dialog.eviction_interval(),
    );

    tracing::info!(
        columns = config.dialog.keyboard_columns,
        currency = %config.payment.currency,
        bot_token = config.bot.token.is_some(),
        "Meetup bot ready, reading stdin"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let Some(event) = parse_line(&line) else {
            if !line.trim().is_empty() {
                tracing::warn!(line = %line, "Expected `<user_id> <text>`");
            }
            continue;
        };
        match dispatcher.handle(event).await {
            Ok(DispatchReport {
                state, undelivered, ..
            }) => {
                tracing::debug!(state = ?state, undelivered, "Event handled");
            }
            Err(e) => tracing::error!(error = %e, "Event failed"),
        }
    }

    eviction.abort();
    Ok(())
}

fn parse_line(line: &str) -> Option<InboundEvent> {
    let (id, text) = line.trim().split_once(' ')?;
    let user_id = UserId::new(id.parse().ok()?);
    let sender = MessengerIdentity::new(user_id, format!("User {user_id}"), None);
    let chat = ChatId::private(user_id);
    let text = text.trim();

    let event = match text.split_once(' ') {
        Some(("/precheck", payload)) => InboundEvent::PreCheckout {
            query_id: format!("q-{user_id}"),
            sender,
            payload: payload.to_string(),
        },
        _ if text == "/paid" => InboundEvent::Payment {
            sender,
            chat,
            outcome: PaymentOutcome::Succeeded,
        },
        _ if text == "/failed" => InboundEvent::Payment {
            sender,
            chat,
            outcome: PaymentOutcome::Failed,
        },
        _ => InboundEvent::text(sender, chat, text),
    };
    Some(event)
}
