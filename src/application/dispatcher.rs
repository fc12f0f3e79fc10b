//! Dispatcher: entry point for everything the transport delivers.
//!
//! Per event: take the session's lock, load it, run the engine, save it,
//! then deliver replies and notifications while still holding the lock so
//! the user sees answers in the order they wrote.

use std::sync::Arc;

use thiserror::Error;

use super::engine::DialogEngine;
use super::session_store::SessionStore;
use crate::domain::dialog::{DialogError, DialogState, OutboundMessage, Session, SessionKey, Step};
use crate::domain::donation::{precheck, PaymentOutcome};
use crate::domain::foundation::{ChatId, DomainError, ErrorCode, Timestamp};
use crate::domain::meetup::MessengerIdentity;
use crate::ports::{Messenger, PaymentError, PaymentGateway};

/// Something the transport received.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A text message or button press.
    Text {
        sender: MessengerIdentity,
        chat: ChatId,
        text: String,
    },
    /// The provider asks whether to go ahead with a payment.
    PreCheckout {
        query_id: String,
        sender: MessengerIdentity,
        payload: String,
    },
    /// The provider reports how a payment ended.
    Payment {
        sender: MessengerIdentity,
        chat: ChatId,
        outcome: PaymentOutcome,
    },
}

impl InboundEvent {
    pub fn text(sender: MessengerIdentity, chat: ChatId, text: impl Into<String>) -> Self {
        InboundEvent::Text {
            sender,
            chat,
            text: text.into(),
        }
    }

    pub fn sender(&self) -> &MessengerIdentity {
        match self {
            InboundEvent::Text { sender, .. }
            | InboundEvent::PreCheckout { sender, .. }
            | InboundEvent::Payment { sender, .. } => sender,
        }
    }
}

/// What happened while handling one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Session the event was applied to; `None` for pre-checkout queries.
    pub key: Option<SessionKey>,
    /// State after the event; `None` if the event left no session state.
    pub state: Option<DialogState>,
    pub delivered: usize,
    /// Messages the transport refused. They are logged, not retried.
    pub undelivered: usize,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Collaborator failure: {0}")]
    Collaborator(#[from] DomainError),

    #[error("Payment gateway failure: {0}")]
    Payment(#[from] PaymentError),
}

impl From<DialogError> for DispatchError {
    fn from(err: DialogError) -> Self {
        match err {
            DialogError::Collaborator(inner) => DispatchError::Collaborator(inner),
            other => DispatchError::Collaborator(DomainError::new(
                ErrorCode::InternalError,
                other.to_string(),
            )),
        }
    }
}

pub struct Dispatcher {
    engine: DialogEngine,
    store: Arc<SessionStore>,
    messenger: Arc<dyn Messenger>,
    payments: Arc<dyn PaymentGateway>,
}

impl Dispatcher {
    pub fn new(
        engine: DialogEngine,
        store: Arc<SessionStore>,
        messenger: Arc<dyn Messenger>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            engine,
            store,
            messenger,
            payments,
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub async fn handle(&self, event: InboundEvent) -> Result<DispatchReport, DispatchError> {
        match event {
            InboundEvent::Text { sender, chat, text } => self.on_text(sender, chat, &text).await,
            InboundEvent::PreCheckout {
                query_id,
                sender,
                payload,
            } => self.on_precheck(&query_id, &sender, &payload).await,
            InboundEvent::Payment {
                sender,
                chat,
                outcome,
            } => self.on_payment(sender, chat, outcome).await,
        }
    }

    async fn on_text(
        &self,
        sender: MessengerIdentity,
        chat: ChatId,
        text: &str,
    ) -> Result<DispatchReport, DispatchError> {
        let key = SessionKey::new(sender.user_id, chat);
        let _guard = self.store.lock(key).await;
        let mut session = self.store.load(key).await?;
        tracing::debug!(
            user_id = %key.user,
            chat_id = %key.chat,
            state = ?session.state,
            "Dispatching text"
        );

        let step = self
            .engine
            .handle_text(&mut session, &sender, text)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %key.user, chat_id = %key.chat, error = %e, "Dispatch failed");
                e
            })?;
        self.finish(&mut session, step).await
    }

    async fn on_payment(
        &self,
        sender: MessengerIdentity,
        chat: ChatId,
        outcome: PaymentOutcome,
    ) -> Result<DispatchReport, DispatchError> {
        let key = SessionKey::new(sender.user_id, chat);
        let _guard = self.store.lock(key).await;
        let mut session = self.store.load(key).await?;

        match self.engine.handle_payment(&mut session, outcome).await? {
            Some(step) => self.finish(&mut session, step).await,
            None => Ok(DispatchReport {
                key: Some(key),
                state: session.state,
                delivered: 0,
                undelivered: 0,
            }),
        }
    }

    /// Answers a pre-checkout query. No session is involved.
    async fn on_precheck(
        &self,
        query_id: &str,
        sender: &MessengerIdentity,
        payload: &str,
    ) -> Result<DispatchReport, DispatchError> {
        let decision = precheck(payload);
        if !decision.ok() {
            tracing::warn!(user_id = %sender.user_id, payload, "Pre-checkout payload mismatch");
        }
        self.payments.answer_precheck(query_id, &decision).await?;
        Ok(DispatchReport {
            key: None,
            state: None,
            delivered: 0,
            undelivered: 0,
        })
    }

    async fn finish(&self, session: &mut Session, step: Step) -> Result<DispatchReport, DispatchError> {
        session.touch(Timestamp::now());
        if let Err(e) = self.store.save(session).await {
            if let Some(waiting) = step.lonely_claim {
                self.store.lonely_slot().register_if_empty(waiting);
            }
            tracing::error!(user_id = %session.key.user, error = %e, "Session not saved");
            return Err(e.into());
        }

        let chat = session.key.chat;
        let outbound = step
            .replies
            .into_iter()
            .map(|reply| OutboundMessage {
                chat,
                text: reply.text,
                style: reply.style,
                keyboard: reply.keyboard,
            })
            .chain(step.notifications.into_iter().map(|n| OutboundMessage {
                chat: n.chat,
                text: n.text,
                style: Default::default(),
                keyboard: None,
            }));

        let (mut delivered, mut undelivered) = (0, 0);
        for message in outbound {
            match self.messenger.send(&message).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(chat_id = %message.chat, error = %e, "Message not delivered");
                    undelivered += 1;
                }
            }
        }

        Ok(DispatchReport {
            key: Some(session.key),
            state: session.state,
            delivered,
            undelivered,
        })
    }
}
