//! Messenger port for outbound delivery.
//!
//! The transport renders keyboards and text styles; the dialog only hands it
//! finished messages.

use crate::domain::dialog::OutboundMessage;
use crate::domain::foundation::{ChatId, DomainError, ErrorCode};
use async_trait::async_trait;
use thiserror::Error;

/// Port for delivering messages to chats.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Deliver one message.
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError>;
}

/// Errors raised by the transport.
#[derive(Debug, Clone, Error)]
pub enum DeliveryError {
    /// The chat blocked the bot or no longer exists.
    #[error("Chat {0} is unavailable")]
    ChatUnavailable(ChatId),

    #[error("Transport failure: {0}")]
    Transport(String),
}

impl From<DeliveryError> for DomainError {
    fn from(err: DeliveryError) -> Self {
        DomainError::new(ErrorCode::DeliveryError, err.to_string())
    }
}
