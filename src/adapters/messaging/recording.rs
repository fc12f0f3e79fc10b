//! Recording messenger for tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::domain::dialog::OutboundMessage;
use crate::domain::foundation::ChatId;
use crate::ports::{DeliveryError, Messenger};

/// Captures delivered messages for assertions.
///
/// # Example
///
/// ```ignore
/// let messenger = RecordingMessenger::new();
/// dispatcher.handle(event).await?;
/// assert_eq!(messenger.texts_to(chat), vec!["Hello, Ann!"]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingMessenger {
    inner: Arc<Mutex<RecordingState>>,
}

#[derive(Default)]
struct RecordingState {
    sent: Vec<OutboundMessage>,
    unavailable: HashSet<ChatId>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every delivery to `chat` fail.
    pub fn block_chat(&self, chat: ChatId) {
        self.inner.lock().unwrap().unavailable.insert(chat);
    }

    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn sent_to(&self, chat: ChatId) -> Vec<OutboundMessage> {
        self.sent().into_iter().filter(|m| m.chat == chat).collect()
    }

    pub fn texts_to(&self, chat: ChatId) -> Vec<String> {
        self.sent_to(chat).into_iter().map(|m| m.text).collect()
    }

    /// The most recent message delivered to `chat`.
    pub fn last_to(&self, chat: ChatId) -> Option<OutboundMessage> {
        self.sent_to(chat).pop()
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().sent.clear();
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, message: &OutboundMessage) -> Result<(), DeliveryError> {
        let mut state = self.inner.lock().unwrap();
        if state.unavailable.contains(&message.chat) {
            return Err(DeliveryError::ChatUnavailable(message.chat));
        }
        state.sent.push(message.clone());
        Ok(())
    }
}
