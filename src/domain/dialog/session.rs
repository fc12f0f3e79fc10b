//! Dialog sessions keyed by user and chat.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::context::SessionContext;
use super::message::Keyboard;
use super::state::DialogState;
use crate::domain::foundation::{ChatId, Timestamp, UserId};

/// Identifies a session: one user in one chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionKey {
    pub user: UserId,
    pub chat: ChatId,
}

impl SessionKey {
    pub fn new(user: UserId, chat: ChatId) -> Self {
        Self { user, chat }
    }

    /// Key of the user's private chat with the bot.
    pub fn private(user: UserId) -> Self {
        Self::new(user, ChatId::private(user))
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.user, self.chat)
    }
}

/// Dialog state and context that survive between inbound messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub key: SessionKey,
    /// `None` until the first message has been handled.
    pub state: Option<DialogState>,
    pub context: SessionContext,
    /// Keyboard last shown to the user, re-sent on unrecognized input.
    pub last_keyboard: Option<Keyboard>,
    pub last_activity: Timestamp,
}

impl Session {
    pub fn new(key: SessionKey) -> Self {
        Self {
            key,
            state: None,
            context: SessionContext::default(),
            last_keyboard: None,
            last_activity: Timestamp::now(),
        }
    }

    /// Returns true before the first message has been handled.
    pub fn is_new(&self) -> bool {
        self.state.is_none()
    }

    pub fn touch(&mut self, now: Timestamp) {
        self.last_activity = now;
    }
}
