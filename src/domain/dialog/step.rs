//! The result of running one handler.

use super::message::{Keyboard, TextStyle};
use super::state::DialogState;
use crate::domain::foundation::{ChatId, ProfileId};

/// A message to the chat that sent the trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub style: TextStyle,
    pub keyboard: Option<Keyboard>,
}

/// A message pushed to some other chat, such as an answer relayed to the
/// asker of a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub chat: ChatId,
    pub text: String,
}

/// Next state plus everything a handler wants delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: DialogState,
    pub replies: Vec<Reply>,
    pub notifications: Vec<Notification>,
    /// Participant taken from the lonely slot by this step. Handed back to
    /// the slot if the step is never committed.
    pub lonely_claim: Option<ProfileId>,
}

impl Step {
    pub fn to(next: DialogState) -> Self {
        Self {
            next,
            replies: Vec::new(),
            notifications: Vec::new(),
            lonely_claim: None,
        }
    }

    /// Adds a plain reply without a keyboard.
    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.replies.push(Reply {
            text: text.into(),
            style: TextStyle::Plain,
            keyboard: None,
        });
        self
    }

    /// Adds a plain reply with a keyboard.
    pub fn ask(mut self, text: impl Into<String>, keyboard: Keyboard) -> Self {
        self.replies.push(Reply {
            text: text.into(),
            style: TextStyle::Plain,
            keyboard: Some(keyboard),
        });
        self
    }

    /// Adds a markdown reply with an optional keyboard.
    pub fn markdown(mut self, text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        self.replies.push(Reply {
            text: text.into(),
            style: TextStyle::Markdown,
            keyboard,
        });
        self
    }

    /// Adds a plain reply, with a keyboard if one is given.
    pub fn prompt(mut self, text: impl Into<String>, keyboard: Option<Keyboard>) -> Self {
        self.replies.push(Reply {
            text: text.into(),
            style: TextStyle::Plain,
            keyboard,
        });
        self
    }

    pub fn notify(mut self, notification: Notification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn claim_lonely(mut self, profile: ProfileId) -> Self {
        self.lonely_claim = Some(profile);
        self
    }

    /// Puts `keyboard` on the last reply, or sends `text` with it when the
    /// step has no replies.
    pub fn finish_with(mut self, text: &str, keyboard: Keyboard) -> Self {
        if let Some(last) = self.replies.last_mut() {
            last.keyboard = Some(keyboard);
            return self;
        }
        self.prompt(text, Some(keyboard))
    }

    /// The keyboard the user will see after this step, if any reply sets one.
    pub fn last_keyboard(&self) -> Option<&Keyboard> {
        self.replies.iter().rev().find_map(|r| r.keyboard.as_ref())
    }
}
