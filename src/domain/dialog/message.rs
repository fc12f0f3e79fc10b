//! Outbound messages and reply keyboards.

use serde::{Deserialize, Serialize};

use super::paginator::paginate;
use crate::domain::foundation::ChatId;

/// How the transport should render message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    #[default]
    Plain,
    Markdown,
}

/// A reply keyboard: a grid of captions the user can tap.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Keyboard {
    pub rows: Vec<Vec<String>>,
}

impl Keyboard {
    /// Builds a keyboard from captions laid out `columns` per row.
    pub fn from_captions<I, S>(captions: I, columns: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: paginate(captions, columns),
        }
    }

    /// A keyboard with a single button.
    pub fn single(caption: impl Into<String>) -> Self {
        Self {
            rows: vec![vec![caption.into()]],
        }
    }

    /// Appends a row of captions.
    pub fn with_row<I, S>(mut self, row: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if !row.is_empty() {
            self.rows.push(row);
        }
        self
    }

    /// Returns true if any button carries the caption.
    pub fn contains(&self, caption: &str) -> bool {
        self.rows.iter().flatten().any(|c| c == caption)
    }
}

/// A message addressed to a chat, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat: ChatId,
    pub text: String,
    #[serde(default)]
    pub style: TextStyle,
    pub keyboard: Option<Keyboard>,
}
