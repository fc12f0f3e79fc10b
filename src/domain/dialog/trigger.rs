//! Triggers and the reserved caption vocabulary.
//!
//! Captions are part of the protocol between the transport and the engine
//! and must match exactly, including case.

use once_cell::sync::Lazy;
use regex::Regex;

/// Reserved button captions.
pub mod captions {
    pub const MAIN_MENU: &str = "Main menu";
    pub const BACK: &str = "Back";

    pub const PROGRAM: &str = "Program";
    pub const ASK_QUESTION: &str = "Ask a question";
    pub const ANSWER_QUESTION: &str = "Answer a question";
    pub const DONATE: &str = "Donate";
    pub const MEET: &str = "Meet someone";

    pub const SEND: &str = "Send";
    pub const REWRITE: &str = "Rewrite";
    pub const NEXT_QUESTION: &str = "Next question";
    pub const NEXT_PERSON: &str = "Next person";

    pub const CONFIRM: &str = "Confirm";
    pub const RETRY: &str = "Retry";

    pub const START_COMMAND: &str = "/start";
    pub const HELP_COMMAND: &str = "/help";
}

/// Matches event captions such as `10:00-10:45 Opening`.
pub static EVENT_CAPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}-\d{2}:\d{2} .+$").expect("event caption pattern is valid")
});

/// Inbound text pattern selecting a handler within a state.
#[derive(Debug, Clone, Copy)]
pub enum Trigger {
    /// The text equals the caption exactly.
    Exact(&'static str),
    /// The text matches the pattern.
    Pattern(&'static Lazy<Regex>),
    /// Any text at all.
    AnyText,
}

impl Trigger {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Trigger::Exact(caption) => text == *caption,
            Trigger::Pattern(pattern) => pattern.is_match(text),
            Trigger::AnyText => true,
        }
    }
}

/// Returns true for the captions that force a return to the main menu from
/// any state.
pub fn is_main_menu_request(text: &str) -> bool {
    text == captions::MAIN_MENU || text == captions::START_COMMAND
}
