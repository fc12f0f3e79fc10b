//! Dialog handlers, one per flow.
//!
//! Each handler owns the collaborators its flow needs and turns one trigger
//! into a [`Step`](crate::domain::dialog::Step). Handlers never persist the
//! session; the dispatcher does that once the step is committed.

mod answer_question;
mod ask_question;
mod donate;
mod main_menu;
mod meet;
mod program;
mod survey;

pub use answer_question::AnswerQuestionHandler;
pub use ask_question::AskQuestionHandler;
pub use donate::{DonateHandler, InvoiceTemplate};
pub use main_menu::{MainMenuHandler, MENU_PROMPT};
pub use meet::MeetHandler;
pub use program::ProgramHandler;
pub use survey::SurveyHandler;

use crate::domain::dialog::{captions, Keyboard};

/// Choice keyboard with a trailing `Back` / `Main menu` row.
pub(crate) fn choices_with_back<I, S>(items: I, columns: usize) -> Keyboard
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Keyboard::from_captions(items, columns).with_row([captions::BACK, captions::MAIN_MENU])
}

/// Keyboard for free-text steps: only the way out.
pub(crate) fn free_text_keyboard() -> Keyboard {
    Keyboard::single(captions::MAIN_MENU)
}

/// Action buttons on one row, `Main menu` below.
pub(crate) fn actions(buttons: &[&str]) -> Keyboard {
    Keyboard::default()
        .with_row(buttons.iter().copied())
        .with_row([captions::MAIN_MENU])
}
