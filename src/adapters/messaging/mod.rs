//! Messenger adapters.

mod console;
mod recording;

pub use console::{render, ConsoleMessenger};
pub use recording::RecordingMessenger;
