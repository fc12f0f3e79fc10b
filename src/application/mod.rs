//! Application layer - the dialog engine, its handlers and the dispatcher.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! The dispatcher is the entry point: it serializes events per session,
//! runs the engine and hands the results to the messenger.

pub mod dispatcher;
pub mod engine;
pub mod handlers;
pub mod matchmaker;
pub mod question_relay;
pub mod session_store;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatcher::{DispatchError, DispatchReport, Dispatcher, InboundEvent};
pub use engine::{Collaborators, DialogEngine, EngineSettings, FALLBACK_PROMPT};
pub use handlers::InvoiceTemplate;
pub use matchmaker::{MatchPick, Matchmaker};
pub use question_relay::{QuestionRelay, RelayedAnswer};
pub use session_store::{LonelyUserSlot, SessionStore};
