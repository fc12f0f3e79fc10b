//! Dialog domain module.
//!
//! States, triggers, per-session context and the messages exchanged with
//! the transport. The engine that drives them lives in the application
//! layer.

mod context;
mod error;
mod message;
mod paginator;
mod session;
mod state;
mod step;
mod trigger;

pub use context::{
    AnswerContext, AskContext, DonateContext, FlowContext, ProgramContext, SessionContext,
};
pub use error::DialogError;
pub use message::{Keyboard, OutboundMessage, TextStyle};
pub use paginator::paginate;
pub use session::{Session, SessionKey};
pub use state::DialogState;
pub use step::{Notification, Reply, Step};
pub use trigger::{captions, is_main_menu_request, Trigger, EVENT_CAPTION};
