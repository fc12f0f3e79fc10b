//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types and the state machine
//! trait that form the vocabulary of the meetup bot domain.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ChatId, EventGroupId, EventId, PresentationId, ProfileId, QuestionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
