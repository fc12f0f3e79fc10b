//! Errors raised by dialog handlers.
//!
//! Only `Collaborator` escapes the engine. The other variants are recovered
//! locally: missing context and lookup misses return the user to the main
//! menu, invalid input re-prompts in the same state.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ValidationError};

#[derive(Debug, Clone, Error)]
pub enum DialogError {
    /// A handler expected context the session no longer carries.
    #[error("Missing {0} context")]
    MissingContext(&'static str),

    /// A referenced entity no longer exists.
    #[error("Lookup miss: {0}")]
    LookupMiss(String),

    /// The user's input cannot be accepted; ask again.
    #[error("Invalid input: {prompt}")]
    InvalidInput { prompt: String },

    /// A storage or transport collaborator failed.
    #[error("Collaborator failure: {0}")]
    Collaborator(DomainError),
}

impl DialogError {
    pub fn lookup_miss(what: impl Into<String>) -> Self {
        DialogError::LookupMiss(what.into())
    }

    pub fn invalid_input(prompt: impl Into<String>) -> Self {
        DialogError::InvalidInput {
            prompt: prompt.into(),
        }
    }

    /// Returns true if the engine recovers by returning to the main menu.
    pub fn resets_to_main_menu(&self) -> bool {
        matches!(self, DialogError::MissingContext(_) | DialogError::LookupMiss(_))
    }
}

impl From<DomainError> for DialogError {
    fn from(err: DomainError) -> Self {
        if err.is_not_found() {
            DialogError::LookupMiss(err.message)
        } else {
            DialogError::Collaborator(err)
        }
    }
}

impl From<ValidationError> for DialogError {
    fn from(err: ValidationError) -> Self {
        DialogError::invalid_input(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn not_found_domain_error_becomes_lookup_miss() {
        let err: DialogError = DomainError::new(ErrorCode::EventNotFound, "event gone").into();
        assert!(matches!(err, DialogError::LookupMiss(ref m) if m == "event gone"));
        assert!(err.resets_to_main_menu());
    }

    #[test]
    fn storage_error_stays_collaborator_failure() {
        let err: DialogError = DomainError::storage("connection lost").into();
        assert!(matches!(err, DialogError::Collaborator(_)));
        assert!(!err.resets_to_main_menu());
    }

    #[test]
    fn validation_error_becomes_reprompt() {
        let err: DialogError = ValidationError::empty_field("name").into();
        assert!(matches!(err, DialogError::InvalidInput { .. }));
    }
}
