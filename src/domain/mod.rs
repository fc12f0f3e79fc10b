//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `meetup` - Profiles, the event program and speaker questions
//! - `dialog` - Dialog states, triggers, session context and messages
//! - `relay` - Cursor semantics of the speaker question queue
//! - `matchmaking` - Candidate selection with per-session exclusions
//! - `survey` - The nested meeting survey
//! - `donation` - Donation amounts, invoices and pre-checkout validation

pub mod dialog;
pub mod donation;
pub mod foundation;
pub mod matchmaking;
pub mod meetup;
pub mod relay;
pub mod survey;
