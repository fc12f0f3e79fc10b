//! Ports - interfaces between the dialog core and its collaborators.
//!
//! Ports define the contracts that adapters implement. The application
//! layer depends only on these traits, never on concrete storage, transport
//! or payment implementations.
//!
//! # Entity Ports
//!
//! - `ProfileRepository` - Participant profiles
//! - `ScheduleReader` - Event groups, events and presentations (read-only)
//! - `QuestionRepository` - Questions addressed to speakers
//!
//! # Dialog Ports
//!
//! - `SessionRepository` - Per `(user, chat)` dialog sessions
//!
//! # External Service Ports
//!
//! - `Messenger` - Outbound message delivery
//! - `PaymentGateway` - Invoices and pre-checkout answers

mod messenger;
mod payment_gateway;
mod profile_repository;
mod question_repository;
mod schedule_reader;
mod session_repository;

pub use messenger::{DeliveryError, Messenger};
pub use payment_gateway::{PaymentError, PaymentErrorCode, PaymentGateway};
pub use profile_repository::ProfileRepository;
pub use question_repository::QuestionRepository;
pub use schedule_reader::ScheduleReader;
pub use session_repository::SessionRepository;
