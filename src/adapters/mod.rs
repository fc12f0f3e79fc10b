//! Adapters - Implementations of port interfaces.
//!
//! - `memory` - In-memory repositories and the YAML schedule seed
//! - `messaging` - Console and recording messengers
//! - `payment` - Console and mock payment gateways

pub mod memory;
pub mod messaging;
pub mod payment;

pub use memory::{
    InMemoryProfileRepository, InMemoryQuestionRepository, InMemoryScheduleReader,
    InMemorySessionRepository, ScheduleSeed, SeedError,
};
pub use messaging::{ConsoleMessenger, RecordingMessenger};
pub use payment::{ConsolePaymentGateway, MockPaymentGateway};
