//! In-memory repositories.
//!
//! Used by the console demo and by tests. Everything lives behind
//! `tokio::sync::RwLock`; cloning a repository shares the same data.

mod profile_repository;
mod question_repository;
mod schedule_reader;
mod seed;
mod session_repository;

pub use profile_repository::InMemoryProfileRepository;
pub use question_repository::InMemoryQuestionRepository;
pub use schedule_reader::InMemoryScheduleReader;
pub use seed::{ScheduleSeed, SeedError};
pub use session_repository::InMemorySessionRepository;
