//! Meetup entities.
//!
//! Profiles, the event program and the questions asked to speakers. These
//! are owned by the storage collaborator; the dialog only references them.

mod profile;
mod question;
mod schedule;

pub use profile::{MessengerIdentity, Profile, SurveyAnswers};
pub use question::QuestionRecord;
pub use schedule::{Event, EventGroup, Presentation};
