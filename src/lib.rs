//! Meetup Bot - conversational dispatcher for meetup attendees
//!
//! Routes each user's messages through a per-session state machine: the
//! event program, questions to speakers, speaker answers, donations and
//! meeting other participants.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
