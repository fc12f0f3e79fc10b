//! Candidate selection for the "meet someone new" flow.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ProfileId;

/// Per-session record of the candidates already shown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    /// Grows with every candidate shown until a full-exhaustion reset.
    pub showed_persons: Vec<ProfileId>,
}

impl MatchContext {
    pub fn has_seen(&self, profile: &ProfileId) -> bool {
        self.showed_persons.contains(profile)
    }

    pub fn record(&mut self, profile: ProfileId) {
        self.showed_persons.push(profile);
    }

    pub fn reset(&mut self) {
        self.showed_persons.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.showed_persons.is_empty()
    }
}

/// Result of a single draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    /// An unseen eligible profile.
    Candidate(ProfileId),
    /// No one other than the requester has ever been eligible.
    Empty,
    /// Every eligible profile has already been shown.
    Exhausted,
}

/// Result of a full pick, after the exhaustion reset has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Candidate {
        profile: ProfileId,
        /// True when the exclusion set was cleared before this draw.
        round_restarted: bool,
    },
    /// Nobody to show; the requester should wait for new candidates.
    Lonely,
}

/// Draws one profile uniformly from `eligible` minus the requester and the
/// exclusion set. Does not modify the context.
pub fn draw_candidate<R: Rng + ?Sized>(
    eligible: &[ProfileId],
    requester: ProfileId,
    context: &MatchContext,
    rng: &mut R,
) -> Draw {
    let pool: Vec<ProfileId> = eligible
        .iter()
        .copied()
        .filter(|id| *id != requester && !context.has_seen(id))
        .collect();

    match pool.choose(rng) {
        Some(id) => Draw::Candidate(*id),
        None if context.is_empty() => Draw::Empty,
        None => Draw::Exhausted,
    }
}

/// Picks the next candidate, recording it in the exclusion set.
///
/// When everyone has been shown, the set is cleared and the draw retried
/// once. A second miss means the requester is the only eligible person.
pub fn pick_candidate<R: Rng + ?Sized>(
    eligible: &[ProfileId],
    requester: ProfileId,
    context: &mut MatchContext,
    rng: &mut R,
) -> MatchOutcome {
    let mut round_restarted = false;
    let mut draw = draw_candidate(eligible, requester, context, rng);
    if draw == Draw::Exhausted {
        context.reset();
        round_restarted = true;
        draw = draw_candidate(eligible, requester, context, rng);
    }

    match draw {
        Draw::Candidate(profile) => {
            context.record(profile);
            MatchOutcome::Candidate {
                profile,
                round_restarted,
            }
        }
        Draw::Empty | Draw::Exhausted => MatchOutcome::Lonely,
    }
}
