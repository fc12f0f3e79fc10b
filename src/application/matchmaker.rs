//! Matchmaker: draws meeting candidates from the profiles that completed
//! the survey.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::foundation::{DomainError, ProfileId};
use crate::domain::matchmaking::{pick_candidate, MatchContext, MatchOutcome};
use crate::domain::meetup::Profile;
use crate::ports::ProfileRepository;

/// Result of asking for the next person to meet.
#[derive(Debug, Clone)]
pub enum MatchPick {
    Candidate {
        profile: Profile,
        /// True when everyone had been shown and the round started over.
        round_restarted: bool,
    },
    /// Nobody besides the requester is ready to meet.
    Lonely,
}

pub struct Matchmaker {
    profiles: Arc<dyn ProfileRepository>,
    rng: Mutex<StdRng>,
}

impl Matchmaker {
    pub fn new(profiles: Arc<dyn ProfileRepository>) -> Self {
        Self {
            profiles,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// A matchmaker with reproducible draws.
    pub fn with_seed(profiles: Arc<dyn ProfileRepository>, seed: u64) -> Self {
        Self {
            profiles,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Picks the next candidate for `requester`, updating the exclusion set.
    pub async fn pick(
        &self,
        requester: ProfileId,
        context: &mut MatchContext,
    ) -> Result<MatchPick, DomainError> {
        let ready = self.profiles.list_ready_to_meet().await?;
        let eligible: Vec<ProfileId> = ready.iter().map(|p| p.id).collect();

        let outcome = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            pick_candidate(&eligible, requester, context, &mut *rng)
        };

        tracing::debug!(
            requester = %requester,
            eligible = eligible.len(),
            shown = context.showed_persons.len(),
            outcome = ?outcome,
            "Matchmaking draw"
        );

        Ok(match outcome {
            MatchOutcome::Candidate {
                profile,
                round_restarted,
            } => match ready.into_iter().find(|p| p.id == profile) {
                Some(profile) => MatchPick::Candidate {
                    profile,
                    round_restarted,
                },
                None => MatchPick::Lonely,
            },
            MatchOutcome::Lonely => MatchPick::Lonely,
        })
    }
}
