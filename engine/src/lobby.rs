//! Admission control for battles.
//!
//! The engines never look at this: a host keeps one `Lobby`, admits
//! participants through it before starting a duel or royale, and releases
//! the returned [`Reservation`] once the battle has finished.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

use crate::state::ParticipantId;

pub const DEFAULT_CHALLENGE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    #[error("you can't challenge yourself")]
    SelfChallenge,
    #[error("{0} is already in a battle or has a pending challenge")]
    Busy(ParticipantId),
    #[error("cannot start: these participants are busy: {}", join(.0))]
    RosterBusy(Vec<ParticipantId>),
    #[error("{0} has no pending challenge")]
    NoPendingChallenge(ParticipantId),
    #[error("the challenge was issued in '{expected}', not here")]
    WrongVenue { expected: String },
    #[error("the challenge is no longer valid")]
    ChallengeWithdrawn,
}

fn join(ids: &[ParticipantId]) -> String {
    ids.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub challenger: ParticipantId,
    pub venue: String,
    pub expires_at: Instant,
}

/// Participants held for one battle. Hand it back to [`Lobby::release`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a reservation keeps its participants busy until released"]
pub struct Reservation {
    members: Vec<ParticipantId>,
}

impl Reservation {
    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }
}

#[derive(Debug)]
pub struct Lobby {
    active: HashSet<ParticipantId>,
    pending_by_target: HashMap<ParticipantId, Challenge>,
    pending_by_challenger: HashMap<ParticipantId, ParticipantId>,
    timeout: Duration,
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(DEFAULT_CHALLENGE_TIMEOUT)
    }
}

impl Lobby {
    pub fn new(timeout: Duration) -> Self {
        Self {
            active: HashSet::new(),
            pending_by_target: HashMap::new(),
            pending_by_challenger: HashMap::new(),
            timeout,
        }
    }

    /// In a battle, or has sent or received a pending challenge.
    pub fn is_busy(&self, id: &ParticipantId) -> bool {
        self.active.contains(id)
            || self.pending_by_target.contains_key(id)
            || self.pending_by_challenger.contains_key(id)
    }

    pub fn pending_for(&self, target: &ParticipantId) -> Option<&Challenge> {
        self.pending_by_target.get(target)
    }

    pub fn challenge(
        &mut self,
        challenger: &ParticipantId,
        target: &ParticipantId,
        venue: &str,
        now: Instant,
    ) -> Result<(), AdmissionError> {
        if challenger == target {
            return Err(AdmissionError::SelfChallenge);
        }
        for id in [challenger, target] {
            self.expire_involving(id, now);
        }
        for id in [challenger, target] {
            if self.is_busy(id) {
                return Err(AdmissionError::Busy(id.clone()));
            }
        }

        self.pending_by_target.insert(
            target.clone(),
            Challenge {
                challenger: challenger.clone(),
                venue: venue.to_string(),
                expires_at: now + self.timeout,
            },
        );
        self.pending_by_challenger.insert(challenger.clone(), target.clone());
        debug!(%challenger, %target, venue, "challenge issued");
        Ok(())
    }

    /// Accept the pending challenge addressed to `target`, reserving both sides.
    /// The reservation lists the challenger first, as the duel's opening attacker.
    pub fn accept(
        &mut self,
        target: &ParticipantId,
        venue: &str,
        now: Instant,
    ) -> Result<Reservation, AdmissionError> {
        self.expire_if_needed(target, now);
        let challenge = self
            .pending_by_target
            .get(target)
            .cloned()
            .ok_or_else(|| AdmissionError::NoPendingChallenge(target.clone()))?;
        if challenge.venue != venue {
            return Err(AdmissionError::WrongVenue { expected: challenge.venue });
        }

        let challenger = challenge.challenger;
        self.pending_by_target.remove(target);
        let still_ours = self.pending_by_challenger.get(&challenger) == Some(target);
        if still_ours {
            self.pending_by_challenger.remove(&challenger);
        }
        if !still_ours && self.is_busy(&challenger) {
            return Err(AdmissionError::ChallengeWithdrawn);
        }

        Ok(self.lock(vec![challenger, target.clone()]))
    }

    /// Decline the pending challenge addressed to `target`; returns who sent it.
    pub fn decline(
        &mut self,
        target: &ParticipantId,
        now: Instant,
    ) -> Result<ParticipantId, AdmissionError> {
        self.expire_if_needed(target, now);
        let challenge = self
            .pending_by_target
            .remove(target)
            .ok_or_else(|| AdmissionError::NoPendingChallenge(target.clone()))?;
        if self.pending_by_challenger.get(&challenge.challenger) == Some(target) {
            self.pending_by_challenger.remove(&challenge.challenger);
        }
        Ok(challenge.challenger)
    }

    /// Reserve a whole royale roster, or report every busy member.
    pub fn reserve(
        &mut self,
        roster: &[ParticipantId],
        now: Instant,
    ) -> Result<Reservation, AdmissionError> {
        for id in roster {
            self.expire_involving(id, now);
        }
        let busy: Vec<ParticipantId> =
            roster.iter().filter(|id| self.is_busy(id)).cloned().collect();
        if !busy.is_empty() {
            return Err(AdmissionError::RosterBusy(busy));
        }
        Ok(self.lock(roster.to_vec()))
    }

    pub fn release(&mut self, reservation: Reservation) {
        for id in &reservation.members {
            self.active.remove(id);
        }
    }

    fn lock(&mut self, members: Vec<ParticipantId>) -> Reservation {
        self.active.extend(members.iter().cloned());
        Reservation { members }
    }

    /// Expire stale challenges `id` has received or sent.
    fn expire_involving(&mut self, id: &ParticipantId, now: Instant) {
        self.expire_if_needed(id, now);
        if let Some(target) = self.pending_by_challenger.get(id).cloned() {
            self.expire_if_needed(&target, now);
        }
    }

    fn expire_if_needed(&mut self, target: &ParticipantId, now: Instant) {
        let expired = self
            .pending_by_target
            .get(target)
            .is_some_and(|c| now >= c.expires_at);
        if !expired {
            return;
        }
        if let Some(challenge) = self.pending_by_target.remove(target) {
            if self.pending_by_challenger.get(&challenge.challenger) == Some(target) {
                self.pending_by_challenger.remove(&challenge.challenger);
            }
            debug!(%target, challenger = %challenge.challenger, "challenge expired");
        }
    }
}
