use indexmap::IndexMap;

use crate::state::ParticipantId;

/// Pending multipliers, at most one per participant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiplierLedger {
    pending: IndexMap<ParticipantId, f64>,
}

impl MultiplierLedger {
    /// Store a multiplier for `actor`'s next successful attack or heal.
    /// Replaces any unconsumed one.
    pub fn grant(&mut self, actor: &ParticipantId, multiplier: f64) {
        self.pending.insert(actor.clone(), multiplier);
    }

    pub fn pending(&self, actor: &ParticipantId) -> Option<f64> {
        self.pending.get(actor).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Scale `base` by the actor's stored multiplier and clear it.
    ///
    /// Nothing is consumed when the actor has no multiplier or `base <= 0`
    /// (a failed or non-damaging, non-healing action).
    pub fn apply_and_consume(&mut self, actor: &ParticipantId, base: i64) -> (i64, Option<f64>) {
        if base <= 0 {
            return (base, None);
        }
        match self.pending.shift_remove(actor) {
            Some(multiplier) => ((base as f64 * multiplier).round() as i64, Some(multiplier)),
            None => (base, None),
        }
    }

    /// Drop an eliminated participant's entry.
    pub fn forget(&mut self, actor: &ParticipantId) {
        self.pending.shift_remove(actor);
    }
}
