use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::BattleError;
use crate::ledger::MultiplierLedger;

pub const DEFAULT_STARTING_HP: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub label: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, label: impl Into<String>) -> Self {
        Self { id: id.into(), label: label.into() }
    }

    /// A participant whose label is its id.
    pub fn named(name: &str) -> Self {
        Self::new(name, name)
    }
}

/// A validated battle roster: at least two participants, no repeated ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    members: Vec<Participant>,
}

impl Roster {
    pub fn new(members: Vec<Participant>) -> Result<Self, BattleError> {
        let mut seen = HashSet::new();
        for m in &members {
            if !seen.insert(&m.id) {
                return Err(BattleError::DuplicateParticipant(m.id.clone()));
            }
        }
        if members.len() < 2 {
            return Err(BattleError::TooFewParticipants(members.len()));
        }
        Ok(Self { members })
    }

    pub fn members(&self) -> &[Participant] {
        &self.members
    }

    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.members.iter().map(|m| &m.id)
    }

    pub fn label_of<'a>(&'a self, id: &'a ParticipantId) -> &'a str {
        self.members
            .iter()
            .find(|m| &m.id == id)
            .map(|m| m.label.as_str())
            .unwrap_or(id.as_str())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Whether self-heals may push hit points above the starting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealCap {
    #[default]
    Uncapped,
    StartingHp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct BattleSettings {
    pub starting_hp: i64,
    pub heal_cap: HealCap,
    /// Abort with `RoundLimitReached` once this many rounds have run.
    pub round_limit: Option<u32>,
}

impl BattleSettings {
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.starting_hp <= 0 {
            return Err(BattleError::InvalidStartingHp(self.starting_hp));
        }
        Ok(())
    }
}

impl Default for BattleSettings {
    fn default() -> Self {
        Self { starting_hp: DEFAULT_STARTING_HP, heal_cap: HealCap::Uncapped, round_limit: None }
    }
}

/// Mutable state of one running battle. Owned by a single engine call.
#[derive(Debug, Clone)]
pub struct BattleState {
    pub roster: Roster,
    pub hp: IndexMap<ParticipantId, i64>,
    pub ledger: MultiplierLedger,
    pub eliminated: Vec<ParticipantId>,
    pub round: u32,
    settings: BattleSettings,
}

impl BattleState {
    pub fn new(roster: Roster, settings: BattleSettings) -> Self {
        let hp = roster.ids().map(|id| (id.clone(), settings.starting_hp)).collect();
        Self {
            roster,
            hp,
            ledger: MultiplierLedger::default(),
            eliminated: Vec::new(),
            round: 1,
            settings,
        }
    }

    pub fn settings(&self) -> &BattleSettings {
        &self.settings
    }

    pub fn hp_of(&self, id: &ParticipantId) -> i64 {
        self.hp.get(id).copied().unwrap_or(0)
    }

    pub fn is_standing(&self, id: &ParticipantId) -> bool {
        self.hp_of(id) > 0
    }

    pub fn damage(&mut self, id: &ParticipantId, amount: i64) {
        if let Some(hp) = self.hp.get_mut(id) {
            *hp = hp.saturating_sub(amount);
        }
    }

    /// Adds `amount` hit points, honoring the heal cap. Returns the hit points
    /// actually restored.
    pub fn heal(&mut self, id: &ParticipantId, amount: i64) -> i64 {
        let cap = match self.settings.heal_cap {
            HealCap::Uncapped => i64::MAX,
            HealCap::StartingHp => self.settings.starting_hp,
        };
        match self.hp.get_mut(id) {
            Some(hp) => {
                let before = *hp;
                // A cap never lowers hit points already above it.
                *hp = hp.saturating_add(amount).min(cap.max(before));
                *hp - before
            }
            None => 0,
        }
    }

    /// Hit points in roster order, for narration.
    pub fn standings(&self) -> Vec<(ParticipantId, i64)> {
        self.hp.iter().map(|(id, hp)| (id.clone(), *hp)).collect()
    }

    pub fn check_round_limit(&self) -> Result<(), BattleError> {
        match self.settings.round_limit {
            Some(limit) if self.round > limit => {
                tracing::warn!(limit, "battle hit its round limit");
                Err(BattleError::RoundLimitReached(limit))
            }
            _ => Ok(()),
        }
    }

    pub fn into_outcome(self, winner: ParticipantId, rounds: u32) -> BattleOutcome {
        BattleOutcome {
            winner,
            rounds,
            final_hp: self.standings(),
            eliminated: self.eliminated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleOutcome {
    pub winner: ParticipantId,
    pub rounds: u32,
    pub final_hp: Vec<(ParticipantId, i64)>,
    /// Royale only, in elimination order.
    pub eliminated: Vec<ParticipantId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(heal_cap: HealCap) -> BattleState {
        let roster = Roster::new(vec![Participant::named("a"), Participant::named("b")]).unwrap();
        BattleState::new(roster, BattleSettings { heal_cap, ..BattleSettings::default() })
    }

    #[test]
    fn uncapped_heal_goes_past_starting_hp() {
        let mut s = state(HealCap::Uncapped);
        let a = ParticipantId::new("a");
        assert_eq!(s.heal(&a, 30), 30);
        assert_eq!(s.hp_of(&a), 130);
    }

    #[test]
    fn capped_heal_never_lowers_existing_hp() {
        let mut s = state(HealCap::StartingHp);
        let a = ParticipantId::new("a");
        s.hp.insert(a.clone(), 150);
        assert_eq!(s.heal(&a, 10), 0);
        assert_eq!(s.hp_of(&a), 150);

        s.damage(&a, 90);
        assert_eq!(s.heal(&a, 80), 40);
        assert_eq!(s.hp_of(&a), 100);
    }

    #[test]
    fn roster_reports_duplicates_before_size() {
        let err = Roster::new(vec![Participant::named("a"), Participant::named("a")]).unwrap_err();
        assert_eq!(err, BattleError::DuplicateParticipant(ParticipantId::new("a")));
        let err = Roster::new(vec![]).unwrap_err();
        assert_eq!(err, BattleError::TooFewParticipants(0));
    }

    #[test]
    fn labels_fall_back_to_ids() {
        let roster = Roster::new(vec![Participant::new("u1", "Alice"), Participant::named("u2")]).unwrap();
        assert_eq!(roster.label_of(&ParticipantId::new("u1")), "Alice");
        assert_eq!(roster.label_of(&ParticipantId::new("ghost")), "ghost");
    }
}
