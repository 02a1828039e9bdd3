use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod action;
pub mod api;
pub mod catalog;
pub mod content;
pub mod duel;
mod effects;
pub mod error;
pub mod ledger;
pub mod lobby;
pub mod narration;
pub mod royale;
pub mod state;

pub use action::{Action, ActionKind, ActionResolver, ActionSource, Band, HouseRules};
pub use catalog::{Catalog, MoveDefinition, Odds};
pub use duel::run_duel;
pub use error::{BattleError, CatalogError};
pub use ledger::MultiplierLedger;
pub use narration::{BattleEvent, render};
pub use royale::run_royale;
pub use state::{BattleOutcome, BattleSettings, HealCap, Participant, ParticipantId, Roster};

/// Source of uniform draws for the resolver and the engines.
///
/// Only `unit` is required; the samplers are built on top of it so a
/// scripted source controls every decision a battle makes.
pub trait Randomness {
    /// A uniform draw in `[0, 1)`.
    fn unit(&mut self) -> Result<f64, BattleError>;

    /// Uniform float in `[lo, hi]`.
    fn uniform(&mut self, lo: f64, hi: f64) -> Result<f64, BattleError> {
        Ok(lo + self.unit()? * (hi - lo))
    }

    /// Uniform integer in `lo..=hi`.
    fn int_inclusive(&mut self, lo: i64, hi: i64) -> Result<i64, BattleError> {
        if hi <= lo {
            return Ok(lo);
        }
        let span = (hi - lo + 1) as f64;
        let offset = (self.unit()? * span).floor() as i64;
        Ok(lo + offset.min(hi - lo))
    }

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> Result<usize, BattleError> {
        let i = (self.unit()? * len as f64).floor() as usize;
        Ok(i.min(len.saturating_sub(1)))
    }
}

/// Fisher-Yates shuffle driven by `rng.index`.
pub fn shuffle<T, R: Randomness + ?Sized>(rng: &mut R, items: &mut [T]) -> Result<(), BattleError> {
    for i in (1..items.len()).rev() {
        let j = rng.index(i + 1)?;
        items.swap(i, j);
    }
    Ok(())
}

/// Seeded ChaCha8 source; identical seeds replay identical battles.
pub struct Dice {
    rng: ChaCha8Rng,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }
}

impl Randomness for Dice {
    fn unit(&mut self) -> Result<f64, BattleError> {
        Ok(self.rng.gen_range(0.0..1.0))
    }
}

/// Replays a fixed list of unit draws, then reports exhaustion.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    draws: VecDeque<f64>,
}

impl ScriptedDice {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self { draws: draws.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl Randomness for ScriptedDice {
    fn unit(&mut self) -> Result<f64, BattleError> {
        let value = self.draws.pop_front().ok_or(BattleError::RandomnessExhausted)?;
        if !(0.0..1.0).contains(&value) {
            return Err(BattleError::DrawOutOfRange(value));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_inclusive_reaches_both_ends() {
        let mut dice = ScriptedDice::new([0.0, 0.999]);
        assert_eq!(dice.int_inclusive(25, 40).unwrap(), 25);
        assert_eq!(dice.int_inclusive(25, 40).unwrap(), 40);
    }

    #[test]
    fn degenerate_range_takes_no_draw() {
        let mut dice = ScriptedDice::new([]);
        assert_eq!(dice.int_inclusive(7, 7).unwrap(), 7);
    }

    #[test]
    fn shuffle_with_high_draws_keeps_order() {
        let mut dice = ScriptedDice::new([0.99, 0.99, 0.99]);
        let mut items = ['a', 'b', 'c', 'd'];
        shuffle(&mut dice, &mut items).unwrap();
        assert_eq!(items, ['a', 'b', 'c', 'd']);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn shuffle_with_zero_draws_rotates() {
        // i=3 swaps 3<->0, i=2 swaps 2<->0, i=1 swaps 1<->0
        let mut dice = ScriptedDice::new([0.0, 0.0, 0.0]);
        let mut items = ['a', 'b', 'c', 'd'];
        shuffle(&mut dice, &mut items).unwrap();
        assert_eq!(items, ['b', 'c', 'd', 'a']);
    }

    #[test]
    fn seeded_dice_replay() {
        let mut a = Dice::from_seed(42);
        let mut b = Dice::from_seed(42);
        for _ in 0..16 {
            assert_eq!(a.unit().unwrap(), b.unit().unwrap());
        }
    }
}
