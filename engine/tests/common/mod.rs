#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use brawl_engine::{Action, ActionSource, BattleError, ParticipantId, Randomness};

pub fn miss() -> Action {
    Action::Attack { name: "wild swing".into(), damage: None }
}

pub fn hit(damage: i64) -> Action {
    Action::Attack { name: "jab".into(), damage: Some(damage) }
}

pub fn heal(amount: i64) -> Action {
    Action::Heal { name: "drinks a potion".into(), amount: Some(amount), splash_ratio: None }
}

pub fn buff(multiplier: f64) -> Action {
    Action::Buff { name: "focus stance".into(), multiplier: Some(multiplier) }
}

pub fn special() -> Action {
    Action::SpecialEvent { name: "summons the forbidden one".into(), damage: 1000 }
}

/// Per-participant queues of actions; an empty queue yields a miss.
/// Records who was asked to act, in order.
#[derive(Default)]
pub struct Script {
    plan: HashMap<ParticipantId, VecDeque<Action>>,
    pub asked: Vec<ParticipantId>,
}

impl Script {
    pub fn with(mut self, actor: &str, actions: Vec<Action>) -> Self {
        self.plan.insert(actor.into(), actions.into());
        self
    }
}

impl ActionSource for Script {
    fn next_action(
        &mut self,
        actor: &ParticipantId,
        _rng: &mut dyn Randomness,
    ) -> Result<Action, BattleError> {
        self.asked.push(actor.clone());
        Ok(self
            .plan
            .get_mut(actor)
            .and_then(|q| q.pop_front())
            .unwrap_or_else(miss))
    }
}

/// The same action for everyone, every turn.
pub struct Always(pub Action);

impl ActionSource for Always {
    fn next_action(
        &mut self,
        _actor: &ParticipantId,
        _rng: &mut dyn Randomness,
    ) -> Result<Action, BattleError> {
        Ok(self.0.clone())
    }
}
