use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, HouseAttack, MoveDefinition, Odds};
use crate::error::{BattleError, CatalogError};
use crate::state::ParticipantId;
use crate::Randomness;

/// What a participant does on one turn. Lives for that turn only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Fixed damage that ignores multipliers.
    SpecialEvent { name: String, damage: i64 },
    /// Always succeeds; stores `multiplier` for the actor.
    GlobalBuff { name: String, multiplier: f64 },
    /// `None` when the buff fizzled.
    Buff { name: String, multiplier: Option<f64> },
    /// `None` when the heal failed. `splash_ratio` is set for shared heals.
    Heal { name: String, amount: Option<i64>, splash_ratio: Option<f64> },
    /// `None` on a miss.
    Attack { name: String, damage: Option<i64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SpecialEvent,
    GlobalBuff,
    Buff,
    Heal,
    Attack,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::SpecialEvent { .. } => ActionKind::SpecialEvent,
            Action::GlobalBuff { .. } => ActionKind::GlobalBuff,
            Action::Buff { .. } => ActionKind::Buff,
            Action::Heal { .. } => ActionKind::Heal,
            Action::Attack { .. } => ActionKind::Attack,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Action::SpecialEvent { name, .. }
            | Action::GlobalBuff { name, .. }
            | Action::Buff { name, .. }
            | Action::Heal { name, .. }
            | Action::Attack { name, .. } => name,
        }
    }

    pub fn succeeded(&self) -> bool {
        match self {
            Action::SpecialEvent { .. } | Action::GlobalBuff { .. } => true,
            Action::Buff { multiplier, .. } => multiplier.is_some(),
            Action::Heal { amount, .. } => amount.is_some(),
            Action::Attack { damage, .. } => damage.is_some(),
        }
    }
}

/// Category picked by the ordinary roll once neither rare check fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Buff,
    Heal,
    Attack,
}

/// Map a draw in `[0, 1)` onto the buff, heal and attack bands, in that order.
pub fn band_for(odds: &Odds, draw: f64) -> Band {
    if draw < odds.buff_chance {
        Band::Buff
    } else if draw < odds.buff_chance + odds.heal_chance {
        Band::Heal
    } else {
        Band::Attack
    }
}

/// Anything that can pick a participant's action for a turn.
pub trait ActionSource {
    fn next_action(
        &mut self,
        actor: &ParticipantId,
        rng: &mut dyn Randomness,
    ) -> Result<Action, BattleError>;

    /// A line the actor says before acting, if any.
    fn taunt(&self, _actor: &ParticipantId) -> Option<String> {
        None
    }
}

impl<S: ActionSource + ?Sized> ActionSource for &mut S {
    fn next_action(
        &mut self,
        actor: &ParticipantId,
        rng: &mut dyn Randomness,
    ) -> Result<Action, BattleError> {
        (**self).next_action(actor, rng)
    }

    fn taunt(&self, actor: &ParticipantId) -> Option<String> {
        (**self).taunt(actor)
    }
}

/// Draws actions from a catalog.
///
/// Checks run in a fixed order, each consuming draws only when reached:
/// special event, global empowerment, then one band draw. Inside a pool the
/// entry index is drawn first, then success (`draw <= success`), then the
/// magnitude if the move landed.
#[derive(Debug, Clone)]
pub struct ActionResolver {
    catalog: Catalog,
}

impl ActionResolver {
    pub fn new(catalog: Catalog) -> Result<Self, CatalogError> {
        catalog.validate()?;
        Ok(Self { catalog })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn resolve_turn(&self, rng: &mut dyn Randomness) -> Result<Action, BattleError> {
        let c = &self.catalog;

        if rng.unit()? < c.special_event.chance {
            return Ok(Action::SpecialEvent {
                name: c.special_event.name.clone(),
                damage: c.special_event.damage,
            });
        }

        if rng.unit()? < c.global_empowerment.chance {
            return Ok(Action::GlobalBuff {
                name: c.global_empowerment.name.clone(),
                multiplier: c.global_empowerment.multiplier,
            });
        }

        match band_for(&c.odds, rng.unit()?) {
            Band::Buff => {
                let (name, multiplier) = roll_from_pool(&c.buffs, rng)?;
                Ok(Action::Buff { name, multiplier })
            }
            Band::Heal => {
                if rng.unit()? < c.shared_heal.weight {
                    let shared = &c.shared_heal;
                    let amount = if rng.unit()? <= shared.success {
                        Some(rng.int_inclusive(shared.range.0, shared.range.1)?)
                    } else {
                        None
                    };
                    Ok(Action::Heal {
                        name: shared.name.clone(),
                        amount,
                        splash_ratio: Some(shared.splash_ratio),
                    })
                } else {
                    let (name, amount) = roll_from_pool(&c.heals, rng)?;
                    Ok(Action::Heal {
                        name,
                        amount: amount.map(whole_points),
                        splash_ratio: None,
                    })
                }
            }
            Band::Attack => {
                let (name, damage) = roll_from_pool(&c.attacks, rng)?;
                Ok(Action::Attack { name, damage: damage.map(whole_points) })
            }
        }
    }
}

/// Pool magnitudes are whole points; halves round away from zero.
fn whole_points(v: f64) -> i64 {
    v.round() as i64
}

impl ActionSource for ActionResolver {
    fn next_action(
        &mut self,
        _actor: &ParticipantId,
        rng: &mut dyn Randomness,
    ) -> Result<Action, BattleError> {
        self.resolve_turn(rng)
    }
}

fn roll_from_pool(
    pool: &[MoveDefinition],
    rng: &mut dyn Randomness,
) -> Result<(String, Option<f64>), BattleError> {
    let m = &pool[rng.index(pool.len())?];
    let magnitude = if rng.unit()? <= m.success {
        Some(rng.uniform(m.range.0, m.range.1)?)
    } else {
        None
    };
    Ok((m.name.clone(), magnitude))
}

/// Makes the house participant fight with its fixed attack every turn.
#[derive(Debug, Clone)]
pub struct HouseRules<S> {
    inner: S,
    house: ParticipantId,
    attack: HouseAttack,
}

impl<S> HouseRules<S> {
    pub fn new(inner: S, house: ParticipantId, attack: HouseAttack) -> Self {
        Self { inner, house, attack }
    }
}

impl<S: ActionSource> ActionSource for HouseRules<S> {
    fn next_action(
        &mut self,
        actor: &ParticipantId,
        rng: &mut dyn Randomness,
    ) -> Result<Action, BattleError> {
        if *actor == self.house {
            return Ok(Action::Attack {
                name: self.attack.name.clone(),
                damage: Some(self.attack.damage),
            });
        }
        self.inner.next_action(actor, rng)
    }

    fn taunt(&self, actor: &ParticipantId) -> Option<String> {
        if *actor == self.house {
            self.attack.taunt.clone()
        } else {
            self.inner.taunt(actor)
        }
    }
}
