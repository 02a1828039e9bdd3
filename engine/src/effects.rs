use crate::action::Action;
use crate::narration::BattleEvent;
use crate::state::{BattleState, ParticipantId};

/// Apply one resolved action to the battle and describe what happened.
///
/// `others` are the living participants other than the actor: the special
/// event hits all of them and a shared heal splashes all of them. Attacks
/// land on `target` only.
pub(crate) fn apply_action(
    state: &mut BattleState,
    actor: &ParticipantId,
    target: &ParticipantId,
    others: &[ParticipantId],
    action: Action,
) -> BattleEvent {
    match action {
        Action::SpecialEvent { name, damage } => {
            for victim in others {
                state.damage(victim, damage);
            }
            BattleEvent::SpecialEvent {
                actor: actor.clone(),
                name,
                damage,
                victims: others.to_vec(),
            }
        }
        Action::GlobalBuff { name, multiplier } => {
            state.ledger.grant(actor, multiplier);
            BattleEvent::Empowered { actor: actor.clone(), name, multiplier, global: true }
        }
        Action::Buff { name, multiplier: Some(multiplier) } => {
            state.ledger.grant(actor, multiplier);
            BattleEvent::Empowered { actor: actor.clone(), name, multiplier, global: false }
        }
        Action::Buff { name, multiplier: None } => {
            BattleEvent::PowerUpFailed { actor: actor.clone(), name }
        }
        Action::Heal { name, amount: Some(base), splash_ratio } => {
            let (amount, consumed) = state.ledger.apply_and_consume(actor, base);
            state.heal(actor, amount);
            let splash = splash_ratio.map(|ratio| (amount as f64 * ratio).round() as i64);
            if let Some(splash) = splash {
                for other in others {
                    state.heal(other, splash);
                }
            }
            BattleEvent::Healed { actor: actor.clone(), name, amount, consumed, splash }
        }
        Action::Heal { name, amount: None, .. } => {
            BattleEvent::HealFailed { actor: actor.clone(), name }
        }
        Action::Attack { name, damage: Some(base) } => {
            let (damage, consumed) = state.ledger.apply_and_consume(actor, base);
            state.damage(target, damage);
            BattleEvent::Hit {
                actor: actor.clone(),
                target: target.clone(),
                name,
                damage,
                consumed,
            }
        }
        Action::Attack { name, damage: None } => {
            BattleEvent::Missed { actor: actor.clone(), target: target.clone(), name }
        }
    }
}
