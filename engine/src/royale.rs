use tracing::{debug, info};

use crate::action::ActionSource;
use crate::effects::apply_action;
use crate::error::BattleError;
use crate::narration::{BattleEvent, Mode};
use crate::state::{BattleOutcome, BattleSettings, BattleState, Participant, ParticipantId, Roster};
use crate::{Randomness, shuffle};

/// Run a free-for-all until one participant is left.
///
/// Each round shuffles the survivors into a turn order. On its turn a
/// survivor draws a random living opponent as its target, then its action.
/// Anyone at or below zero hit points after an action is out at once and
/// neither acts nor is targeted for the rest of the battle.
pub fn run_royale<S: ActionSource>(
    roster: Vec<Participant>,
    settings: BattleSettings,
    mut source: S,
    rng: &mut dyn Randomness,
    mut emit: impl FnMut(BattleEvent),
) -> Result<BattleOutcome, BattleError> {
    settings.validate()?;
    let roster = Roster::new(roster)?;
    let mut alive: Vec<ParticipantId> = roster.ids().cloned().collect();
    let mut state = BattleState::new(roster, settings);

    info!(players = alive.len(), starting_hp = settings.starting_hp, "royale started");
    emit(BattleEvent::Started {
        mode: Mode::Royale,
        participants: alive.clone(),
        starting_hp: settings.starting_hp,
    });

    while alive.len() > 1 {
        state.check_round_limit()?;
        emit(BattleEvent::Round { round: state.round, actor: None });

        shuffle(rng, &mut alive)?;
        let order = alive.clone();

        for actor in &order {
            if !alive.contains(actor) {
                continue;
            }
            let others: Vec<ParticipantId> =
                alive.iter().filter(|id| *id != actor).cloned().collect();
            if others.is_empty() {
                break;
            }
            let target = others[rng.index(others.len())?].clone();

            let action = source.next_action(actor, rng)?;
            debug!(round = state.round, %actor, %target, kind = ?action.kind(), name = action.name(), "royale action");
            let event = apply_action(&mut state, actor, &target, &others, action);
            emit(event);
            emit(BattleEvent::HitPoints { standings: state.standings() });

            let fallen: Vec<ParticipantId> =
                alive.iter().filter(|id| !state.is_standing(id)).cloned().collect();
            for id in fallen {
                alive.retain(|other| *other != id);
                state.ledger.forget(&id);
                debug!(participant = %id, remaining = alive.len(), "eliminated");
                emit(BattleEvent::Eliminated { participant: id.clone(), remaining: alive.len() });
                state.eliminated.push(id);
            }

            if alive.len() <= 1 {
                break;
            }
        }

        if alive.len() <= 1 {
            break;
        }
        state.round += 1;
    }

    let winner = alive.into_iter().next().ok_or(BattleError::NoSurvivors)?;
    let rounds = state.round;
    info!(%winner, rounds, "royale finished");
    emit(BattleEvent::Finished { winner: winner.clone(), rounds });
    Ok(state.into_outcome(winner, rounds))
}
