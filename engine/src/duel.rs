use tracing::{debug, info};

use crate::action::ActionSource;
use crate::effects::apply_action;
use crate::error::BattleError;
use crate::narration::{BattleEvent, Mode};
use crate::state::{BattleOutcome, BattleSettings, BattleState, Participant, Roster};
use crate::Randomness;

/// Run a two-party duel. `a` acts first; turns alternate until one side is
/// at or below zero hit points.
///
/// The round counter advances once per turn. Should both sides ever be down
/// after the same action, the participant who was acting wins.
pub fn run_duel<S: ActionSource>(
    a: Participant,
    b: Participant,
    settings: BattleSettings,
    mut source: S,
    rng: &mut dyn Randomness,
    mut emit: impl FnMut(BattleEvent),
) -> Result<BattleOutcome, BattleError> {
    settings.validate()?;
    let roster = Roster::new(vec![a, b])?;
    let mut attacker = roster.members()[0].id.clone();
    let mut defender = roster.members()[1].id.clone();
    let mut state = BattleState::new(roster, settings);

    info!(%attacker, %defender, starting_hp = settings.starting_hp, "duel started");
    emit(BattleEvent::Started {
        mode: Mode::Duel,
        participants: vec![attacker.clone(), defender.clone()],
        starting_hp: settings.starting_hp,
    });

    while state.is_standing(&attacker) && state.is_standing(&defender) {
        state.check_round_limit()?;
        emit(BattleEvent::Round { round: state.round, actor: Some(attacker.clone()) });

        if let Some(line) = source.taunt(&attacker) {
            emit(BattleEvent::Taunt { actor: attacker.clone(), line });
        }

        let action = source.next_action(&attacker, rng)?;
        debug!(round = state.round, %attacker, kind = ?action.kind(), name = action.name(), "duel action");
        let others = [defender.clone()];
        let event = apply_action(&mut state, &attacker, &defender, &others, action);
        emit(event);
        emit(BattleEvent::HitPoints { standings: state.standings() });

        if !state.is_standing(&attacker) || !state.is_standing(&defender) {
            break;
        }
        std::mem::swap(&mut attacker, &mut defender);
        state.round += 1;
    }

    let winner = if state.is_standing(&defender) && !state.is_standing(&attacker) {
        defender
    } else {
        attacker
    };
    let rounds = state.round;
    info!(%winner, rounds, "duel finished");
    emit(BattleEvent::Finished { winner: winner.clone(), rounds });
    Ok(state.into_outcome(winner, rounds))
}
