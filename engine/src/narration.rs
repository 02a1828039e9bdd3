use serde::Serialize;

use crate::state::{ParticipantId, Roster};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Duel,
    Royale,
}

/// One narration record. Engines emit these in the exact order the battle
/// produced them; renderers may delay them but must not reorder them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    Started {
        mode: Mode,
        participants: Vec<ParticipantId>,
        starting_hp: i64,
    },
    /// Duels name the acting participant; royale rounds do not.
    Round {
        round: u32,
        actor: Option<ParticipantId>,
    },
    Taunt {
        actor: ParticipantId,
        line: String,
    },
    SpecialEvent {
        actor: ParticipantId,
        name: String,
        damage: i64,
        victims: Vec<ParticipantId>,
    },
    Empowered {
        actor: ParticipantId,
        name: String,
        multiplier: f64,
        global: bool,
    },
    PowerUpFailed {
        actor: ParticipantId,
        name: String,
    },
    Healed {
        actor: ParticipantId,
        name: String,
        amount: i64,
        consumed: Option<f64>,
        /// Hit points given to every other living participant.
        splash: Option<i64>,
    },
    HealFailed {
        actor: ParticipantId,
        name: String,
    },
    Hit {
        actor: ParticipantId,
        target: ParticipantId,
        name: String,
        damage: i64,
        consumed: Option<f64>,
    },
    Missed {
        actor: ParticipantId,
        target: ParticipantId,
        name: String,
    },
    HitPoints {
        standings: Vec<(ParticipantId, i64)>,
    },
    Eliminated {
        participant: ParticipantId,
        remaining: usize,
    },
    Finished {
        winner: ParticipantId,
        rounds: u32,
    },
}

/// Render an event as a single log line, using roster labels for names.
pub fn render(event: &BattleEvent, roster: &Roster) -> String {
    let name = |id: &ParticipantId| roster.label_of(id).to_string();
    let names = |ids: &[ParticipantId]| ids.iter().map(|id| name(id)).collect::<Vec<_>>().join(", ");

    match event {
        BattleEvent::Started { mode: Mode::Duel, participants, starting_hp } => format!(
            "[START] Duel: {}, both at {} HP",
            participants.iter().map(|id| name(id)).collect::<Vec<_>>().join(" vs "),
            starting_hp
        ),
        BattleEvent::Started { mode: Mode::Royale, participants, starting_hp } => format!(
            "[START] Royale ({} players): {}, all at {} HP",
            participants.len(),
            names(participants),
            starting_hp
        ),
        BattleEvent::Round { round, actor: Some(actor) } => {
            format!("[ROUND] {} → {}", round, name(actor))
        }
        BattleEvent::Round { round, actor: None } => format!("[ROUND] {}", round),
        BattleEvent::Taunt { actor, line } => format!("[TAUNT][{}] {}", name(actor), line),
        BattleEvent::SpecialEvent { actor, name: move_name, damage, victims } => format!(
            "[SPECIAL][{}] {} → {} damage to {}",
            name(actor),
            move_name,
            damage,
            names(victims)
        ),
        BattleEvent::Empowered { actor, name: move_name, multiplier, global } => {
            if *global {
                format!("[BUFF][{}] {} → next move ×{:.0}", name(actor), move_name, multiplier)
            } else {
                format!("[BUFF][{}] {} → next move ×{:.2}", name(actor), move_name, multiplier)
            }
        }
        BattleEvent::PowerUpFailed { actor, name: move_name } => {
            format!("[BUFF][{}] {} → FIZZLE", name(actor), move_name)
        }
        BattleEvent::Healed { actor, name: move_name, amount, consumed, splash } => {
            let mut line = format!(
                "[HEAL][{}] {} → +{} HP{}",
                name(actor),
                move_name,
                amount,
                buff_suffix(*consumed)
            );
            if let Some(splash) = splash {
                line.push_str(&format!(" | everyone else +{} HP", splash));
            }
            line
        }
        BattleEvent::HealFailed { actor, name: move_name } => {
            format!("[HEAL][{}] {} → FAIL", name(actor), move_name)
        }
        BattleEvent::Hit { actor, target, name: move_name, damage, consumed } => format!(
            "[ATTACK][{}] {} → {} HIT {}{}",
            name(actor),
            move_name,
            name(target),
            damage,
            buff_suffix(*consumed)
        ),
        BattleEvent::Missed { actor, target, name: move_name } => format!(
            "[ATTACK][{}] {} → {} MISS",
            name(actor),
            move_name,
            name(target)
        ),
        BattleEvent::HitPoints { standings } => {
            let bars = standings
                .iter()
                .map(|(id, hp)| {
                    if *hp <= 0 {
                        format!("{} {} (KO)", name(id), hp)
                    } else {
                        format!("{} {}", name(id), hp)
                    }
                })
                .collect::<Vec<_>>()
                .join(" | ");
            format!("[HP] {}", bars)
        }
        BattleEvent::Eliminated { participant, remaining } => {
            format!("[KO][{}] eliminated ({} remaining)", name(participant), remaining)
        }
        BattleEvent::Finished { winner, rounds } => {
            format!("[END] winner={} rounds={}", name(winner), rounds)
        }
    }
}

fn buff_suffix(consumed: Option<f64>) -> String {
    match consumed {
        Some(m) => format!(" (buff ×{:.2})", m),
        None => String::new(),
    }
}
