use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::action::{ActionResolver, HouseRules};
use crate::catalog::Catalog;
use crate::narration::{render, BattleEvent};
use crate::state::{
    BattleOutcome, BattleSettings, HealCap, Participant, ParticipantId, Roster, DEFAULT_STARTING_HP,
};
use crate::{run_duel, run_royale, Dice};

pub const DEFAULT_ROUND_LIMIT: u32 = 10_000;

/// A participant given either as a bare id or as an id with a display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParticipantSpec {
    Id(String),
    Labeled { id: String, label: String },
}

impl ParticipantSpec {
    fn into_participant(self) -> Participant {
        match self {
            ParticipantSpec::Id(id) => Participant::named(&id),
            ParticipantSpec::Labeled { id, label } => Participant::new(id, label),
        }
    }
}

impl From<&str> for ParticipantSpec {
    fn from(id: &str) -> Self {
        ParticipantSpec::Id(id.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelConfig {
    pub challenger: ParticipantSpec,
    pub opponent: ParticipantSpec,
    /// Inline catalog; wins over `catalog_path` and `catalog_id`.
    #[serde(default)]
    pub catalog: Option<Catalog>,
    #[serde(default)]
    pub catalog_id: Option<String>,
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub starting_hp: Option<i64>,
    #[serde(default)]
    pub heal_cap: HealCap,
    /// Participant id that fights with the catalog's house attack.
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RoyaleConfig {
    pub players: Vec<ParticipantSpec>,
    /// Inline catalog; wins over `catalog_path` and `catalog_id`.
    #[serde(default)]
    pub catalog: Option<Catalog>,
    #[serde(default)]
    pub catalog_id: Option<String>,
    #[serde(default)]
    pub catalog_path: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub starting_hp: Option<i64>,
    #[serde(default)]
    pub heal_cap: HealCap,
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Standing {
    pub id: String,
    pub label: String,
    pub hp: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct BattleReport {
    pub winner: String,
    pub winner_label: String,
    pub rounds: u32,
    pub standings: Vec<Standing>,
    pub eliminated: Vec<String>,
    pub log: Vec<String>,
    pub events: Vec<BattleEvent>,
}

impl BattleReport {
    pub fn special_event_fired(&self) -> bool {
        self.events.iter().any(|e| matches!(e, BattleEvent::SpecialEvent { .. }))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelStats {
    pub samples: u32,
    pub challenger_wins: u32,
    pub opponent_wins: u32,
    pub avg_rounds: f64,
    pub median_rounds: u32,
    pub special_events: u32,
}

pub fn simulate_duel(cfg: DuelConfig) -> Result<BattleReport> {
    let catalog = pick_catalog(cfg.catalog, cfg.catalog_id.as_deref(), cfg.catalog_path.as_deref())?;
    let settings = settings_for(cfg.starting_hp, cfg.heal_cap, cfg.max_rounds);
    let a = cfg.challenger.into_participant();
    let b = cfg.opponent.into_participant();
    let roster = Roster::new(vec![a.clone(), b.clone()])?;

    let house_attack = catalog.house_attack.clone();
    let resolver = ActionResolver::new(catalog)?;
    let mut dice = Dice::from_seed(cfg.seed);
    let mut events = Vec::new();

    let outcome = match (cfg.house, house_attack) {
        (None, _) => run_duel(a, b, settings, resolver, &mut dice, |e| events.push(e))?,
        (Some(house), Some(attack)) => {
            let house = ParticipantId::new(house);
            if !roster.ids().any(|id| *id == house) {
                bail!("house participant '{}' is not in this duel", house);
            }
            let source = HouseRules::new(resolver, house, attack);
            run_duel(a, b, settings, source, &mut dice, |e| events.push(e))?
        }
        (Some(house), None) => bail!("catalog has no house attack for '{}'", house),
    };

    Ok(report(&roster, outcome, events))
}

pub fn simulate_royale(cfg: RoyaleConfig) -> Result<BattleReport> {
    let catalog = pick_catalog(cfg.catalog, cfg.catalog_id.as_deref(), cfg.catalog_path.as_deref())?;
    let settings = settings_for(cfg.starting_hp, cfg.heal_cap, cfg.max_rounds);
    let players: Vec<Participant> =
        cfg.players.into_iter().map(ParticipantSpec::into_participant).collect();
    let roster = Roster::new(players.clone())?;

    let resolver = ActionResolver::new(catalog)?;
    let mut dice = Dice::from_seed(cfg.seed);
    let mut events = Vec::new();
    let outcome = run_royale(players, settings, resolver, &mut dice, |e| events.push(e))?;

    Ok(report(&roster, outcome, events))
}

/// Run `samples` duels; sample `i` uses seed `cfg.seed + i`.
pub fn simulate_duel_many(cfg: DuelConfig, samples: u32) -> Result<DuelStats> {
    let challenger = cfg.challenger.clone().into_participant().id;
    let mut challenger_wins = 0u32;
    let mut special_events = 0u32;
    let mut rounds: Vec<u32> = Vec::with_capacity(samples as usize);

    for i in 0..samples {
        let mut trial = cfg.clone();
        trial.seed = cfg.seed.wrapping_add(u64::from(i));
        let res = simulate_duel(trial)?;
        if res.winner == challenger.as_str() {
            challenger_wins += 1;
        }
        if res.special_event_fired() {
            special_events += 1;
        }
        rounds.push(res.rounds);
    }

    rounds.sort_unstable();
    let avg_rounds = if rounds.is_empty() {
        0.0
    } else {
        rounds.iter().map(|&r| f64::from(r)).sum::<f64>() / rounds.len() as f64
    };
    let median_rounds = match rounds.len() {
        0 => 0,
        n if n % 2 == 1 => rounds[n / 2],
        n => (rounds[n / 2 - 1] + rounds[n / 2]) / 2,
    };

    Ok(DuelStats {
        samples,
        challenger_wins,
        opponent_wins: samples - challenger_wins,
        avg_rounds,
        median_rounds,
        special_events,
    })
}

/// A catalog file wins over a built-in id; with neither, the default catalog.
pub fn load_catalog(id: Option<&str>, path: Option<&str>) -> Result<Catalog> {
    match (path, id) {
        (Some(path), _) => Catalog::load(path),
        (None, Some(id)) => Ok(Catalog::builtin(id)?),
        (None, None) => Ok(Catalog::builtin("default")?),
    }
}

fn pick_catalog(inline: Option<Catalog>, id: Option<&str>, path: Option<&str>) -> Result<Catalog> {
    match inline {
        Some(catalog) => Ok(catalog),
        None => load_catalog(id, path),
    }
}

fn settings_for(starting_hp: Option<i64>, heal_cap: HealCap, max_rounds: Option<u32>) -> BattleSettings {
    BattleSettings {
        starting_hp: starting_hp.unwrap_or(DEFAULT_STARTING_HP),
        heal_cap,
        round_limit: Some(max_rounds.unwrap_or(DEFAULT_ROUND_LIMIT)),
    }
}

fn report(roster: &Roster, outcome: BattleOutcome, events: Vec<BattleEvent>) -> BattleReport {
    let log = events.iter().map(|e| render(e, roster)).collect();
    BattleReport {
        winner_label: roster.label_of(&outcome.winner).to_string(),
        winner: outcome.winner.to_string(),
        rounds: outcome.rounds,
        standings: outcome
            .final_hp
            .iter()
            .map(|(id, hp)| Standing {
                id: id.to_string(),
                label: roster.label_of(id).to_string(),
                hp: *hp,
            })
            .collect(),
        eliminated: outcome.eliminated.iter().map(|id| id.to_string()).collect(),
        log,
        events,
    }
}
