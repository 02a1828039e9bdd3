use thiserror::Error;

use crate::state::ParticipantId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    #[error("a battle needs at least 2 participants, got {0}")]
    TooFewParticipants(usize),
    #[error("participant '{0}' appears more than once in the roster")]
    DuplicateParticipant(ParticipantId),
    #[error("randomness source exhausted")]
    RandomnessExhausted,
    #[error("randomness source produced {0}, expected a value in [0, 1)")]
    DrawOutOfRange(f64),
    #[error("starting hit points must be positive, got {0}")]
    InvalidStartingHp(i64),
    #[error("battle aborted after {0} rounds without a winner")]
    RoundLimitReached(u32),
    #[error("battle ended with no participant standing")]
    NoSurvivors,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("the {0} pool is empty")]
    EmptyPool(&'static str),
    #[error("move '{name}' has an inverted range ({lo} > {hi})")]
    InvertedRange { name: String, lo: f64, hi: f64 },
    #[error("'{name}' has magnitude {value}, expected zero or more")]
    NegativeMagnitude { name: String, value: f64 },
    #[error("'{name}' has multiplier {value}, expected a positive value")]
    NonPositiveMultiplier { name: String, value: f64 },
    #[error("'{name}' has probability {value}, expected a value in [0, 1]")]
    BadProbability { name: String, value: f64 },
    #[error("buff and heal chances sum to {0}, leaving no room for attacks")]
    BandsOverflow(f64),
    #[error("unknown built-in catalog '{0}'")]
    UnknownBuiltin(String),
    #[error("invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
