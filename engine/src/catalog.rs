use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::content::builtin_catalogs;
use crate::error::CatalogError;

/// One pool entry: picked uniformly, then succeeds with `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDefinition {
    pub name: String,
    /// Inclusive magnitude range.
    pub range: (f64, f64),
    pub success: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    pub name: String,
    pub damage: i64,
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalEmpowerment {
    pub name: String,
    pub multiplier: f64,
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedHeal {
    pub name: String,
    pub range: (i64, i64),
    pub success: f64,
    /// Fraction of the final self-heal given to everyone else.
    pub splash_ratio: f64,
    /// Share of heal rolls that become this heal.
    pub weight: f64,
}

/// The bot's own fixed attack when it takes a duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseAttack {
    pub name: String,
    pub damage: i64,
    #[serde(default)]
    pub taunt: Option<String>,
}

/// Category bands for the ordinary roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Odds {
    pub buff_chance: f64,
    pub heal_chance: f64,
}

impl Odds {
    /// Whatever the buff and heal bands leave over.
    pub fn attack_chance(&self) -> f64 {
        1.0 - self.buff_chance - self.heal_chance
    }
}

impl Default for Odds {
    fn default() -> Self {
        Self { buff_chance: 0.10, heal_chance: 0.15 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub odds: Odds,
    pub special_event: SpecialEvent,
    pub global_empowerment: GlobalEmpowerment,
    pub shared_heal: SharedHeal,
    pub attacks: Vec<MoveDefinition>,
    pub heals: Vec<MoveDefinition>,
    pub buffs: Vec<MoveDefinition>,
    #[serde(default)]
    pub house_attack: Option<HouseAttack>,
}

impl Catalog {
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(text)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn builtin(id: &str) -> Result<Self, CatalogError> {
        let (text, yaml) = builtin_catalogs()
            .get(id)
            .copied()
            .ok_or_else(|| CatalogError::UnknownBuiltin(id.to_string()))?;
        if yaml {
            Self::from_yaml_str(text)
        } else {
            Self::from_json_str(text)
        }
    }

    /// Parse catalog text read from `path`, picking the format by extension.
    pub fn from_text(text: &str, path: &Path) -> Result<Self, CatalogError> {
        if is_yaml_path(path) {
            Self::from_yaml_str(text)
        } else {
            Self::from_json_str(text)
        }
    }

    /// Load a catalog file; `.yaml`/`.yml` parse as YAML, anything else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog: {}", path.display()))?;
        Self::from_text(&text, path)
            .with_context(|| format!("failed to parse catalog: {}", path.display()))
    }

    /// Odds are probabilities and ranges are ordered. Damage and heal
    /// magnitudes never go below zero; multipliers stay positive.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (label, pool) in [("attack", &self.attacks), ("heal", &self.heals), ("buff", &self.buffs)] {
            if pool.is_empty() {
                return Err(CatalogError::EmptyPool(label));
            }
            for m in pool {
                check_probability(&m.name, m.success)?;
                if m.range.0 > m.range.1 {
                    return Err(CatalogError::InvertedRange {
                        name: m.name.clone(),
                        lo: m.range.0,
                        hi: m.range.1,
                    });
                }
                if label == "buff" {
                    check_multiplier(&m.name, m.range.0)?;
                } else {
                    check_magnitude(&m.name, m.range.0)?;
                }
            }
        }

        let shared = &self.shared_heal;
        if shared.range.0 > shared.range.1 {
            return Err(CatalogError::InvertedRange {
                name: shared.name.clone(),
                lo: shared.range.0 as f64,
                hi: shared.range.1 as f64,
            });
        }
        check_magnitude(&shared.name, shared.range.0 as f64)?;
        check_probability(&shared.name, shared.success)?;
        check_probability(&shared.name, shared.weight)?;
        check_probability(&shared.name, shared.splash_ratio)?;
        check_probability(&self.special_event.name, self.special_event.chance)?;
        check_probability(&self.global_empowerment.name, self.global_empowerment.chance)?;
        check_magnitude(&self.special_event.name, self.special_event.damage as f64)?;
        check_multiplier(&self.global_empowerment.name, self.global_empowerment.multiplier)?;
        if let Some(house) = &self.house_attack {
            check_magnitude(&house.name, house.damage as f64)?;
        }
        check_probability("buff_chance", self.odds.buff_chance)?;
        check_probability("heal_chance", self.odds.heal_chance)?;

        let used = self.odds.buff_chance + self.odds.heal_chance;
        if used > 1.0 {
            return Err(CatalogError::BandsOverflow(used));
        }
        Ok(())
    }
}

fn is_yaml_path(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("yaml") | Some("yml"))
}

fn check_probability(name: &str, value: f64) -> Result<(), CatalogError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CatalogError::BadProbability { name: name.to_string(), value })
    }
}

fn check_magnitude(name: &str, value: f64) -> Result<(), CatalogError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::NegativeMagnitude { name: name.to_string(), value })
    }
}

fn check_multiplier(name: &str, value: f64) -> Result<(), CatalogError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(CatalogError::NonPositiveMultiplier { name: name.to_string(), value })
    }
}
