//! Session configuration: turn budget, disposition thresholds, costs and healing.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::MAX_SEQUENCE_LENGTH;
use crate::stats::{CharacterStats, EnemyStats};

const DEFAULT_CONFIG_DATA: &str = include_str!("../assets/default_config.json");

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: i64,
        value: i64,
    },
    #[error("hostile threshold {hostile} must not exceed friendly threshold {friendly}")]
    AmiabilityOrder { hostile: i32, friendly: i32 },
    #[error("amiability thresholds must lie in 0..=100 (hostile {hostile}, friendly {friendly})")]
    AmiabilityRange { hostile: i32, friendly: i32 },
    #[error("health thresholds invalid: critical {critical:.2}, weakened {weakened:.2}")]
    HealthThresholds { weakened: f64, critical: f64 },
    #[error("sequence minimum {min} exceeds maximum {max}")]
    SequenceBounds { min: usize, max: usize },
    #[error("sequence maximum {max} exceeds the supported limit of {limit}")]
    SequenceTooLong { max: usize, limit: usize },
}

/// Guardian mood thresholds on the 0..=100 amiability scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmiabilityThresholds {
    #[serde(default = "AmiabilityThresholds::default_hostile")]
    pub hostile: i32,
    #[serde(default = "AmiabilityThresholds::default_friendly")]
    pub friendly: i32,
}

impl AmiabilityThresholds {
    const fn default_hostile() -> i32 {
        30
    }

    const fn default_friendly() -> i32 {
        70
    }
}

impl Default for AmiabilityThresholds {
    fn default() -> Self {
        Self {
            hostile: Self::default_hostile(),
            friendly: Self::default_friendly(),
        }
    }
}

/// Hp shares below which the player looks weakened or critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthThresholds {
    #[serde(default = "HealthThresholds::default_weakened")]
    pub weakened: f64,
    #[serde(default = "HealthThresholds::default_critical")]
    pub critical: f64,
}

impl HealthThresholds {
    const fn default_weakened() -> f64 {
        0.5
    }

    const fn default_critical() -> f64 {
        0.1
    }
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            weakened: Self::default_weakened(),
            critical: Self::default_critical(),
        }
    }
}

/// Hp and mp restored by resting at home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestHealing {
    #[serde(default = "RestHealing::default_amount")]
    pub hp: i32,
    #[serde(default = "RestHealing::default_amount")]
    pub mp: i32,
}

impl RestHealing {
    const fn default_amount() -> i32 {
        30
    }
}

impl Default for RestHealing {
    fn default() -> Self {
        Self {
            hp: Self::default_amount(),
            mp: Self::default_amount(),
        }
    }
}

/// Requested sequence length range before difficulty scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceBounds {
    #[serde(default = "SequenceBounds::default_min")]
    pub min_length: usize,
    #[serde(default = "SequenceBounds::default_max")]
    pub max_length: usize,
}

impl SequenceBounds {
    const fn default_min() -> usize {
        5
    }

    const fn default_max() -> usize {
        12
    }
}

impl Default for SequenceBounds {
    fn default() -> Self {
        Self {
            min_length: Self::default_min(),
            max_length: Self::default_max(),
        }
    }
}

/// Immutable thresholds for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "GameConfig::default_max_turns")]
    pub max_turns: u32,
    #[serde(default)]
    pub amiability_thresholds: AmiabilityThresholds,
    #[serde(default)]
    pub health_thresholds: HealthThresholds,
    #[serde(default = "GameConfig::default_magic_cost")]
    pub magic_cost: i32,
    #[serde(default)]
    pub rest_healing: RestHealing,
    #[serde(default)]
    pub sequence: SequenceBounds,
    #[serde(default)]
    pub player: CharacterStats,
    #[serde(default)]
    pub enemy: EnemyStats,
}

impl GameConfig {
    const fn default_max_turns() -> u32 {
        6
    }

    const fn default_magic_cost() -> i32 {
        20
    }

    fn built_in() -> Self {
        Self {
            max_turns: Self::default_max_turns(),
            amiability_thresholds: AmiabilityThresholds::default(),
            health_thresholds: HealthThresholds::default(),
            magic_cost: Self::default_magic_cost(),
            rest_healing: RestHealing::default(),
            sequence: SequenceBounds::default(),
            player: CharacterStats::default(),
            enemy: EnemyStats::default(),
        }
    }

    /// Parse and validate a configuration document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the JSON is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns < 1 {
            return Err(ConfigError::MinViolation {
                field: "max_turns",
                min: 1,
                value: i64::from(self.max_turns),
            });
        }
        let AmiabilityThresholds { hostile, friendly } = self.amiability_thresholds;
        if !(0..=100).contains(&hostile) || !(0..=100).contains(&friendly) {
            return Err(ConfigError::AmiabilityRange { hostile, friendly });
        }
        if hostile > friendly {
            return Err(ConfigError::AmiabilityOrder { hostile, friendly });
        }
        let HealthThresholds { weakened, critical } = self.health_thresholds;
        if !(0.0..=1.0).contains(&critical) || !(critical..=1.0).contains(&weakened) {
            return Err(ConfigError::HealthThresholds { weakened, critical });
        }
        for (field, value) in [
            ("magic_cost", self.magic_cost),
            ("rest_healing.hp", self.rest_healing.hp),
            ("rest_healing.mp", self.rest_healing.mp),
        ] {
            if value < 0 {
                return Err(ConfigError::MinViolation {
                    field,
                    min: 0,
                    value: i64::from(value),
                });
            }
        }
        for (field, value) in [
            ("player.max_hp", self.player.max_hp),
            ("enemy.max_hp", self.enemy.max_hp),
        ] {
            if value < 1 {
                return Err(ConfigError::MinViolation {
                    field,
                    min: 1,
                    value: i64::from(value),
                });
            }
        }
        let SequenceBounds {
            min_length,
            max_length,
        } = self.sequence;
        if min_length < 1 {
            return Err(ConfigError::MinViolation {
                field: "sequence.min_length",
                min: 1,
                value: 0,
            });
        }
        if min_length > max_length {
            return Err(ConfigError::SequenceBounds {
                min: min_length,
                max: max_length,
            });
        }
        if max_length > MAX_SEQUENCE_LENGTH {
            return Err(ConfigError::SequenceTooLong {
                max: max_length,
                limit: MAX_SEQUENCE_LENGTH,
            });
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_json(DEFAULT_CONFIG_DATA).unwrap_or_else(|_| Self::built_in())
    }
}
