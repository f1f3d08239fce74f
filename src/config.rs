//! Engine configuration with validation and defaults.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    pub payout: PayoutConfig,
    pub rounds: RoundConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            payout: PayoutConfig::default(),
            rounds: RoundConfig::default(),
        }
    }
}

/// Payout calculation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PayoutConfig {
    /// Gross win multiplier applied to the staked amount
    pub win_multiplier: f64,
}

impl Default for PayoutConfig {
    fn default() -> Self {
        Self { win_multiplier: 2.0 }
    }
}

/// Per-round betting limits and house take
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RoundConfig {
    pub min_bet: f64,
    pub max_bet: f64,
    /// Fraction of gross winnings retained by the house, 0.0..1.0
    pub commission_rate: f64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            min_bet: 1.0,
            max_bet: 1_000.0,
            commission_rate: 0.05,
        }
    }
}

impl EngineConfig {
    /// Validate configuration values, returning the first violation found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payout.win_multiplier <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "payout.win_multiplier",
                value: self.payout.win_multiplier,
                reason: "must be positive",
            });
        }
        if self.rounds.min_bet <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "rounds.min_bet",
                value: self.rounds.min_bet,
                reason: "must be positive",
            });
        }
        if self.rounds.max_bet < self.rounds.min_bet {
            return Err(ConfigError::InvalidValue {
                field: "rounds.max_bet",
                value: self.rounds.max_bet,
                reason: "must be at least min_bet",
            });
        }
        if !(0.0..1.0).contains(&self.rounds.commission_rate) {
            return Err(ConfigError::InvalidValue {
                field: "rounds.commission_rate",
                value: self.rounds.commission_rate,
                reason: "must be in the range 0.0..1.0",
            });
        }
        Ok(())
    }
}
