//! Trainer configuration.
//!
//! Every field has a default, so an empty JSON object (or no file at all)
//! yields the standard 100bb 6-max setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GtoError, GtoResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Share of the narrowing likelihood reserved for off-equilibrium play.
    pub noise_weight: f64,
    /// Lowest multiplier a single observation may apply to a range weight.
    pub probability_floor: f64,
    /// Weight above which a hand key counts as still in range.
    pub significance_threshold: f64,
    /// Probability that a simulated opponent picks a random legal action.
    pub villain_noise: f64,
    pub small_blind: f64,
    pub big_blind: f64,
    /// Preflop open size in big blinds.
    pub open_raise: f64,
    /// Preflop re-raise size in big blinds.
    pub three_bet: f64,
    /// Minimum raise as a multiple of the bet being raised.
    pub raise_multiplier: f64,
    pub bet_small: f64,
    pub bet_medium: f64,
    pub bet_large: f64,
    pub starting_stack: f64,
    /// Equity cells with fewer observations use the ordinal fallback.
    pub min_equity_samples: u32,
    pub strategy_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        TrainerConfig {
            noise_weight: 0.30,
            probability_floor: 0.001,
            significance_threshold: 0.05,
            villain_noise: 0.30,
            small_blind: 0.5,
            big_blind: 1.0,
            open_raise: 2.5,
            three_bet: 8.0,
            raise_multiplier: 2.5,
            bet_small: 0.33,
            bet_medium: 0.66,
            bet_large: 1.0,
            starting_stack: 100.0,
            min_equity_samples: 30,
            strategy_path: None,
            seed: None,
        }
    }
}

impl TrainerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GtoResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(json: &str) -> GtoResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> GtoResult<()> {
        let unit = [
            ("noise_weight", self.noise_weight),
            ("villain_noise", self.villain_noise),
            ("significance_threshold", self.significance_threshold),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(GtoError::InvalidValue(format!("{} must be in [0, 1], got {}", name, value)));
            }
        }
        if self.probability_floor <= 0.0 || self.probability_floor > 1.0 {
            return Err(GtoError::InvalidValue(format!(
                "probability_floor must be in (0, 1], got {}",
                self.probability_floor
            )));
        }
        let positive = [
            ("small_blind", self.small_blind),
            ("big_blind", self.big_blind),
            ("open_raise", self.open_raise),
            ("three_bet", self.three_bet),
            ("raise_multiplier", self.raise_multiplier),
            ("bet_small", self.bet_small),
            ("bet_medium", self.bet_medium),
            ("bet_large", self.bet_large),
            ("starting_stack", self.starting_stack),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(GtoError::InvalidValue(format!("{} must be positive, got {}", name, value)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(TrainerConfig::from_json_str("{}").unwrap(), TrainerConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = TrainerConfig::from_json_str(r#"{"starting_stack": 40.0, "seed": 7}"#).unwrap();
        assert_eq!(config.starting_stack, 40.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.open_raise, 2.5);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(TrainerConfig::from_json_str(r#"{"noise_weight": 1.5}"#).is_err());
        assert!(TrainerConfig::from_json_str(r#"{"probability_floor": 0.0}"#).is_err());
        assert!(TrainerConfig::from_json_str(r#"{"big_blind": -1.0}"#).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(TrainerConfig::from_file("/nonexistent/gto.json").is_err());
    }
}
