//! Engine configuration: Monte Carlo limits and rebalancing thresholds

pub mod loader;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Upper bound on simulated paths per Monte Carlo run
pub const DEFAULT_MAX_SIMULATIONS: u32 = 10_000;

/// Container for all tunable engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub monte_carlo: MonteCarloConfig,
    pub rebalance: RebalanceConfig,
}

/// Monte Carlo run limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Requests above this are clamped
    pub max_simulations: u32,

    /// Seed used when a request does not carry one
    pub default_seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            max_simulations: DEFAULT_MAX_SIMULATIONS,
            default_seed: 42,
        }
    }
}

/// Thresholds for the rebalancing calculator, as percentages of portfolio value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalanceConfig {
    /// A bucket whose delta is below this share of the portfolio is held
    pub hold_threshold_percent: Decimal,

    /// Total absolute drift above this share triggers a rebalance
    pub rebalance_threshold_percent: Decimal,

    /// Allowed distance of an allocation's sum from 100
    pub sum_tolerance_percent: Decimal,
}

impl Default for RebalanceConfig {
    fn default() -> Self {
        Self {
            hold_threshold_percent: dec!(1),
            rebalance_threshold_percent: dec!(5),
            sum_tolerance_percent: dec!(1),
        }
    }
}

impl EngineConfig {
    /// Load from the default location (config/engine.json), then apply env overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_json_path(Path::new(loader::DEFAULT_CONFIG_PATH))?.with_env_overrides()
    }

    /// Load from a specific JSON file; missing keys keep their defaults
    pub fn from_json_path(path: &Path) -> Result<Self, ConfigError> {
        loader::load_json(path)
    }

    /// Apply `FINANCE_ENGINE_*` environment overrides
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        loader::apply_env_overrides(self, |var| std::env::var(var).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.monte_carlo.max_simulations, 10_000);
        assert_eq!(config.rebalance.hold_threshold_percent, dec!(1));
        assert_eq!(config.rebalance.rebalance_threshold_percent, dec!(5));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"monte_carlo": {"max_simulations": 500}}"#).unwrap();
        assert_eq!(config.monte_carlo.max_simulations, 500);
        assert_eq!(config.monte_carlo.default_seed, 42);
        assert_eq!(config.rebalance, RebalanceConfig::default());
    }
}
