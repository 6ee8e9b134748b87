//! JSON config loader with environment overrides

use std::fs;
use std::path::Path;

use log::debug;

use super::EngineConfig;
use crate::error::ConfigError;

/// Default path to the engine config file
pub const DEFAULT_CONFIG_PATH: &str = "config/engine.json";

pub const ENV_MAX_SIMULATIONS: &str = "FINANCE_ENGINE_MAX_SIMULATIONS";
pub const ENV_SEED: &str = "FINANCE_ENGINE_SEED";

/// Read an [`EngineConfig`] from a JSON file
///
/// A missing file is not an error: the defaults are returned.
pub fn load_json(path: &Path) -> Result<EngineConfig, ConfigError> {
    if !path.exists() {
        debug!("no config at {}, using defaults", path.display());
        return Ok(EngineConfig::default());
    }

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Apply overrides looked up through `lookup` (the process environment in production)
pub fn apply_env_overrides<F>(
    mut config: EngineConfig,
    lookup: F,
) -> Result<EngineConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_MAX_SIMULATIONS) {
        config.monte_carlo.max_simulations = value
            .trim()
            .parse()
            .ok()
            .filter(|&n: &u32| n > 0)
            .ok_or_else(|| ConfigError::Env {
                var: ENV_MAX_SIMULATIONS,
                value: value.clone(),
            })?;
    }

    if let Some(value) = lookup(ENV_SEED) {
        config.monte_carlo.default_seed = value.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_SEED,
            value: value.clone(),
        })?;
    }

    Ok(config)
}
