//! Path simulation and result aggregation

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::sampling::{path_seed, standard_normal};
use super::stats::{mean, percentile, share_above, sort_values};
use crate::config::MonteCarloConfig;
use crate::error::{EngineError, Result};
use crate::primitives::{money_from_f64, percent_to_rate, round_money, to_f64, Money};

const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloInput {
    pub initial_amount: Money,
    #[serde(default)]
    pub monthly_contribution: Money,
    pub years: u32,
    pub expected_annual_return_percent: Decimal,
    pub annual_volatility_percent: Decimal,
    pub simulation_count: u32,

    /// Seed for reproducible runs; the configured default is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub min: Money,
    pub max: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub median: Money,
    /// 5th percentile
    pub worst_case: Money,
    /// 95th percentile
    pub best_case: Money,
    pub mean: Money,
    /// Percentage of paths ending above everything contributed
    pub success_rate: Decimal,
    /// 25th to 75th percentile
    pub confidence_band_50: ConfidenceBand,
    /// 5th to 95th percentile
    pub confidence_band_90: ConfidenceBand,
    pub total_contributed: Money,
    pub simulations_run: u32,
}

/// Validated path parameters in floating point
#[derive(Debug, Clone, Copy)]
struct PathParams {
    initial: f64,
    monthly: f64,
    years: u32,
    mean_return: f64,
    volatility: f64,
}

impl PathParams {
    fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let mut balance = self.initial;
        for _ in 0..self.years {
            let annual_return = self.mean_return + self.volatility * standard_normal(rng);
            // The year's return lands on the opening balance, then again monthly
            // on the balance plus each contribution
            balance = (balance * (1.0 + annual_return)).max(0.0);
            let growth = 1.0 + annual_return / f64::from(MONTHS_PER_YEAR);
            for _ in 0..MONTHS_PER_YEAR {
                balance = ((balance + self.monthly) * growth).max(0.0);
            }
        }
        balance
    }
}

/// Runs Monte Carlo simulations within the configured limits
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    config: MonteCarloConfig,
}

impl MonteCarloSimulator {
    pub fn new(config: MonteCarloConfig) -> Self {
        Self { config }
    }

    /// Simulate in parallel with the input's seed, or the configured default
    pub fn simulate(&self, input: &MonteCarloInput) -> Result<MonteCarloResult> {
        self.simulate_seeded(input, input.seed.unwrap_or(self.config.default_seed))
    }

    /// Simulate in parallel, each path on its own generator derived from `seed`
    ///
    /// The output depends only on `seed` and the input, never on thread count.
    pub fn simulate_seeded(&self, input: &MonteCarloInput, seed: u64) -> Result<MonteCarloResult> {
        let (params, count) = self.prepare(input)?;
        info!("Monte Carlo: {count} paths over {} years, seed {seed}", params.years);

        let mut endings: Vec<f64> = (0..count)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(path_seed(seed, u64::from(i)));
                params.simulate(&mut rng)
            })
            .collect();

        summarize(input, &mut endings)
    }

    /// Simulate sequentially, drawing every path from `rng`
    pub fn simulate_with_rng<R: Rng + ?Sized>(
        &self,
        input: &MonteCarloInput,
        rng: &mut R,
    ) -> Result<MonteCarloResult> {
        let (params, count) = self.prepare(input)?;
        debug!("Monte Carlo: {count} paths on caller-supplied generator");

        let mut endings: Vec<f64> = (0..count).map(|_| params.simulate(rng)).collect();
        summarize(input, &mut endings)
    }

    fn prepare(&self, input: &MonteCarloInput) -> Result<(PathParams, u32)> {
        if input.years == 0 {
            return Err(EngineError::invalid("years", "must be at least 1"));
        }
        if input.simulation_count == 0 {
            return Err(EngineError::invalid("simulation_count", "must be at least 1"));
        }
        if input.initial_amount < Decimal::ZERO {
            return Err(EngineError::invalid("initial_amount", "must not be negative"));
        }
        if input.monthly_contribution < Decimal::ZERO {
            return Err(EngineError::invalid("monthly_contribution", "must not be negative"));
        }
        if input.annual_volatility_percent < Decimal::ZERO {
            return Err(EngineError::invalid("annual_volatility_percent", "must not be negative"));
        }

        let count = if input.simulation_count > self.config.max_simulations {
            warn!(
                "simulation_count {} exceeds limit, clamping to {}",
                input.simulation_count, self.config.max_simulations
            );
            self.config.max_simulations
        } else {
            input.simulation_count
        };

        let params = PathParams {
            initial: to_f64(input.initial_amount, "initial_amount")?,
            monthly: to_f64(input.monthly_contribution, "monthly_contribution")?,
            years: input.years,
            mean_return: to_f64(
                percent_to_rate(input.expected_annual_return_percent),
                "expected_annual_return_percent",
            )?,
            volatility: to_f64(
                percent_to_rate(input.annual_volatility_percent),
                "annual_volatility_percent",
            )?,
        };
        Ok((params, count))
    }
}

impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new(MonteCarloConfig::default())
    }
}

fn summarize(input: &MonteCarloInput, endings: &mut [f64]) -> Result<MonteCarloResult> {
    sort_values(endings);
    let endings: &[f64] = endings;

    let total_contributed = input
        .monthly_contribution
        .checked_mul(Decimal::from(MONTHS_PER_YEAR))
        .and_then(|annual| annual.checked_mul(Decimal::from(input.years)))
        .and_then(|paid| paid.checked_add(input.initial_amount))
        .ok_or_else(|| {
            EngineError::invalid("monthly_contribution", "total contributed overflows")
        })?;
    let success_rate = share_above(endings, to_f64(total_contributed, "initial_amount")?);

    let p = |q: f64| money_from_f64(percentile(endings, q), "simulation");
    let p5 = p(0.05)?;
    let p95 = p(0.95)?;

    Ok(MonteCarloResult {
        median: p(0.50)?,
        worst_case: p5,
        best_case: p95,
        mean: money_from_f64(mean(endings), "simulation")?,
        success_rate: money_from_f64(success_rate, "success_rate")?,
        confidence_band_50: ConfidenceBand { min: p(0.25)?, max: p(0.75)? },
        confidence_band_90: ConfidenceBand { min: p5, max: p95 },
        total_contributed: round_money(total_contributed),
        simulations_run: endings.len() as u32,
    })
}
