//! Scenario runner for single and batch calculations
//!
//! Holds the engine configuration once, then dispatches tagged requests to the
//! matching calculator. Requests are independent, so batches run in parallel.

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::allocation::{
    rebalance, recommend_allocation, AllocationProfile, AllocationTarget, RebalanceInput,
    RebalancePlan,
};
use crate::amortization::{amortize, AmortizationInput, AmortizationResult};
use crate::config::EngineConfig;
use crate::dividend::{project_dividends, DividendProjectionInput, DividendProjectionResult};
use crate::error::Result;
use crate::monte_carlo::{MonteCarloInput, MonteCarloResult, MonteCarloSimulator};
use crate::projection::{project, ProjectionOutcome, ProjectionRequest};

/// One calculation, tagged by the calculator that runs it
///
/// ```json
/// {"calculator": "projection", "mode": "future_value", "principal": 10000, ...}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationRequest {
    Projection(ProjectionRequest),
    Amortization(AmortizationInput),
    Dividend(DividendProjectionInput),
    MonteCarlo(MonteCarloInput),
    Allocation(AllocationProfile),
    Rebalance(RebalanceInput),
}

impl CalculationRequest {
    /// Fix the seed of a Monte Carlo request; other requests are unchanged
    pub fn with_seed(mut self, seed: u64) -> Self {
        if let CalculationRequest::MonteCarlo(input) = &mut self {
            input.seed = Some(seed);
        }
        self
    }

    pub fn calculator(&self) -> &'static str {
        match self {
            CalculationRequest::Projection(_) => "projection",
            CalculationRequest::Amortization(_) => "amortization",
            CalculationRequest::Dividend(_) => "dividend",
            CalculationRequest::MonteCarlo(_) => "monte_carlo",
            CalculationRequest::Allocation(_) => "allocation",
            CalculationRequest::Rebalance(_) => "rebalance",
        }
    }
}

/// Result of a [`CalculationRequest`], tagged the same way
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", rename_all = "snake_case")]
pub enum CalculationResponse {
    Projection(ProjectionOutcome),
    Amortization(AmortizationResult),
    Dividend(DividendProjectionResult),
    MonteCarlo(MonteCarloResult),
    Allocation(AllocationTarget),
    Rebalance(RebalancePlan),
}

/// Configured entry point for running calculations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(EngineConfig::load()?);
/// let response = runner.run(&request)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: EngineConfig,
    simulator: MonteCarloSimulator,
}

impl ScenarioRunner {
    pub fn new(config: EngineConfig) -> Self {
        let simulator = MonteCarloSimulator::new(config.monte_carlo.clone());
        Self { config, simulator }
    }

    /// Run a single calculation
    pub fn run(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        debug!("running {} calculation", request.calculator());
        match request {
            CalculationRequest::Projection(req) => {
                project(req).map(CalculationResponse::Projection)
            }
            CalculationRequest::Amortization(input) => {
                amortize(input).map(CalculationResponse::Amortization)
            }
            CalculationRequest::Dividend(input) => {
                project_dividends(input).map(CalculationResponse::Dividend)
            }
            CalculationRequest::MonteCarlo(input) => {
                self.simulator.simulate(input).map(CalculationResponse::MonteCarlo)
            }
            CalculationRequest::Allocation(profile) => {
                recommend_allocation(profile).map(CalculationResponse::Allocation)
            }
            CalculationRequest::Rebalance(input) => {
                rebalance(input, &self.config.rebalance).map(CalculationResponse::Rebalance)
            }
        }
    }

    /// Run independent calculations in parallel; results keep request order
    pub fn run_batch(&self, requests: &[CalculationRequest]) -> Vec<Result<CalculationResponse>> {
        info!("running batch of {} calculations", requests.len());
        requests.par_iter().map(|request| self.run(request)).collect()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
