//! Finance Engine - projection and simulation calculators for personal finance
//!
//! This library provides:
//! - Compound growth projections (future value, required contribution, time to goal)
//! - Loan amortization schedules with prepayment analysis
//! - Dividend reinvestment projections
//! - Monte Carlo portfolio simulation with seedable, parallel paths
//! - Rule-based asset allocation and rebalancing trades
//! - A scenario runner dispatching tagged JSON requests, singly or in batches
//!
//! Every calculator is a pure function of its input: no I/O, no shared state.

pub mod allocation;
pub mod amortization;
pub mod config;
pub mod dividend;
pub mod error;
pub mod monte_carlo;
pub mod primitives;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use allocation::{
    rebalance, recommend_allocation, AllocationProfile, AllocationTarget, RebalancePlan,
};
pub use amortization::{amortize, AmortizationInput, AmortizationResult};
pub use config::EngineConfig;
pub use dividend::{project_dividends, DividendProjectionInput, DividendProjectionResult};
pub use error::{ConfigError, EngineError, Result};
pub use monte_carlo::{MonteCarloInput, MonteCarloResult, MonteCarloSimulator};
pub use primitives::Money;
pub use projection::{project, ProjectionOutcome, ProjectionRequest};
pub use scenario::{CalculationRequest, CalculationResponse, ScenarioRunner};
