//! Monte Carlo portfolio simulation
//!
//! Each path draws one normally distributed return per year, applies it to the
//! opening balance, then compounds it monthly alongside the contributions.
//! Ending values are aggregated into nearest-rank percentiles, a mean and a
//! success rate.

mod sampling;
mod simulator;
mod stats;

pub use sampling::{path_seed, standard_normal};
pub use simulator::{ConfidenceBand, MonteCarloInput, MonteCarloResult, MonteCarloSimulator};
