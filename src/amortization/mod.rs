//! Loan amortization: level payments, optional prepayment, and schedule export

mod engine;
mod schedule;
mod state;

pub use engine::{amortize, AmortizationEngine, AmortizationInput};
pub use schedule::{write_schedule_csv, AmortizationEntry, AmortizationResult};
pub use state::LoanState;
