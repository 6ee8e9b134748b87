//! Numeric primitives shared by the calculators
//!
//! Money is carried as [`Decimal`] so that iterating hundreds of periods does
//! not accumulate binary floating-point drift. Every calculator rounds with
//! [`round_money`], which keeps rounding identical between runs that are later
//! compared (e.g. amortization with and without prepayment).

mod growth;
mod rates;

pub use growth::{annuity_future_value, compound_growth, growth_factor, level_payment};
pub use rates::{percent_to_rate, periodic_rate, periods_in, CompoundingFrequency};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, Result};

/// Monetary amount
pub type Money = Decimal;

/// Number of decimal places money is rounded to
pub const MONEY_DP: u32 = 2;

/// Round a monetary amount to cents (banker's rounding)
pub fn round_money(amount: Decimal) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Convert a decimal to `f64` for the floating-point simulation paths
pub fn to_f64(value: Decimal, field: &'static str) -> Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| EngineError::invalid(field, format!("{value} is not representable as f64")))
}

/// Convert a simulated `f64` aggregate back to money, rounded to cents
pub fn money_from_f64(value: f64, field: &'static str) -> Result<Money> {
    if !value.is_finite() {
        return Err(EngineError::invalid(field, "simulation produced a non-finite value"));
    }
    Decimal::from_f64(value)
        .map(round_money)
        .ok_or_else(|| EngineError::invalid(field, format!("{value} is out of range for money")))
}
