//! Dividend reinvestment projection
//!
//! Simulates year by year: contributions land at the start of the year,
//! income is paid on the resulting value, optionally reinvested, and then both
//! the portfolio value and the yield grow at the assumed long-run rate.
//!
//! Growing the yield as well as the price is a deliberate simplification that
//! compounds growth twice in the yield-on-cost figure; it is kept as the
//! model's documented behaviour rather than a market model.

use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::primitives::{percent_to_rate, round_money, Money};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendProjectionInput {
    pub initial_value: Money,
    pub current_yield_percent: Decimal,
    pub annual_growth_percent: Decimal,
    pub years: u32,
    #[serde(default)]
    pub monthly_contribution: Money,
    #[serde(default = "default_reinvest")]
    pub reinvest: bool,
}

fn default_reinvest() -> bool {
    true
}

/// One simulated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendYear {
    pub year: u32,
    /// Income paid during the year
    pub annual_income: Money,
    /// Portfolio value at year end, after growth
    pub portfolio_value: Money,
    pub yield_percent: Decimal,
    pub cumulative_income: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividendProjectionResult {
    pub final_portfolio_value: Money,
    /// Income paid in the final simulated year
    pub final_annual_income: Money,
    pub total_income_received: Money,
    pub total_contributions: Money,
    /// Final annual income over the initial investment, as a percentage
    pub yield_on_cost_percent: Decimal,
    /// Final value less the initial value and contributions
    pub capital_growth: Money,
    /// Final annual income less the first year's income on the initial value
    pub income_growth: Money,
    pub yearly: Vec<DividendYear>,
}

/// Project dividend income and portfolio value over `years`
pub fn project_dividends(input: &DividendProjectionInput) -> Result<DividendProjectionResult> {
    if input.initial_value <= Decimal::ZERO {
        return Err(EngineError::invalid("initial_value", "must be greater than zero"));
    }
    if input.current_yield_percent <= Decimal::ZERO {
        return Err(EngineError::invalid("current_yield_percent", "must be greater than zero"));
    }
    if input.years == 0 {
        return Err(EngineError::invalid("years", "must be greater than zero"));
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(EngineError::invalid("monthly_contribution", "must not be negative"));
    }
    if input.annual_growth_percent <= -Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid("annual_growth_percent", "must be greater than -100"));
    }

    let growth = Decimal::ONE + percent_to_rate(input.annual_growth_percent);
    let annual_contribution = input
        .monthly_contribution
        .checked_mul(Decimal::from(12))
        .ok_or_else(|| {
            EngineError::invalid("monthly_contribution", "annual contribution overflows")
        })?;

    debug!(
        "dividends: value={} yield={}% growth={}% years={} reinvest={}",
        input.initial_value,
        input.current_yield_percent,
        input.annual_growth_percent,
        input.years,
        input.reinvest
    );

    let overflow = || EngineError::invalid("annual_growth_percent", "projection overflows");
    let as_percent = |rate: Decimal| rate.checked_mul(Decimal::ONE_HUNDRED).ok_or_else(overflow);

    let mut value = input.initial_value;
    let mut yield_rate = percent_to_rate(input.current_yield_percent);
    let mut total_income = Decimal::ZERO;
    let mut total_contributions = Decimal::ZERO;
    let mut annual_income = Decimal::ZERO;
    let mut yearly = Vec::with_capacity(input.years as usize);

    for year in 1..=input.years {
        value = value.checked_add(annual_contribution).ok_or_else(overflow)?;
        total_contributions = total_contributions
            .checked_add(annual_contribution)
            .ok_or_else(overflow)?;

        annual_income = value.checked_mul(yield_rate).ok_or_else(overflow)?;
        total_income = total_income.checked_add(annual_income).ok_or_else(overflow)?;
        if input.reinvest {
            value = value.checked_add(annual_income).ok_or_else(overflow)?;
        }

        value = value.checked_mul(growth).ok_or_else(overflow)?;
        yield_rate = yield_rate.checked_mul(growth).ok_or_else(overflow)?;

        trace!("year {year}: income={annual_income} value={value}");
        yearly.push(DividendYear {
            year,
            annual_income: round_money(annual_income),
            portfolio_value: round_money(value),
            yield_percent: as_percent(yield_rate)?.round_dp(4),
            cumulative_income: round_money(total_income),
        });
    }

    let final_portfolio_value = round_money(value);
    let final_annual_income = round_money(annual_income);
    let starting_income = input.initial_value * percent_to_rate(input.current_yield_percent);
    let yield_on_cost = annual_income.checked_div(input.initial_value).ok_or_else(overflow)?;

    Ok(DividendProjectionResult {
        final_portfolio_value,
        final_annual_income,
        total_income_received: round_money(total_income),
        total_contributions: round_money(total_contributions),
        yield_on_cost_percent: as_percent(yield_on_cost)?.round_dp(2),
        capital_growth: final_portfolio_value
            - input.initial_value
            - round_money(total_contributions),
        income_growth: final_annual_income - round_money(starting_income),
        yearly,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(reinvest: bool) -> DividendProjectionInput {
        DividendProjectionInput {
            initial_value: dec!(10000),
            current_yield_percent: dec!(4),
            annual_growth_percent: dec!(5),
            years: 10,
            monthly_contribution: Decimal::ZERO,
            reinvest,
        }
    }

    #[test]
    fn test_reinvested_ten_years() {
        let result = project_dividends(&input(true)).unwrap();

        assert_eq!(result.final_portfolio_value, dec!(26605.85));
        assert_eq!(result.final_annual_income, dec!(1480.49));
        assert_eq!(result.total_income_received, dec!(8274.99));
        assert_eq!(result.yield_on_cost_percent, dec!(14.80));
        assert_eq!(result.income_growth, dec!(1080.49));
        assert_eq!(result.yearly.len(), 10);
    }

    #[test]
    fn test_income_taken_as_cash() {
        let result = project_dividends(&input(false)).unwrap();

        assert_eq!(result.final_portfolio_value, dec!(16288.95));
        assert_eq!(result.final_annual_income, dec!(962.65));
        assert_eq!(result.total_income_received, dec!(6451.89));
        assert_eq!(result.capital_growth, dec!(6288.95));
    }

    #[test]
    fn test_contributions_count_before_income() {
        let result = project_dividends(&DividendProjectionInput {
            current_yield_percent: dec!(3),
            annual_growth_percent: Decimal::ZERO,
            years: 1,
            monthly_contribution: dec!(100),
            ..input(true)
        })
        .unwrap();

        assert_eq!(result.total_contributions, dec!(1200));
        assert_eq!(result.final_annual_income, dec!(336.00));
        assert_eq!(result.final_portfolio_value, dec!(11536.00));
    }

    #[test]
    fn test_reinvesting_beats_cash_income_on_value() {
        let reinvested = project_dividends(&input(true)).unwrap();
        let cash = project_dividends(&input(false)).unwrap();
        assert!(reinvested.final_portfolio_value > cash.final_portfolio_value);
        assert!(reinvested.final_annual_income > cash.final_annual_income);
    }

    #[test]
    fn test_runaway_growth_is_an_error() {
        let result = project_dividends(&DividendProjectionInput {
            annual_growth_percent: dec!(100),
            years: 60,
            ..input(false)
        });
        assert_eq!(result.unwrap_err().field(), "annual_growth_percent");

        let reinvested = project_dividends(&DividendProjectionInput {
            annual_growth_percent: dec!(100),
            years: 60,
            ..input(true)
        });
        assert!(reinvested.is_err());
    }

    #[test]
    fn test_rejects_non_positive_inputs() {
        let zero_value = DividendProjectionInput { initial_value: Decimal::ZERO, ..input(true) };
        assert_eq!(project_dividends(&zero_value).unwrap_err().field(), "initial_value");

        let zero_yield = DividendProjectionInput {
            current_yield_percent: Decimal::ZERO,
            ..input(true)
        };
        assert_eq!(project_dividends(&zero_yield).unwrap_err().field(), "current_yield_percent");

        let zero_years = DividendProjectionInput { years: 0, ..input(true) };
        assert_eq!(project_dividends(&zero_years).unwrap_err().field(), "years");
    }
}
