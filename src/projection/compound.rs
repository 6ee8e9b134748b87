//! Future value of a principal plus a level contribution schedule

use log::{debug, trace};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::primitives::{
    annuity_future_value, compound_growth, percent_to_rate, periodic_rate, periods_in, round_money,
    CompoundingFrequency, Money,
};

/// Input for the future-value projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Starting balance
    pub principal: Money,

    /// Contribution per month (spread across periods for non-monthly compounding)
    pub periodic_contribution: Money,

    /// Nominal annual rate, e.g. 7 for 7%
    pub annual_rate_percent: Decimal,

    /// Horizon in years (fractional years round to the nearest period)
    pub years: Decimal,

    #[serde(default)]
    pub compounding: CompoundingFrequency,

    /// Annual inflation used to deflate the nominal result
    #[serde(default)]
    pub inflation_rate_percent: Option<Decimal>,

    /// Safe-withdrawal rate used to size retirement income from the projected pot
    #[serde(default)]
    pub withdrawal_rate_percent: Option<Decimal>,
}

/// Year-end snapshot of a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub balance: Money,
    pub contributions_to_date: Money,
    pub growth_to_date: Money,
}

/// Sustainable income drawn from the projected pot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementIncome {
    pub withdrawal_rate_percent: Decimal,
    pub annual_income: Money,
    pub monthly_income: Money,
    /// True when sized from the inflation-adjusted value
    pub based_on_real_value: bool,
}

/// Output of the future-value projection
///
/// `future_value == total_contributions + total_growth` holds exactly; the
/// principal counts as a contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub future_value: Money,
    pub total_contributions: Money,
    pub total_growth: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retirement_income: Option<RetirementIncome>,
    pub yearly: Vec<ProjectionYear>,
}

/// Periods covered by `years` at the given frequency (at least one)
pub(crate) fn periods_for(years: Decimal, compounding: CompoundingFrequency) -> Result<u32> {
    periods_in(years, compounding.periods_per_year(), "years")
}

pub(crate) fn validate_rate(annual_rate_percent: Decimal) -> Result<()> {
    if annual_rate_percent <= -Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid(
            "annual_rate_percent",
            "must be greater than -100",
        ));
    }
    Ok(())
}

/// Monthly contribution expressed per compounding period
pub(crate) fn contribution_per_period(
    monthly: Money,
    compounding: CompoundingFrequency,
) -> Result<Decimal> {
    monthly
        .checked_mul(Decimal::from(12))
        .map(|annual| annual / Decimal::from(compounding.periods_per_year()))
        .ok_or_else(|| {
            EngineError::invalid("periodic_contribution", "annual contribution overflows")
        })
}

/// Principal plus `periods` contributions
pub(crate) fn contributions_through(
    principal: Money,
    contribution: Decimal,
    periods: u32,
) -> Result<Decimal> {
    contribution
        .checked_mul(Decimal::from(periods))
        .and_then(|paid| paid.checked_add(principal))
        .ok_or_else(|| {
            EngineError::invalid("periodic_contribution", "total contributions overflow")
        })
}

/// Unrounded balance after `periods`
pub(crate) fn balance_after(
    principal: Money,
    contribution: Decimal,
    rate: Decimal,
    periods: u32,
) -> Result<Decimal> {
    let grown = compound_growth(principal, rate, periods)?;
    let accumulated = annuity_future_value(contribution, rate, periods)?;
    grown
        .checked_add(accumulated)
        .ok_or_else(|| EngineError::invalid("principal", "projected balance overflows"))
}

/// Project the future value of `input`
pub fn future_value(input: &ProjectionInput) -> Result<ProjectionResult> {
    if input.principal < Decimal::ZERO {
        return Err(EngineError::invalid("principal", "must not be negative"));
    }
    if input.periodic_contribution < Decimal::ZERO {
        return Err(EngineError::invalid("periodic_contribution", "must not be negative"));
    }
    validate_rate(input.annual_rate_percent)?;

    let periods_per_year = input.compounding.periods_per_year();
    let periods = periods_for(input.years, input.compounding)?;
    let rate = periodic_rate(input.annual_rate_percent, periods_per_year);
    let contribution = contribution_per_period(input.periodic_contribution, input.compounding)?;

    debug!(
        "future value: principal={} contribution/period={} rate/period={} periods={}",
        input.principal, contribution, rate, periods
    );

    let future_value = round_money(balance_after(input.principal, contribution, rate, periods)?);
    let total_contributions =
        round_money(contributions_through(input.principal, contribution, periods)?);
    let total_growth = future_value - total_contributions;

    let real_value = match input.inflation_rate_percent {
        Some(inflation) => Some(deflate(future_value, inflation, input.years)?),
        None => None,
    };

    let retirement_income = match input.withdrawal_rate_percent {
        Some(withdrawal) => Some(retirement_income(
            withdrawal,
            real_value.unwrap_or(future_value),
            real_value.is_some(),
        )?),
        None => None,
    };

    let whole_years = periods / periods_per_year;
    let mut yearly = Vec::with_capacity(whole_years as usize);
    for year in 1..=whole_years {
        let elapsed = year * periods_per_year;
        let balance = round_money(balance_after(input.principal, contribution, rate, elapsed)?);
        let contributions_to_date =
            round_money(contributions_through(input.principal, contribution, elapsed)?);
        trace!("year {year}: balance={balance}");
        yearly.push(ProjectionYear {
            year,
            balance,
            contributions_to_date,
            growth_to_date: balance - contributions_to_date,
        });
    }

    Ok(ProjectionResult {
        future_value,
        total_contributions,
        total_growth,
        real_value,
        retirement_income,
        yearly,
    })
}

/// Nominal value in today's money: `value / (1+inflation)^years`
fn deflate(value: Money, inflation_rate_percent: Decimal, years: Decimal) -> Result<Money> {
    if inflation_rate_percent <= -Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid(
            "inflation_rate_percent",
            "must be greater than -100",
        ));
    }
    let deflator = (Decimal::ONE + percent_to_rate(inflation_rate_percent))
        .checked_powd(years)
        .filter(|d| !d.is_zero())
        .ok_or_else(|| EngineError::invalid("inflation_rate_percent", "deflator overflows"))?;
    value
        .checked_div(deflator)
        .map(round_money)
        .ok_or_else(|| EngineError::invalid("inflation_rate_percent", "real value overflows"))
}

fn retirement_income(
    withdrawal_rate_percent: Decimal,
    pot: Money,
    based_on_real_value: bool,
) -> Result<RetirementIncome> {
    if withdrawal_rate_percent <= Decimal::ZERO || withdrawal_rate_percent > Decimal::ONE_HUNDRED {
        return Err(EngineError::invalid(
            "withdrawal_rate_percent",
            "must be in (0, 100]",
        ));
    }
    let annual_income = round_money(pot * percent_to_rate(withdrawal_rate_percent));
    Ok(RetirementIncome {
        withdrawal_rate_percent,
        annual_income,
        monthly_income: round_money(annual_income / Decimal::from(12)),
        based_on_real_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::prelude::ToPrimitive;
    use rust_decimal_macros::dec;

    fn scenario_one(compounding: CompoundingFrequency) -> ProjectionInput {
        ProjectionInput {
            principal: dec!(10000),
            periodic_contribution: dec!(500),
            annual_rate_percent: dec!(7),
            years: dec!(30),
            compounding,
            inflation_rate_percent: None,
            withdrawal_rate_percent: None,
        }
    }

    #[test]
    fn test_thirty_year_annual_compounding_fixture() {
        let result = future_value(&scenario_one(CompoundingFrequency::Annually)).unwrap();

        assert!(result.future_value >= dec!(620000) && result.future_value <= dec!(650000));
        assert!((result.future_value - dec!(642887.27)).abs() <= dec!(0.01));
        assert_eq!(result.total_contributions, dec!(190000));
        assert_eq!(result.future_value, result.total_contributions + result.total_growth);
        assert_eq!(result.yearly.len(), 30);
        assert_eq!(result.yearly.last().unwrap().balance, result.future_value);
    }

    #[test]
    fn test_thirty_year_monthly_compounding_fixture() {
        let result = future_value(&scenario_one(CompoundingFrequency::Monthly)).unwrap();
        assert!((result.future_value - dec!(691150.47)).abs() <= dec!(0.01));
        assert_eq!(result.total_contributions, dec!(190000));
    }

    #[test]
    fn test_zero_rate_accumulates_linearly() {
        let input = ProjectionInput {
            annual_rate_percent: Decimal::ZERO,
            ..scenario_one(CompoundingFrequency::Monthly)
        };
        let result = future_value(&input).unwrap();
        assert_eq!(result.future_value, dec!(190000));
        assert_eq!(result.total_growth, Decimal::ZERO);
    }

    #[test]
    fn test_real_value_and_income() {
        let input = ProjectionInput {
            inflation_rate_percent: Some(dec!(3)),
            withdrawal_rate_percent: Some(dec!(4)),
            ..scenario_one(CompoundingFrequency::Annually)
        };
        let result = future_value(&input).unwrap();
        let real = result.real_value.unwrap();

        // 642887.27 / 1.03^30
        assert!((real - dec!(264861.04)).abs() < dec!(1));
        let income = result.retirement_income.unwrap();
        assert!(income.based_on_real_value);
        assert_eq!(income.annual_income, round_money(real * dec!(0.04)));
    }

    #[test]
    fn test_deflating_past_decimal_range_is_an_error() {
        let input = ProjectionInput {
            principal: dec!(10000000000),
            periodic_contribution: Decimal::ZERO,
            annual_rate_percent: Decimal::ZERO,
            years: dec!(20),
            inflation_rate_percent: Some(dec!(-90)),
            ..scenario_one(CompoundingFrequency::Monthly)
        };
        let err = future_value(&input).unwrap_err();
        assert_eq!(err.field(), "inflation_rate_percent");
    }

    #[test]
    fn test_oversized_contribution_is_an_error() {
        let input = ProjectionInput {
            periodic_contribution: Decimal::MAX,
            ..scenario_one(CompoundingFrequency::Monthly)
        };
        assert_eq!(future_value(&input).unwrap_err().field(), "periodic_contribution");
    }

    #[test]
    fn test_rejects_non_positive_years() {
        let input = ProjectionInput {
            years: Decimal::ZERO,
            ..scenario_one(CompoundingFrequency::Monthly)
        };
        assert_eq!(future_value(&input).unwrap_err().field(), "years");
    }

    #[test]
    fn test_rejects_sub_period_horizon() {
        let input = ProjectionInput {
            years: dec!(0.1),
            ..scenario_one(CompoundingFrequency::Annually)
        };
        assert_eq!(future_value(&input).unwrap_err().field(), "years");
    }

    #[test]
    fn test_rejects_negative_contribution() {
        let input = ProjectionInput {
            periodic_contribution: dec!(-1),
            ..scenario_one(CompoundingFrequency::Monthly)
        };
        assert_eq!(future_value(&input).unwrap_err().field(), "periodic_contribution");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_future_value_is_contributions_plus_growth(
            principal in 0u32..2_000_000,
            contribution in 0u32..10_000,
            rate_bp in 0u32..1500,
            years in 1u32..50,
        ) {
            let input = ProjectionInput {
                principal: Decimal::from(principal),
                periodic_contribution: Decimal::from(contribution),
                annual_rate_percent: Decimal::new(rate_bp as i64, 2),
                years: Decimal::from(years),
                compounding: CompoundingFrequency::Monthly,
                inflation_rate_percent: None,
                withdrawal_rate_percent: None,
            };
            let result = future_value(&input).unwrap();
            let fv = result.future_value.to_f64().unwrap();
            let sum = (result.total_contributions + result.total_growth).to_f64().unwrap();
            prop_assert!((fv - sum).abs() <= 1e-6 * fv.abs().max(1.0));
            prop_assert!(result.total_growth >= Decimal::ZERO);
        }
    }
}
