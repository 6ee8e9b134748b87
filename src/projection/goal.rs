//! Goal planning: required contribution for a target, and time to reach a target

use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::compound::{
    balance_after, contribution_per_period, contributions_through, periods_for, validate_rate,
};
use crate::error::{EngineError, Result};
use crate::primitives::{
    compound_growth, growth_factor, periodic_rate, round_money, CompoundingFrequency, Money,
};

/// Horizon beyond which a goal counts as unreachable
pub const MAX_GOAL_YEARS: u32 = 200;

/// Input for solving the contribution needed to hit a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionGoalInput {
    pub principal: Money,
    pub target_value: Money,
    pub annual_rate_percent: Decimal,
    pub years: Decimal,
    #[serde(default)]
    pub compounding: CompoundingFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionGoalResult {
    /// Contribution needed each month
    pub required_monthly_contribution: Money,
    /// Contribution needed each compounding period
    pub required_periodic_contribution: Money,
    pub periods: u32,
    /// What the principal grows to on its own
    pub principal_future_value: Money,
    pub total_contributions: Money,
    /// The principal alone reaches the target
    pub principal_sufficient: bool,
}

/// Input for solving how long a fixed contribution takes to reach a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeToGoalInput {
    pub principal: Money,
    /// Contribution per month
    pub periodic_contribution: Money,
    pub target_value: Money,
    pub annual_rate_percent: Decimal,
    #[serde(default)]
    pub compounding: CompoundingFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeToGoalResult {
    pub reachable: bool,
    /// Whole compounding periods until the balance first reaches the target
    pub periods: Option<u32>,
    pub years: Option<Decimal>,
    pub projected_value: Option<Money>,
    pub total_contributions: Option<Money>,
}

impl TimeToGoalResult {
    fn unreachable() -> Self {
        Self {
            reachable: false,
            periods: None,
            years: None,
            projected_value: None,
            total_contributions: None,
        }
    }
}

/// Invert the annuity formula for the level contribution reaching `target_value`
pub fn required_contribution(input: &ContributionGoalInput) -> Result<ContributionGoalResult> {
    if input.principal < Decimal::ZERO {
        return Err(EngineError::invalid("principal", "must not be negative"));
    }
    if input.target_value <= Decimal::ZERO {
        return Err(EngineError::invalid("target_value", "must be greater than zero"));
    }
    validate_rate(input.annual_rate_percent)?;

    let periods_per_year = input.compounding.periods_per_year();
    let periods = periods_for(input.years, input.compounding)?;
    let rate = periodic_rate(input.annual_rate_percent, periods_per_year);

    let principal_future_value = compound_growth(input.principal, rate, periods)?;
    let gap = input.target_value - principal_future_value;

    let per_period = if gap <= Decimal::ZERO {
        Decimal::ZERO
    } else if rate.is_zero() {
        gap / Decimal::from(periods)
    } else {
        let accumulation = growth_factor(rate, periods)? - Decimal::ONE;
        if accumulation.is_zero() {
            return Err(EngineError::invalid(
                "annual_rate_percent",
                "rate too small to solve over the horizon",
            ));
        }
        gap.checked_mul(rate)
            .and_then(|v| v.checked_div(accumulation))
            .ok_or_else(|| EngineError::invalid("target_value", "required contribution overflows"))?
    };

    debug!("required contribution: gap={gap} per_period={per_period} periods={periods}");

    let monthly = per_period
        .checked_mul(Decimal::from(periods_per_year))
        .map(|annual| annual / Decimal::from(12))
        .ok_or_else(|| EngineError::invalid("target_value", "required contribution overflows"))?;
    Ok(ContributionGoalResult {
        required_monthly_contribution: round_money(monthly),
        required_periodic_contribution: round_money(per_period),
        periods,
        principal_future_value: round_money(principal_future_value),
        total_contributions: round_money(contributions_through(
            input.principal,
            per_period,
            periods,
        )?),
        principal_sufficient: gap <= Decimal::ZERO,
    })
}

/// Closed-form time to goal: `n = ln((T + C/r) / (P + C/r)) / ln(1 + r)`
///
/// An unreachable goal is a valid answer (`reachable == false`), not an error.
pub fn time_to_goal(input: &TimeToGoalInput) -> Result<TimeToGoalResult> {
    if input.principal < Decimal::ZERO {
        return Err(EngineError::invalid("principal", "must not be negative"));
    }
    if input.periodic_contribution < Decimal::ZERO {
        return Err(EngineError::invalid("periodic_contribution", "must not be negative"));
    }
    if input.target_value <= Decimal::ZERO {
        return Err(EngineError::invalid("target_value", "must be greater than zero"));
    }
    validate_rate(input.annual_rate_percent)?;

    let periods_per_year = input.compounding.periods_per_year();
    let rate = periodic_rate(input.annual_rate_percent, periods_per_year);
    let contribution = contribution_per_period(input.periodic_contribution, input.compounding)?;

    if input.principal >= input.target_value {
        return Ok(reached_at(input, contribution, rate, 0, periods_per_year)?);
    }

    let estimate = match estimate_periods(input, contribution, rate) {
        Some(n) => n,
        None => return Ok(TimeToGoalResult::unreachable()),
    };

    let limit = MAX_GOAL_YEARS * periods_per_year;
    if estimate > f64::from(limit) {
        debug!("time to goal: estimate {estimate:.1} periods exceeds limit {limit}");
        return Ok(TimeToGoalResult::unreachable());
    }

    // The log estimate is floating point; settle the exact period in decimal
    let mut periods = estimate.ceil().max(1.0) as u32;
    while periods > 1
        && balance_after(input.principal, contribution, rate, periods - 1)? >= input.target_value
    {
        periods -= 1;
    }
    while balance_after(input.principal, contribution, rate, periods)? < input.target_value {
        periods += 1;
        if periods > limit {
            return Ok(TimeToGoalResult::unreachable());
        }
    }

    reached_at(input, contribution, rate, periods, periods_per_year)
}

/// Fractional period count from the closed form, `None` when no finite solution exists
fn estimate_periods(input: &TimeToGoalInput, contribution: Decimal, rate: Decimal) -> Option<f64> {
    let principal = input.principal.to_f64()?;
    let target = input.target_value.to_f64()?;
    let contribution = contribution.to_f64()?;
    let rate = rate.to_f64()?;

    if rate == 0.0 {
        if contribution <= 0.0 {
            return None;
        }
        return Some((target - principal) / contribution);
    }

    let offset = contribution / rate;
    let ratio = (target + offset) / (principal + offset);
    if !ratio.is_finite() || ratio <= 0.0 {
        return None;
    }
    let periods = ratio.ln() / (1.0 + rate).ln();
    (periods.is_finite() && periods >= 0.0).then_some(periods)
}

fn reached_at(
    input: &TimeToGoalInput,
    contribution: Decimal,
    rate: Decimal,
    periods: u32,
    periods_per_year: u32,
) -> Result<TimeToGoalResult> {
    let projected = balance_after(input.principal, contribution, rate, periods)?;
    Ok(TimeToGoalResult {
        reachable: true,
        periods: Some(periods),
        years: Some((Decimal::from(periods) / Decimal::from(periods_per_year)).round_dp(2)),
        projected_value: Some(round_money(projected)),
        total_contributions: Some(round_money(contributions_through(
            input.principal,
            contribution,
            periods,
        )?)),
    })
}
