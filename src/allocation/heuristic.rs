//! Rule-of-thumb target allocation from age, risk tolerance, goal and horizon
//!
//! Starts from "100 minus age" in stocks with the rest in bonds, then applies
//! additive shifts:
//!
//! | Condition                   | Stocks | Bonds | Cash | Alternatives |
//! |-----------------------------|--------|-------|------|--------------|
//! | conservative                | -20    | +15   | +5   |              |
//! | aggressive                  | +15    | -20   |      | +5           |
//! | retirement, horizon > 10y   | +10    |       |      |              |
//! | income                      |        | +10   |      |              |
//! | preservation                |        |       | +15  |              |
//! | wealth                      | +5     |       |      | +5           |
//! | horizon > 20y               | +5     | -5    |      |              |
//! | horizon < 5y                | -15    | +10   | +5   |              |
//!
//! The result is normalized to whole percentages summing to exactly 100.

use log::debug;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::AllocationTarget;
use crate::error::{EngineError, Result};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Spreading passes before rounding takes over; each pass pins at least one bucket
const MAX_SPREAD_PASSES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl FromStr for RiskTolerance {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(EngineError::invalid(
                "risk_tolerance",
                format!("unrecognised value '{other}'"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Retirement,
    Wealth,
    Income,
    Preservation,
}

impl FromStr for Goal {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retirement" => Ok(Goal::Retirement),
            "wealth" => Ok(Goal::Wealth),
            "income" => Ok(Goal::Income),
            "preservation" => Ok(Goal::Preservation),
            other => Err(EngineError::invalid("goal", format!("unrecognised value '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationProfile {
    pub age: u32,
    pub risk_tolerance: RiskTolerance,
    pub goal: Goal,
    pub horizon_years: Decimal,
}

/// Recommend a target allocation for `profile`
pub fn recommend_allocation(profile: &AllocationProfile) -> Result<AllocationTarget> {
    if profile.age == 0 {
        return Err(EngineError::invalid("age", "must be greater than zero"));
    }
    if profile.horizon_years < Decimal::ZERO {
        return Err(EngineError::invalid("horizon_years", "must not be negative"));
    }

    let age = Decimal::from(profile.age);
    // stocks, bonds, cash, alternatives
    let mut buckets = [HUNDRED - age, age, Decimal::ZERO, Decimal::ZERO];

    let shift = |buckets: &mut [Decimal; 4], deltas: [i64; 4]| {
        for (bucket, delta) in buckets.iter_mut().zip(deltas) {
            *bucket += Decimal::from(delta);
        }
    };

    match profile.risk_tolerance {
        RiskTolerance::Conservative => shift(&mut buckets, [-20, 15, 5, 0]),
        RiskTolerance::Moderate => {}
        RiskTolerance::Aggressive => shift(&mut buckets, [15, -20, 0, 5]),
    }

    match profile.goal {
        Goal::Retirement if profile.horizon_years > Decimal::TEN => {
            shift(&mut buckets, [10, 0, 0, 0])
        }
        Goal::Retirement => {}
        Goal::Income => shift(&mut buckets, [0, 10, 0, 0]),
        Goal::Preservation => shift(&mut buckets, [0, 0, 15, 0]),
        Goal::Wealth => shift(&mut buckets, [5, 0, 0, 5]),
    }

    if profile.horizon_years > Decimal::from(20) {
        shift(&mut buckets, [5, -5, 0, 0]);
    } else if profile.horizon_years < Decimal::from(5) {
        shift(&mut buckets, [-15, 10, 5, 0]);
    }

    debug!("allocation before normalization: {buckets:?}");
    let [stocks, bonds, cash, alternatives] = normalize(buckets);
    Ok(AllocationTarget::new(stocks, bonds, cash, alternatives))
}

/// Bring buckets to whole percentages in `[0, 100]` summing to exactly 100
fn normalize(mut buckets: [Decimal; 4]) -> [Decimal; 4] {
    let mut free = [true; 4];

    for _ in 0..MAX_SPREAD_PASSES {
        let residual = HUNDRED - buckets.iter().sum::<Decimal>();
        let in_range = buckets.iter().all(|b| *b >= Decimal::ZERO && *b <= HUNDRED);
        let free_count = free.iter().filter(|f| **f).count();
        if (residual.is_zero() && in_range) || free_count == 0 {
            break;
        }

        let share = residual / Decimal::from(free_count);
        for (bucket, is_free) in buckets.iter_mut().zip(free.iter_mut()) {
            if !*is_free {
                continue;
            }
            *bucket = (*bucket + share).clamp(Decimal::ZERO, HUNDRED);
            // A bucket pinned at the bound it was pushed towards cannot absorb more
            let pinned_low = residual < Decimal::ZERO && bucket.is_zero();
            let pinned_high = residual > Decimal::ZERO && *bucket == HUNDRED;
            if pinned_low || pinned_high {
                *is_free = false;
            }
        }
    }

    for bucket in buckets.iter_mut().take(3) {
        *bucket = bucket.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    }
    let mut alternatives = HUNDRED - buckets[0] - buckets[1] - buckets[2];

    if alternatives < Decimal::ZERO {
        let largest = (0..3).max_by_key(|&i| buckets[i]).unwrap_or(0);
        buckets[largest] += alternatives;
        alternatives = Decimal::ZERO;
    }
    buckets[3] = alternatives;
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn profile(age: u32, risk: RiskTolerance, goal: Goal, horizon: Decimal) -> AllocationProfile {
        AllocationProfile {
            age,
            risk_tolerance: risk,
            goal,
            horizon_years: horizon,
        }
    }

    #[test]
    fn test_young_retirement_saver_is_stock_heavy() {
        let young = profile(30, RiskTolerance::Moderate, Goal::Retirement, dec!(35));
        let target = recommend_allocation(&young).unwrap();

        assert_eq!(target, AllocationTarget::new(dec!(80), dec!(20), dec!(0), dec!(0)));
        assert!(target.stocks_percent >= dec!(65));
    }

    #[test]
    fn test_conservative_preservation_short_horizon() {
        // 100-60 = 40/60, conservative 20/75/5/0, preservation 20/75/20/0, short 5/85/25/0
        // sum 115: spread -3.75 each, alternatives pinned at 0, then -1.25 over the rest
        let cautious = profile(60, RiskTolerance::Conservative, Goal::Preservation, dec!(3));
        let target = recommend_allocation(&cautious).unwrap();

        assert_eq!(target.total(), dec!(100));
        assert_eq!(target, AllocationTarget::new(dec!(0), dec!(80), dec!(20), dec!(0)));
    }

    #[test]
    fn test_aggressive_wealth_has_alternatives() {
        let bold = profile(40, RiskTolerance::Aggressive, Goal::Wealth, dec!(15));
        let target = recommend_allocation(&bold).unwrap();

        assert_eq!(target.total(), dec!(100));
        assert!(target.alternatives_percent > Decimal::ZERO);
        assert!(target.stocks_percent > target.bonds_percent);
    }

    #[test]
    fn test_names_parse_case_insensitively() {
        assert_eq!("Moderate".parse::<RiskTolerance>().unwrap(), RiskTolerance::Moderate);
        assert_eq!(" income ".parse::<Goal>().unwrap(), Goal::Income);

        assert_eq!("reckless".parse::<RiskTolerance>().unwrap_err().field(), "risk_tolerance");
        assert_eq!("fame".parse::<Goal>().unwrap_err().field(), "goal");
    }

    #[test]
    fn test_serde_rejects_unknown_goal() {
        let json =
            r#"{"age": 30, "risk_tolerance": "moderate", "goal": "fame", "horizon_years": 10}"#;
        assert!(serde_json::from_str::<AllocationProfile>(json).is_err());
    }

    #[test]
    fn test_invalid_profile() {
        let newborn = profile(0, RiskTolerance::Moderate, Goal::Wealth, dec!(10));
        let err = recommend_allocation(&newborn).unwrap_err();
        assert_eq!(err.field(), "age");

        let past_horizon = profile(30, RiskTolerance::Moderate, Goal::Wealth, dec!(-1));
        let err = recommend_allocation(&past_horizon).unwrap_err();
        assert_eq!(err.field(), "horizon_years");
    }

    fn risk_strategy() -> impl Strategy<Value = RiskTolerance> {
        prop_oneof![
            Just(RiskTolerance::Conservative),
            Just(RiskTolerance::Moderate),
            Just(RiskTolerance::Aggressive),
        ]
    }

    fn goal_strategy() -> impl Strategy<Value = Goal> {
        prop_oneof![
            Just(Goal::Retirement),
            Just(Goal::Wealth),
            Just(Goal::Income),
            Just(Goal::Preservation),
        ]
    }

    proptest! {
        #[test]
        fn prop_allocation_sums_to_hundred(
            age in 1u32..=120,
            risk in risk_strategy(),
            goal in goal_strategy(),
            horizon_tenths in 0i64..600,
        ) {
            let horizon = Decimal::new(horizon_tenths, 1);
            let target = recommend_allocation(&profile(age, risk, goal, horizon)).unwrap();

            prop_assert_eq!(target.total(), dec!(100));
            for bucket in target.buckets() {
                prop_assert!(
                    bucket >= Decimal::ZERO && bucket <= dec!(100),
                    "bucket {} out of range",
                    bucket
                );
                prop_assert_eq!(bucket, bucket.trunc());
            }
        }
    }
}
