//! Rate conversion

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// How often growth is compounded (and contributions are credited)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Annually => 1,
        }
    }
}

/// Convert a percentage (7.5) to a rate (0.075)
pub fn percent_to_rate(percent: Decimal) -> Decimal {
    percent / Decimal::ONE_HUNDRED
}

/// Nominal annual percentage to the rate applied each period
pub fn periodic_rate(annual_rate_percent: Decimal, periods_per_year: u32) -> Decimal {
    percent_to_rate(annual_rate_percent) / Decimal::from(periods_per_year.max(1))
}

/// Whole periods in a horizon of `years`, rounded to the nearest period
///
/// `field` names the horizon input in the error when it is non-positive or
/// shorter than a single period.
pub fn periods_in(years: Decimal, periods_per_year: u32, field: &'static str) -> Result<u32> {
    if years <= Decimal::ZERO {
        return Err(EngineError::invalid(field, "must be greater than zero"));
    }
    let periods = (years * Decimal::from(periods_per_year))
        .round()
        .to_u32()
        .ok_or_else(|| EngineError::invalid(field, "horizon is too long"))?;
    if periods == 0 {
        return Err(EngineError::invalid(field, "horizon is shorter than one period"));
    }
    Ok(periods)
}
