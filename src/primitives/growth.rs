//! Compound growth and annuity formulas

use rust_decimal::Decimal;

use crate::error::{EngineError, Result};

/// `(1 + rate)^periods` by repeated squaring
///
/// Fails when the factor overflows the decimal range, which is how a
/// non-finite result shows up in decimal arithmetic.
pub fn growth_factor(rate: Decimal, periods: u32) -> Result<Decimal> {
    let overflow = || {
        EngineError::invalid(
            "annual_rate_percent",
            format!("growth over {periods} periods overflows"),
        )
    };

    let mut base = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    let mut exp = periods;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.checked_mul(base).ok_or_else(overflow)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = base.checked_mul(base).ok_or_else(overflow)?;
        }
    }
    Ok(result)
}

/// Future value of a present sum: `principal * (1+r)^n`
pub fn compound_growth(principal: Decimal, rate: Decimal, periods: u32) -> Result<Decimal> {
    let factor = growth_factor(rate, periods)?;
    principal
        .checked_mul(factor)
        .ok_or_else(|| EngineError::invalid("principal", "compounded value overflows"))
}

/// Future value of a level ordinary annuity: `pmt * ((1+r)^n - 1) / r`
///
/// With `r == 0` contributions accumulate linearly.
pub fn annuity_future_value(payment: Decimal, rate: Decimal, periods: u32) -> Result<Decimal> {
    let overflow = || EngineError::invalid("periodic_contribution", "annuity value overflows");
    if rate.is_zero() {
        return payment.checked_mul(Decimal::from(periods)).ok_or_else(overflow);
    }
    let factor = growth_factor(rate, periods)?;
    payment
        .checked_mul(factor - Decimal::ONE)
        .and_then(|v| v.checked_div(rate))
        .ok_or_else(overflow)
}

/// Level payment that retires `principal` over `periods`:
/// `P * r * (1+r)^n / ((1+r)^n - 1)`, or `P / n` with no interest
pub fn level_payment(principal: Decimal, rate: Decimal, periods: u32) -> Result<Decimal> {
    if periods == 0 {
        return Err(EngineError::invalid("term_years", "term covers no payment periods"));
    }
    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }
    let factor = growth_factor(rate, periods)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(EngineError::invalid(
            "annual_rate_percent",
            "rate too small to amortize over the term",
        ));
    }
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(factor))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| EngineError::invalid("principal", "payment overflows"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::round_money;
    use rust_decimal_macros::dec;

    #[test]
    fn test_growth_factor_matches_repeated_multiplication() {
        let rate = dec!(0.005);
        let mut expected = Decimal::ONE;
        for _ in 0..37 {
            expected *= Decimal::ONE + rate;
        }
        let diff = (growth_factor(rate, 37).unwrap() - expected).abs();
        assert!(diff < dec!(0.0000000001));
        assert_eq!(growth_factor(rate, 0).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_zero_rate_annuity_is_linear() {
        let fv = annuity_future_value(dec!(500), Decimal::ZERO, 360).unwrap();
        assert_eq!(fv, dec!(180000));
    }

    #[test]
    fn test_level_payment_standard_mortgage() {
        let payment = level_payment(dec!(300000), dec!(0.005), 360).unwrap();
        assert_eq!(round_money(payment), dec!(1798.65));
    }

    #[test]
    fn test_level_payment_zero_rate() {
        assert_eq!(level_payment(dec!(12000), Decimal::ZERO, 12).unwrap(), dec!(1000));
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let err = growth_factor(dec!(10), 200).unwrap_err();
        assert_eq!(err.field(), "annual_rate_percent");
    }
}
