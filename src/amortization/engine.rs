//! Period-by-period loan amortization

use chrono::{Months, NaiveDate};
use log::{debug, trace};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationEntry, AmortizationResult, ScheduleRun};
use super::state::LoanState;
use crate::error::{EngineError, Result};
use crate::primitives::{level_payment, periodic_rate, periods_in, round_money, Money};

/// Loan payments per year
const PAYMENTS_PER_YEAR: u32 = 12;

/// Input for an amortization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub principal: Money,

    /// Nominal annual rate, e.g. 6 for 6%
    pub annual_rate_percent: Decimal,

    pub term_years: Decimal,

    /// One-off extra principal payment
    #[serde(default)]
    pub prepayment: Option<Money>,

    /// Period the prepayment is made in (defaults to the first payment)
    #[serde(default)]
    pub prepayment_period: Option<u32>,

    /// Date of the first payment; later payments fall one month apart
    #[serde(default)]
    pub first_payment_date: Option<NaiveDate>,

    /// Return only the first N schedule rows (totals always cover the full run)
    #[serde(default)]
    pub schedule_limit: Option<usize>,
}

/// Validated loan terms driving one or more schedule runs
pub struct AmortizationEngine {
    principal: Money,
    rate: Decimal,
    periods: u32,
    payment: Money,
    first_payment_date: Option<NaiveDate>,
}

impl AmortizationEngine {
    /// Validate the loan terms and fix the level payment
    pub fn new(input: &AmortizationInput) -> Result<Self> {
        if input.principal <= Decimal::ZERO {
            return Err(EngineError::invalid("principal", "must be greater than zero"));
        }
        if input.annual_rate_percent < Decimal::ZERO {
            return Err(EngineError::invalid("annual_rate_percent", "must not be negative"));
        }

        let periods = periods_in(input.term_years, PAYMENTS_PER_YEAR, "term_years")?;
        let rate = periodic_rate(input.annual_rate_percent, PAYMENTS_PER_YEAR);
        let payment = round_money(level_payment(input.principal, rate, periods)?);

        Ok(Self {
            principal: input.principal,
            rate,
            periods,
            payment,
            first_payment_date: input.first_payment_date,
        })
    }

    /// Scheduled level payment, rounded to cents
    pub fn payment(&self) -> Money {
        self.payment
    }

    /// Number of scheduled payments
    pub fn periods(&self) -> u32 {
        self.periods
    }

    /// Amortize the loan, applying `prepayment` as `(period, amount)` if given
    pub(crate) fn run(&self, prepayment: Option<(u32, Money)>) -> Result<ScheduleRun> {
        let mut state = LoanState::new(self.principal);
        let mut entries = Vec::with_capacity(self.periods as usize);

        while state.period < self.periods && !state.is_paid_off() {
            let extra = match prepayment {
                Some((period, amount)) if period == state.period + 1 => amount,
                _ => Decimal::ZERO,
            };
            let entry = self.calculate_period(&mut state, extra)?;
            trace!(
                "period {}: interest={} principal={} balance={}",
                entry.period,
                entry.interest_portion,
                entry.principal_portion,
                entry.remaining_balance
            );
            entries.push(entry);
        }

        Ok(ScheduleRun {
            entries,
            total_interest: state.total_interest,
            total_paid: state.total_paid,
        })
    }

    /// Compute one payment and advance `state`
    fn calculate_period(&self, state: &mut LoanState, extra: Money) -> Result<AmortizationEntry> {
        let period = state.period + 1;
        let balance = state.balance;

        let interest = round_money(balance * self.rate);
        let scheduled_principal = (self.payment - interest).max(Decimal::ZERO);

        // Final scheduled period clears whatever rounding left behind
        let mut principal = scheduled_principal + extra;
        if principal > balance || period == self.periods {
            principal = balance;
        }
        let prepayment = extra.min((principal - scheduled_principal).max(Decimal::ZERO));

        state.apply_payment(interest, principal);

        Ok(AmortizationEntry {
            period,
            payment_date: self.payment_date(period)?,
            payment: interest + principal,
            principal_portion: principal,
            interest_portion: interest,
            prepayment,
            remaining_balance: state.balance,
        })
    }

    fn payment_date(&self, period: u32) -> Result<Option<NaiveDate>> {
        match self.first_payment_date {
            Some(first) => first
                .checked_add_months(Months::new(period - 1))
                .map(Some)
                .ok_or_else(|| {
                    EngineError::invalid(
                        "first_payment_date",
                        "schedule runs past the calendar range",
                    )
                }),
            None => Ok(None),
        }
    }
}

/// Build the amortization schedule for `input`
///
/// With a prepayment, the loan is amortized twice (with and without it) using
/// the same rounding, and the interest difference is reported as the saving.
pub fn amortize(input: &AmortizationInput) -> Result<AmortizationResult> {
    let engine = AmortizationEngine::new(input)?;

    let prepayment = match input.prepayment {
        Some(amount) if amount < Decimal::ZERO => {
            return Err(EngineError::invalid("prepayment", "must not be negative"));
        }
        Some(amount) if amount > Decimal::ZERO => {
            let period = input.prepayment_period.unwrap_or(1);
            if period == 0 {
                return Err(EngineError::invalid("prepayment_period", "periods start at 1"));
            }
            Some((period, round_money(amount)))
        }
        _ => None,
    };

    debug!(
        "amortize: principal={} rate/period={} periods={} payment={} prepayment={:?}",
        input.principal,
        engine.rate,
        engine.periods(),
        engine.payment(),
        prepayment
    );

    let run = engine.run(prepayment)?;

    let (prepayment_interest_saved, periods_saved) = if prepayment.is_some() {
        let baseline = engine.run(None)?;
        (
            Some(baseline.total_interest - run.total_interest),
            Some(baseline.payoff_periods() - run.payoff_periods()),
        )
    } else {
        (None, None)
    };

    let payoff_periods = run.payoff_periods();
    let mut schedule = run.entries;
    if let Some(limit) = input.schedule_limit {
        schedule.truncate(limit);
    }

    Ok(AmortizationResult {
        periodic_payment: engine.payment(),
        total_interest: run.total_interest,
        total_paid: run.total_paid,
        payoff_periods,
        schedule,
        prepayment_interest_saved,
        periods_saved,
    })
}
