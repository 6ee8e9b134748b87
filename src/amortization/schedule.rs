//! Amortization schedule rows, run results and CSV export

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::primitives::Money;

/// A single payment period of the schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    /// Payment number (1-indexed)
    pub period: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,

    /// Total paid this period, prepayment included
    pub payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,

    /// Extra principal applied this period (part of `principal_portion`)
    pub prepayment: Money,

    pub remaining_balance: Money,
}

/// Complete amortization output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Scheduled level payment
    pub periodic_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,

    /// Payments until the balance reached zero
    pub payoff_periods: u32,

    /// Schedule rows, possibly truncated by `schedule_limit`
    pub schedule: Vec<AmortizationEntry>,

    /// Interest avoided by the prepayment versus the plain schedule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepayment_interest_saved: Option<Money>,

    /// Payments avoided by the prepayment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods_saved: Option<u32>,
}

/// Totals of one pass over the loan
#[derive(Debug, Clone)]
pub(crate) struct ScheduleRun {
    pub entries: Vec<AmortizationEntry>,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl ScheduleRun {
    pub fn payoff_periods(&self) -> u32 {
        self.entries.last().map(|e| e.period).unwrap_or(0)
    }
}

/// Write schedule rows as CSV with a header row
pub fn write_schedule_csv<W: Write>(entries: &[AmortizationEntry], writer: W) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Period",
        "PaymentDate",
        "Payment",
        "Principal",
        "Interest",
        "Prepayment",
        "RemainingBalance",
    ])?;

    for entry in entries {
        csv_writer.write_record([
            entry.period.to_string(),
            entry.payment_date.map(|d| d.to_string()).unwrap_or_default(),
            entry.payment.to_string(),
            entry.principal_portion.to_string(),
            entry.interest_portion.to_string(),
            entry.prepayment.to_string(),
            entry.remaining_balance.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
