//! Running loan state during an amortization run

use rust_decimal::Decimal;

use crate::primitives::Money;

/// State of a loan between payments
#[derive(Debug, Clone)]
pub struct LoanState {
    /// Last completed payment period (0 before the first payment)
    pub period: u32,

    /// Outstanding principal
    pub balance: Money,

    /// Interest paid so far
    pub total_interest: Money,

    /// Principal repaid so far, prepayments included
    pub total_principal: Money,

    /// Everything paid so far
    pub total_paid: Money,
}

impl LoanState {
    /// State at origination
    pub fn new(principal: Money) -> Self {
        Self {
            period: 0,
            balance: principal,
            total_interest: Decimal::ZERO,
            total_principal: Decimal::ZERO,
            total_paid: Decimal::ZERO,
        }
    }

    /// Book one payment and move to the next period
    pub fn apply_payment(&mut self, interest: Money, principal: Money) {
        self.period += 1;
        self.balance = (self.balance - principal).max(Decimal::ZERO);
        self.total_interest += interest;
        self.total_principal += principal;
        self.total_paid += interest + principal;
    }

    pub fn is_paid_off(&self) -> bool {
        self.balance <= Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_apply_payment_accumulates() {
        let mut state = LoanState::new(dec!(1000));
        state.apply_payment(dec!(5), dec!(95));
        state.apply_payment(dec!(4.53), dec!(95.47));

        assert_eq!(state.period, 2);
        assert_eq!(state.balance, dec!(809.53));
        assert_eq!(state.total_interest, dec!(9.53));
        assert_eq!(state.total_paid, dec!(200));
        assert!(!state.is_paid_off());
    }

    #[test]
    fn test_balance_never_negative() {
        let mut state = LoanState::new(dec!(50));
        state.apply_payment(Decimal::ZERO, dec!(80));
        assert_eq!(state.balance, Decimal::ZERO);
        assert!(state.is_paid_off());
    }
}
