//! Allocation models: a rule-based target allocation and the trades needed to reach one

mod heuristic;
mod rebalance;

pub use heuristic::{recommend_allocation, AllocationProfile, Goal, RiskTolerance};
pub use rebalance::{
    rebalance, AssetClass, AssetRebalance, RebalanceInput, RebalancePlan, TradeAction,
};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Percentage split across the four asset buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationTarget {
    pub stocks_percent: Decimal,
    pub bonds_percent: Decimal,
    pub cash_percent: Decimal,
    pub alternatives_percent: Decimal,
}

impl AllocationTarget {
    pub fn new(stocks: Decimal, bonds: Decimal, cash: Decimal, alternatives: Decimal) -> Self {
        Self {
            stocks_percent: stocks,
            bonds_percent: bonds,
            cash_percent: cash,
            alternatives_percent: alternatives,
        }
    }

    pub fn total(&self) -> Decimal {
        self.stocks_percent + self.bonds_percent + self.cash_percent + self.alternatives_percent
    }

    /// Buckets in `AssetClass::ALL` order
    pub fn buckets(&self) -> [Decimal; 4] {
        [
            self.stocks_percent,
            self.bonds_percent,
            self.cash_percent,
            self.alternatives_percent,
        ]
    }

    pub fn percent_of(&self, asset: AssetClass) -> Decimal {
        match asset {
            AssetClass::Stocks => self.stocks_percent,
            AssetClass::Bonds => self.bonds_percent,
            AssetClass::Cash => self.cash_percent,
            AssetClass::Alternatives => self.alternatives_percent,
        }
    }
}
