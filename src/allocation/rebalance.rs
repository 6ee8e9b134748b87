//! Trades that move a portfolio from its current allocation to a target one

use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AllocationTarget;
use crate::config::RebalanceConfig;
use crate::error::{EngineError, Result};
use crate::primitives::{percent_to_rate, round_money, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stocks,
    Bonds,
    Cash,
    Alternatives,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Cash,
        AssetClass::Alternatives,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
    Hold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceInput {
    pub current: AllocationTarget,
    pub target: AllocationTarget,
    pub total_portfolio_value: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRebalance {
    pub asset: AssetClass,
    pub current_amount: Money,
    pub target_amount: Money,
    /// Positive to buy, negative to sell
    pub delta_amount: Money,
    pub action: TradeAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancePlan {
    pub assets: Vec<AssetRebalance>,
    pub rebalance_needed: bool,
    /// Half the summed absolute deltas, so each buy/sell pair counts once
    pub total_trade_volume: Money,
}

/// Compute per-bucket trades; thresholds come from `config`
pub fn rebalance(input: &RebalanceInput, config: &RebalanceConfig) -> Result<RebalancePlan> {
    if input.total_portfolio_value <= Decimal::ZERO {
        return Err(EngineError::invalid("total_portfolio_value", "must be greater than zero"));
    }
    validate_allocation(&input.current, "current", config.sum_tolerance_percent)?;
    validate_allocation(&input.target, "target", config.sum_tolerance_percent)?;

    let total = input.total_portfolio_value;
    let hold_below = total * percent_to_rate(config.hold_threshold_percent);

    let assets: Vec<AssetRebalance> = AssetClass::ALL
        .iter()
        .map(|&asset| {
            let current_share = percent_to_rate(input.current.percent_of(asset));
            let target_share = percent_to_rate(input.target.percent_of(asset));
            let current_amount = round_money(total * current_share);
            let target_amount = round_money(total * target_share);
            let delta_amount = target_amount - current_amount;

            let action = if delta_amount.abs() < hold_below {
                TradeAction::Hold
            } else if delta_amount > Decimal::ZERO {
                TradeAction::Buy
            } else {
                TradeAction::Sell
            };

            AssetRebalance {
                asset,
                current_amount,
                target_amount,
                delta_amount,
                action,
            }
        })
        .collect();

    let drift: Money = assets.iter().map(|a| a.delta_amount.abs()).sum();
    let rebalance_needed = drift > total * percent_to_rate(config.rebalance_threshold_percent);
    debug!("rebalance: drift {drift} of {total}, needed={rebalance_needed}");

    Ok(RebalancePlan {
        assets,
        rebalance_needed,
        total_trade_volume: round_money(drift / Decimal::TWO),
    })
}

fn validate_allocation(
    allocation: &AllocationTarget,
    field: &'static str,
    tolerance: Decimal,
) -> Result<()> {
    for bucket in allocation.buckets() {
        if bucket < Decimal::ZERO || bucket > Decimal::ONE_HUNDRED {
            return Err(EngineError::invalid(field, format!("bucket {bucket} is outside 0..=100")));
        }
    }
    let total = allocation.total();
    if (total - Decimal::ONE_HUNDRED).abs() > tolerance {
        return Err(EngineError::invalid(
            field,
            format!("percentages sum to {total}, expected 100"),
        ));
    }
    Ok(())
}
