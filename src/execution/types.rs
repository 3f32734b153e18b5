//! Execution types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which side of the book an order takes liquidity from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Lift asks, cheapest first
    Buy,
    /// Hit bids, richest first
    Sell,
}

/// Result of walking the book for a target notional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillEstimate {
    /// Volume-weighted average execution price
    pub avg_price: Decimal,
    /// Shares filled
    pub shares: Decimal,
    /// Currency actually consumed
    pub notional_filled: Decimal,
    /// Best price touched
    pub best_price: Decimal,
    /// Worst price touched
    pub worst_price: Decimal,
    /// Number of levels consumed (fully or partially)
    pub levels_consumed: usize,
}

impl FillEstimate {
    /// Absolute distance between the average price and a reference price
    pub fn slippage_from(&self, reference: Decimal) -> Decimal {
        (self.avg_price - reference).abs()
    }
}
