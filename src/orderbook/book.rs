//! Order book state

use super::PriceLevel;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// L2 order book for a token as returned by the source
///
/// Levels carry no ordering guarantee. Every accessor scans the valid levels
/// instead of trusting the first element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBook {
    /// Token identifier
    pub token_id: String,
    /// Bid levels, unordered
    pub bids: Vec<PriceLevel>,
    /// Ask levels, unordered
    pub asks: Vec<PriceLevel>,
    /// Observation timestamp
    pub updated_at: DateTime<Utc>,
}

impl OrderBook {
    /// Create a new empty order book
    pub fn new(token_id: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            bids: vec![],
            asks: vec![],
            updated_at: Utc::now(),
        }
    }

    /// Create a book from raw level lists
    pub fn with_levels(
        token_id: impl Into<String>,
        bids: Vec<PriceLevel>,
        asks: Vec<PriceLevel>,
    ) -> Self {
        Self {
            token_id: token_id.into(),
            bids,
            asks,
            updated_at: Utc::now(),
        }
    }

    /// Highest valid bid price
    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids
            .iter()
            .filter(|l| l.is_valid())
            .map(|l| l.price)
            .max()
    }

    /// Lowest valid ask price
    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks
            .iter()
            .filter(|l| l.is_valid())
            .map(|l| l.price)
            .min()
    }

    /// Get mid price
    pub fn mid_price(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
            _ => None,
        }
    }

    /// Get spread
    pub fn spread(&self) -> Option<Decimal> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Valid asks, cheapest first
    pub fn sorted_asks(&self) -> Vec<PriceLevel> {
        let mut asks: Vec<PriceLevel> =
            self.asks.iter().filter(|l| l.is_valid()).cloned().collect();
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        asks
    }

    /// Valid bids, richest first
    pub fn sorted_bids(&self) -> Vec<PriceLevel> {
        let mut bids: Vec<PriceLevel> =
            self.bids.iter().filter(|l| l.is_valid()).cloned().collect();
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        bids
    }
}
