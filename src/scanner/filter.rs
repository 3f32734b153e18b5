//! Market eligibility filtering
//!
//! Runs before any order book I/O. Book fetches are the expensive step, so
//! everything that can be decided from catalog data is decided here.

use super::ScanMode;
use crate::config::ScannerConfig;
use crate::market::Market;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Result of applying filters to a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterResult {
    /// Candidate passed all filters
    Pass,
    /// Candidate rejected
    Reject(RejectReason),
}

impl FilterResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, FilterResult::Pass)
    }
}

/// Reason a market or token was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Market is closed
    Closed,
    /// Market has no CLOB order book
    OrderBookDisabled,
    /// CLOB explicitly not accepting orders
    NotAcceptingOrders,
    /// 24h volume below floor
    VolumeTooLow(Decimal),
    /// Liquidity below floor
    LiquidityTooLow(Decimal),
    /// Fewer than two outcomes, prices or tokens
    MissingOutcomes,
    /// No end time published
    NoEndTime,
    /// Ends in the past or beyond the lookahead window
    OutsideWindow(DateTime<Utc>),
    /// Selected token's spread too wide
    SpreadTooWide(Decimal),
    /// Not enough ask depth to fill the notional
    InsufficientDepth,
    /// Mid hasn't moved enough since the last snapshot
    MoveTooSmall(Decimal),
    /// No token produced a two-sided book
    NoQuotes,
}

/// Catalog-level eligibility for one market
pub fn check_market(
    market: &Market,
    config: &ScannerConfig,
    mode: ScanMode,
    now: DateTime<Utc>,
) -> FilterResult {
    if market.closed {
        return FilterResult::Reject(RejectReason::Closed);
    }

    if !market.enable_order_book {
        return FilterResult::Reject(RejectReason::OrderBookDisabled);
    }

    // Only an explicit `false` disqualifies; a missing flag is tolerated
    if mode == ScanMode::Live && market.accepting_orders == Some(false) {
        return FilterResult::Reject(RejectReason::NotAcceptingOrders);
    }

    if market.volume_24h < config.min_volume_24h {
        return FilterResult::Reject(RejectReason::VolumeTooLow(market.volume_24h));
    }

    if market.liquidity < config.min_liquidity {
        return FilterResult::Reject(RejectReason::LiquidityTooLow(market.liquidity));
    }

    // Outcomes, prices and tokens pair up by position
    let tokens = market.token_ids.len();
    if tokens < 2 || market.outcomes.len() != tokens || market.outcome_prices.len() != tokens {
        return FilterResult::Reject(RejectReason::MissingOutcomes);
    }

    let Some(end_time) = market.end_time else {
        return FilterResult::Reject(RejectReason::NoEndTime);
    };

    let lookahead = i64::try_from(config.lookahead_hours)
        .ok()
        .and_then(Duration::try_hours)
        .unwrap_or(Duration::MAX);
    let horizon = now.checked_add_signed(lookahead).unwrap_or(DateTime::<Utc>::MAX_UTC);
    if end_time <= now || end_time > horizon {
        return FilterResult::Reject(RejectReason::OutsideWindow(end_time));
    }

    FilterResult::Pass
}
