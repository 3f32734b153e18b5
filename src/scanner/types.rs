//! Scanner types

use crate::execution::FillEstimate;
use crate::market::Market;
use crate::orderbook::OrderBook;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which selection heuristic and gates a scan applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Single-shot report: any outcome count, token chosen by closeness to
    /// the published reference price, no minimum move, top-N output
    Report,
    /// Live monitoring: binary pair, token chosen by largest move, minimum
    /// move enforced, single best output
    Live,
}

/// Two-sided quote for one outcome token in one cycle
#[derive(Debug, Clone)]
pub struct TokenQuote {
    /// Position of the token in the market's outcome list
    pub index: usize,
    pub token_id: String,
    pub book: OrderBook,
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
    pub spread: Decimal,
    /// Absolute mid change since the previous snapshot
    pub abs_move: Decimal,
}

/// A ranked entry candidate; lives for one scan cycle
#[derive(Debug, Clone)]
pub struct Opportunity {
    pub market: Market,
    pub token_id: String,
    /// Outcome label of the chosen token
    pub outcome: String,
    pub outcome_index: usize,
    /// Book the estimate was computed from
    pub book: OrderBook,
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
    pub spread: Decimal,
    pub abs_move: Decimal,
    /// Buy-side fill at the configured notional
    pub buy_fill: FillEstimate,
    pub slippage_buy: Decimal,
    pub slippage_sell: Decimal,
    pub score: u8,
    pub observed_at: DateTime<Utc>,
}
