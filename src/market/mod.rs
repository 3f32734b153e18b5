//! Market catalog module
//!
//! Lists open Polymarket markets via the Gamma API and coerces the loosely
//! typed records into [`Market`].

mod gamma;

pub use gamma::{GammaClient, GammaConfig, GAMMA_API_URL};

use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A Polymarket market with its outcome tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Market {
    /// Gamma market id
    pub id: String,
    /// Condition identifier
    pub condition_id: String,
    /// Human-readable question
    pub question: String,
    /// URL slug
    pub slug: String,
    /// Resolution / end time, if published
    pub end_time: Option<DateTime<Utc>>,
    /// Trailing 24h volume
    pub volume_24h: Decimal,
    /// Resting liquidity
    pub liquidity: Decimal,
    /// Outcome labels, e.g. ["Yes", "No"]
    pub outcomes: Vec<String>,
    /// Published reference price for each outcome
    pub outcome_prices: Vec<Decimal>,
    /// CLOB token id for each outcome
    pub token_ids: Vec<String>,
    /// Whether the market is active
    pub active: bool,
    /// Whether the market is closed
    pub closed: bool,
    /// Whether the market has a CLOB order book
    pub enable_order_book: bool,
    /// Whether the CLOB accepts orders; `None` when the source omits it
    pub accepting_orders: Option<bool>,
}

impl Market {
    /// Outcome label for the token at `index`, or a positional fallback
    pub fn outcome_label(&self, index: usize) -> String {
        self.outcomes
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("outcome-{}", index))
    }
}

/// Remote, read-only catalog of markets
#[async_trait]
pub trait MarketCatalog: Send + Sync {
    /// Fetch up to `limit` open markets, highest 24h volume first
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<Market>, FetchError>;
}
