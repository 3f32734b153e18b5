//! Order book module
//!
//! Point-in-time order book snapshots fetched from the Polymarket CLOB

mod book;
mod client;

pub use book::OrderBook;
pub use client::{ClobClient, ClobConfig, CLOB_API_URL};
pub(crate) use client::decimal_from_json;

use crate::error::FetchError;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price level in the order book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// Price at this level, a probability in [0, 1]
    pub price: Decimal,
    /// Total size available, in shares
    pub size: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// Both price and size strictly positive
    pub fn is_valid(&self) -> bool {
        self.price > Decimal::ZERO && self.size > Decimal::ZERO
    }
}

/// Remote order book provider, keyed by token id
#[async_trait]
pub trait OrderBookSource: Send + Sync {
    /// Fetch the current book for one outcome token
    async fn fetch_book(&self, token_id: &str) -> Result<OrderBook, FetchError>;
}
