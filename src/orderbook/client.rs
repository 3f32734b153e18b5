//! Polymarket CLOB REST client for order book snapshots
//!
//! The `/book` endpoint returns bids and asks as decimal strings with no
//! ordering guarantee. Unparseable or non-positive levels are dropped here so
//! nothing downstream has to care about them.

use super::{OrderBook, OrderBookSource, PriceLevel};
use crate::error::FetchError;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

/// Polymarket CLOB REST base URL
pub const CLOB_API_URL: &str = "https://clob.polymarket.com";

/// Configuration for the CLOB client
#[derive(Debug, Clone)]
pub struct ClobConfig {
    /// Base URL for the CLOB API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClobConfig {
    fn default() -> Self {
        Self {
            base_url: CLOB_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// REST client for Polymarket order books
pub struct ClobClient {
    config: ClobConfig,
    client: Client,
}

impl ClobClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(ClobConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClobConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl OrderBookSource for ClobClient {
    async fn fetch_book(&self, token_id: &str) -> Result<OrderBook, FetchError> {
        let url = format!("{}/book", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("token_id", token_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                source_name: "clob",
                status,
                body,
            });
        }

        let text = response.text().await?;
        let book = parse_book_response(token_id, &text)?;

        tracing::debug!(
            token_id,
            bid_levels = book.bids.len(),
            ask_levels = book.asks.len(),
            best_bid = ?book.best_bid(),
            best_ask = ?book.best_ask(),
            "Fetched order book"
        );

        Ok(book)
    }
}

/// Order book response from `/book`
#[derive(Debug, Deserialize)]
struct BookResponse {
    #[serde(default)]
    asset_id: Option<String>,
    #[serde(default)]
    bids: Vec<BookLevel>,
    #[serde(default)]
    asks: Vec<BookLevel>,
    #[serde(default)]
    timestamp: Option<String>,
}

/// Price level on the wire; both fields are decimal strings but numbers are
/// accepted too
#[derive(Debug, Deserialize)]
struct BookLevel {
    price: serde_json::Value,
    size: serde_json::Value,
}

fn parse_book_response(token_id: &str, text: &str) -> Result<OrderBook, FetchError> {
    let raw: BookResponse = serde_json::from_str(text).map_err(|e| FetchError::Decode {
        source_name: "clob",
        message: e.to_string(),
    })?;

    let updated_at = raw
        .timestamp
        .as_deref()
        .and_then(|ts| ts.parse::<i64>().ok())
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
        .unwrap_or_else(Utc::now);

    Ok(OrderBook {
        token_id: raw.asset_id.unwrap_or_else(|| token_id.to_string()),
        bids: convert_levels(raw.bids),
        asks: convert_levels(raw.asks),
        updated_at,
    })
}

fn convert_levels(levels: Vec<BookLevel>) -> Vec<PriceLevel> {
    levels
        .into_iter()
        .filter_map(|level| {
            let price = decimal_from_json(&level.price)?;
            let size = decimal_from_json(&level.size)?;
            let level = PriceLevel { price, size };
            level.is_valid().then_some(level)
        })
        .collect()
}

/// Coerce a JSON number or numeric string into a Decimal
///
/// NaN, infinities and anything unparseable come back as `None`.
pub(crate) fn decimal_from_json(value: &serde_json::Value) -> Option<Decimal> {
    use rust_decimal::prelude::FromPrimitive;

    match value {
        serde_json::Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .ok()
                .or_else(|| Decimal::from_scientific(s).ok())
        }
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        _ => None,
    }
}
