//! Gamma API client for market discovery
//!
//! Fetches open markets ordered by 24h volume. Gamma encodes several array
//! fields as JSON strings and is inconsistent about numbers vs. strings, so
//! every field is coerced leniently and missing values fall back to defaults.
//! Such markets are then dropped by the scanner's eligibility filter.

use super::{Market, MarketCatalog};
use crate::error::FetchError;
use crate::orderbook::decimal_from_json;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

/// Gamma API base URL
pub const GAMMA_API_URL: &str = "https://gamma-api.polymarket.com";

/// Configuration for the Gamma client
#[derive(Debug, Clone)]
pub struct GammaConfig {
    /// Base URL for the Gamma API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GammaConfig {
    fn default() -> Self {
        Self {
            base_url: GAMMA_API_URL.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Client for Polymarket's Gamma API
pub struct GammaClient {
    config: GammaConfig,
    client: Client,
}

impl GammaClient {
    /// Create a new Gamma API client with default configuration
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(GammaConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: GammaConfig) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl MarketCatalog for GammaClient {
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<Market>, FetchError> {
        let url = format!("{}/markets", self.config.base_url);
        let limit = limit.to_string();

        tracing::debug!(url = %url, limit = %limit, "Fetching markets from Gamma API");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("active", "true"),
                ("closed", "false"),
                ("order", "volume24hr"),
                ("ascending", "false"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                source_name: "gamma",
                status,
                body,
            });
        }

        let text = response.text().await?;
        let markets = parse_markets_response(&text)?;

        tracing::info!(market_count = markets.len(), "Fetched markets from Gamma");
        Ok(markets)
    }
}

/// Raw market record from Gamma API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GammaMarket {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    condition_id: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
    #[serde(default)]
    end_date_iso: Option<String>,
    #[serde(default)]
    volume24hr: serde_json::Value,
    #[serde(default)]
    liquidity_num: serde_json::Value,
    #[serde(default)]
    liquidity: serde_json::Value,
    /// JSON array, usually string-encoded
    #[serde(default)]
    outcomes: serde_json::Value,
    /// JSON array, usually string-encoded
    #[serde(default)]
    outcome_prices: serde_json::Value,
    /// JSON array, usually string-encoded
    #[serde(default)]
    clob_token_ids: serde_json::Value,
    #[serde(default)]
    active: Option<bool>,
    #[serde(default)]
    closed: Option<bool>,
    #[serde(default)]
    enable_order_book: Option<bool>,
    #[serde(default)]
    accepting_orders: Option<bool>,
}

fn parse_markets_response(text: &str) -> Result<Vec<Market>, FetchError> {
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|e| FetchError::Decode {
            source_name: "gamma",
            message: e.to_string(),
        })?;

    let markets = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<GammaMarket>(value) {
            Ok(gamma) => Some(convert_to_market(gamma)),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable market record");
                None
            }
        })
        .collect();

    Ok(markets)
}

/// Convert a GammaMarket to our Market type
fn convert_to_market(gamma: GammaMarket) -> Market {
    let id = match &gamma.id {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    };

    let end_time = gamma
        .end_date
        .as_deref()
        .or(gamma.end_date_iso.as_deref())
        .and_then(parse_timestamp);

    let liquidity = decimal_from_json(&gamma.liquidity_num)
        .or_else(|| decimal_from_json(&gamma.liquidity))
        .unwrap_or(Decimal::ZERO);

    Market {
        id,
        condition_id: gamma.condition_id.unwrap_or_default(),
        question: gamma.question.unwrap_or_default(),
        slug: gamma.slug.unwrap_or_default(),
        end_time,
        volume_24h: decimal_from_json(&gamma.volume24hr).unwrap_or(Decimal::ZERO),
        liquidity,
        outcomes: parse_string_list(&gamma.outcomes),
        outcome_prices: parse_price_list(&gamma.outcome_prices),
        token_ids: parse_string_list(&gamma.clob_token_ids),
        active: gamma.active.unwrap_or(false),
        closed: gamma.closed.unwrap_or(false),
        enable_order_book: gamma.enable_order_book.unwrap_or(false),
        accepting_orders: gamma.accepting_orders,
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as midnight UTC)
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Unwrap a Gamma array field that may be string-encoded JSON
fn json_array(value: &serde_json::Value) -> Vec<serde_json::Value> {
    match value {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::String(s) => serde_json::from_str(s).unwrap_or_default(),
        _ => vec![],
    }
}

/// Parse a list of strings, e.g. `"[\"Yes\", \"No\"]"`
fn parse_string_list(value: &serde_json::Value) -> Vec<String> {
    json_array(value)
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect()
}

/// Parse a list of prices, e.g. `"[\"0.52\", \"0.48\"]"`
///
/// Any unparseable entry empties the list, since prices pair with tokens
/// by position.
fn parse_price_list(value: &serde_json::Value) -> Vec<Decimal> {
    json_array(value)
        .iter()
        .map(decimal_from_json)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default()
}
