//! Shared fakes for integration tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use poly_scout::error::FetchError;
use poly_scout::market::{Market, MarketCatalog};
use poly_scout::orderbook::{OrderBook, OrderBookSource, PriceLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Mutex;

/// Catalog returning a fixed market list
pub struct StaticCatalog(pub Vec<Market>);

#[async_trait]
impl MarketCatalog for StaticCatalog {
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<Market>, FetchError> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }
}

/// Order books keyed by token, replaceable between cycles
#[derive(Default)]
pub struct BookTable {
    books: Mutex<HashMap<String, OrderBook>>,
    pub fetches: Mutex<Vec<String>>,
}

impl BookTable {
    pub fn quote(&self, token: &str, bid: Decimal, ask: Decimal, size: Decimal) {
        self.insert(OrderBook::with_levels(
            token,
            vec![PriceLevel::new(bid, size)],
            vec![PriceLevel::new(ask, size)],
        ));
    }

    pub fn insert(&self, book: OrderBook) {
        self.books
            .lock()
            .unwrap()
            .insert(book.token_id.clone(), book);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl OrderBookSource for BookTable {
    async fn fetch_book(&self, token_id: &str) -> Result<OrderBook, FetchError> {
        self.fetches.lock().unwrap().push(token_id.to_string());
        self.books
            .lock()
            .unwrap()
            .get(token_id)
            .cloned()
            .ok_or(FetchError::Status {
                source_name: "clob",
                status: 404,
                body: "not found".to_string(),
            })
    }
}

/// Liquid binary market ending within the default window
pub fn binary_market(id: &str, volume: Decimal, now: DateTime<Utc>) -> Market {
    Market {
        id: id.to_string(),
        condition_id: format!("0x{id}"),
        question: format!("Question {id}?"),
        slug: format!("question-{id}"),
        end_time: Some(now + Duration::hours(24)),
        volume_24h: volume,
        liquidity: dec!(15000),
        outcomes: vec!["Yes".to_string(), "No".to_string()],
        outcome_prices: vec![dec!(0.5), dec!(0.5)],
        token_ids: vec![format!("{id}-yes"), format!("{id}-no")],
        active: true,
        closed: false,
        enable_order_book: true,
        accepting_orders: Some(true),
    }
}
