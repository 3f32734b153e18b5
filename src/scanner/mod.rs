//! Opportunity scanning module
//!
//! Candidate markets → eligibility → order books → token selection → hard
//! filters → score → rank.

mod filter;
mod score;
mod types;

pub use filter::{check_market, FilterResult, RejectReason};
pub use score::{ScoreInputs, ScoringModel};
pub use types::{Opportunity, ScanMode, TokenQuote};

use crate::config::{ScannerConfig, ScoringConfig};
use crate::execution::{simulate_fill, BookSide};
use crate::market::Market;
use crate::orderbook::OrderBookSource;
use crate::snapshot::{Snapshot, SnapshotBook};
use crate::telemetry::{self, CounterMetric};
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use rust_decimal::Decimal;

/// Scans catalog markets for entry opportunities
pub struct Scanner {
    config: ScannerConfig,
    model: ScoringModel,
}

impl Scanner {
    pub fn new(config: ScannerConfig, scoring: ScoringConfig) -> Self {
        Self {
            config,
            model: ScoringModel::new(scoring),
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scan `markets` and return opportunities ranked best first
    ///
    /// Every token whose book yields a two-sided quote is written to
    /// `snapshots`, including tokens of markets rejected later on.
    pub async fn scan(
        &self,
        markets: &[Market],
        books: &dyn OrderBookSource,
        snapshots: &mut SnapshotBook,
        mode: ScanMode,
        now: DateTime<Utc>,
    ) -> Vec<Opportunity> {
        let eligible: Vec<&Market> = markets
            .iter()
            .filter(|m| match check_market(m, &self.config, mode, now) {
                FilterResult::Pass => true,
                FilterResult::Reject(reason) => {
                    tracing::trace!(market_id = %m.id, ?reason, "Market filtered");
                    false
                }
            })
            .collect();

        telemetry::increment(CounterMetric::MarketsFetched, markets.len() as u64);
        telemetry::increment(CounterMetric::MarketsEligible, eligible.len() as u64);
        tracing::debug!(
            fetched = markets.len(),
            eligible = eligible.len(),
            ?mode,
            "Markets passed eligibility"
        );

        let mut opportunities = Vec::new();
        for market in eligible {
            let quotes = self.quote_market(market, books, snapshots, mode, now).await;
            match self.evaluate(market, quotes, mode, now) {
                Ok(opportunity) => opportunities.push(opportunity),
                Err(reason) => {
                    tracing::debug!(market_id = %market.id, ?reason, "Candidate rejected");
                }
            }
        }

        rank(&mut opportunities);
        let keep = match mode {
            ScanMode::Report => self.config.max_alerts,
            ScanMode::Live => 1,
        };
        opportunities.truncate(keep);

        telemetry::increment(CounterMetric::Opportunities, opportunities.len() as u64);
        opportunities
    }

    /// Fetch books for a market's tokens concurrently and record snapshots
    async fn quote_market(
        &self,
        market: &Market,
        books: &dyn OrderBookSource,
        snapshots: &mut SnapshotBook,
        mode: ScanMode,
        now: DateTime<Utc>,
    ) -> Vec<TokenQuote> {
        // Live mode treats the market as a complementary binary pair
        let token_count = match mode {
            ScanMode::Report => market.token_ids.len(),
            ScanMode::Live => 2,
        };
        let tokens = &market.token_ids[..token_count.min(market.token_ids.len())];

        let results = join_all(tokens.iter().map(|token| books.fetch_book(token))).await;

        let mut quotes = Vec::with_capacity(tokens.len());
        for (index, (token_id, result)) in tokens.iter().zip(results).enumerate() {
            let book = match result {
                Ok(book) => book,
                Err(e) => {
                    telemetry::increment(CounterMetric::BookFetchFailures, 1);
                    tracing::warn!(
                        market_id = %market.id,
                        token_id = %token_id,
                        error = %e,
                        "Failed to fetch order book, skipping token"
                    );
                    continue;
                }
            };

            let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) else {
                tracing::trace!(token_id = %token_id, "One-sided book, skipping token");
                continue;
            };
            let mid = (bid + ask) / Decimal::TWO;
            let abs_move = snapshots.abs_move(token_id, mid);

            snapshots.observe(
                token_id,
                Snapshot {
                    mid,
                    bid,
                    ask,
                    observed_at: now,
                },
            );

            quotes.push(TokenQuote {
                index,
                token_id: token_id.clone(),
                book,
                bid,
                ask,
                mid,
                spread: ask - bid,
                abs_move,
            });
        }

        quotes
    }

    /// Select a token and apply the post-quote gates
    fn evaluate(
        &self,
        market: &Market,
        quotes: Vec<TokenQuote>,
        mode: ScanMode,
        now: DateTime<Utc>,
    ) -> Result<Opportunity, RejectReason> {
        let quote = match mode {
            ScanMode::Report => select_by_reference(market, quotes),
            ScanMode::Live => select_by_move(quotes),
        }
        .ok_or(RejectReason::NoQuotes)?;

        if quote.spread > self.config.max_spread {
            return Err(RejectReason::SpreadTooWide(quote.spread));
        }

        let buy_fill = simulate_fill(&quote.book, BookSide::Buy, self.config.notional)
            .ok_or(RejectReason::InsufficientDepth)?;

        if mode == ScanMode::Live && quote.abs_move < self.config.min_move {
            return Err(RejectReason::MoveTooSmall(quote.abs_move));
        }

        let slippage_buy = buy_fill.slippage_from(quote.ask);
        // No exit depth at this size saturates the penalty
        let slippage_sell = simulate_fill(&quote.book, BookSide::Sell, self.config.notional)
            .map(|fill| fill.slippage_from(quote.bid))
            .unwrap_or(Decimal::ONE);

        let score = self.model.score(&ScoreInputs {
            spread: quote.spread,
            volume_24h: market.volume_24h,
            liquidity: market.liquidity,
            abs_move: quote.abs_move,
            slippage_buy,
            slippage_sell,
        });

        Ok(Opportunity {
            market: market.clone(),
            outcome: market.outcome_label(quote.index),
            outcome_index: quote.index,
            token_id: quote.token_id,
            book: quote.book,
            bid: quote.bid,
            ask: quote.ask,
            mid: quote.mid,
            spread: quote.spread,
            abs_move: quote.abs_move,
            buy_fill,
            slippage_buy,
            slippage_sell,
            score,
            observed_at: now,
        })
    }
}

/// Token whose mid is closest to its outcome's published price; first wins ties
fn select_by_reference(market: &Market, quotes: Vec<TokenQuote>) -> Option<TokenQuote> {
    let mut best: Option<(Decimal, TokenQuote)> = None;
    for quote in quotes {
        let Some(reference) = market.outcome_prices.get(quote.index) else {
            continue;
        };
        let distance = (quote.mid - *reference).abs();
        if best.as_ref().map_or(true, |(d, _)| distance < *d) {
            best = Some((distance, quote));
        }
    }
    best.map(|(_, quote)| quote)
}

/// Token with the largest move since the last snapshot; first wins ties
fn select_by_move(quotes: Vec<TokenQuote>) -> Option<TokenQuote> {
    let mut best: Option<TokenQuote> = None;
    for quote in quotes {
        if best.as_ref().map_or(true, |b| quote.abs_move > b.abs_move) {
            best = Some(quote);
        }
    }
    best
}

/// Descending by score; stable, so equal scores keep catalog order
fn rank(opportunities: &mut [Opportunity]) {
    opportunities.sort_by(|a, b| b.score.cmp(&a.score));
}
