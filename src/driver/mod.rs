//! Scan driver
//!
//! Wires catalog, order books, scanner, lifecycle and storage into either a
//! single-shot report or one step of the poll/monitor loop.

mod scheduler;

pub use scheduler::Scheduler;

use crate::data::{RunState, StateStore};
use crate::market::MarketCatalog;
use crate::orderbook::{OrderBook, OrderBookSource};
use crate::position::{
    ClosedTradeSummary, LifecycleError, Mark, Position, PositionLifecycle, TickOutcome,
    TradeEvent,
};
use crate::scanner::{Opportunity, ScanMode, Scanner};
use crate::snapshot::Snapshot;
use crate::telemetry::{self, GaugeMetric};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// What one poll cycle did
#[derive(Debug, Clone)]
pub enum CycleOutcome {
    /// Scanned and promoted the best opportunity
    Opened(Position),
    /// Scanned; nothing worth entering
    NoOpportunity,
    /// Open position marked, no exit
    Held(Mark),
    /// Open position closed
    Closed(ClosedTradeSummary),
    /// Open position could not be priced this tick
    NoQuote,
}

/// Runs scans and monitoring ticks against shared collaborators
pub struct Driver {
    catalog: Arc<dyn MarketCatalog>,
    books: Arc<dyn OrderBookSource>,
    store: Arc<dyn StateStore>,
    scanner: Scanner,
    lifecycle: PositionLifecycle,
}

impl Driver {
    pub fn new(
        catalog: Arc<dyn MarketCatalog>,
        books: Arc<dyn OrderBookSource>,
        store: Arc<dyn StateStore>,
        scanner: Scanner,
        lifecycle: PositionLifecycle,
    ) -> Self {
        Self {
            catalog,
            books,
            store,
            scanner,
            lifecycle,
        }
    }

    pub fn store(&self) -> &dyn StateStore {
        self.store.as_ref()
    }

    /// Persisted run state, or a fresh one
    pub fn load_state(&self, now: DateTime<Utc>) -> anyhow::Result<RunState> {
        Ok(self
            .store
            .load_run_state()?
            .unwrap_or_else(|| RunState::new(now)))
    }

    /// Single-shot report: top opportunities by score
    pub async fn report_once(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Opportunity>> {
        self.scan(ScanMode::Report, now).await
    }

    /// One poll cycle
    ///
    /// Monitors the open position if there is one, otherwise scans and
    /// promotes the single best opportunity. The updated state is persisted
    /// and handed back.
    pub async fn cycle(
        &self,
        mut state: RunState,
        now: DateTime<Utc>,
    ) -> anyhow::Result<(RunState, CycleOutcome)> {
        let outcome = if state.open_position.is_some() {
            self.monitor(&mut state, now).await?
        } else {
            self.scan_and_open(&mut state, now).await?
        };

        self.store.save_run_state(&state)?;
        Ok((state, outcome))
    }

    async fn scan(&self, mode: ScanMode, now: DateTime<Utc>) -> anyhow::Result<Vec<Opportunity>> {
        let limit = self.scanner.config().fetch_limit;
        let markets = self.catalog.fetch_markets(limit).await?;

        let mut snapshots = self.store.load_snapshots()?;
        let opportunities = self
            .scanner
            .scan(&markets, self.books.as_ref(), &mut snapshots, mode, now)
            .await;
        self.store.save_snapshots(&snapshots)?;
        telemetry::set_gauge(GaugeMetric::TrackedTokens, snapshots.len() as f64);

        Ok(opportunities)
    }

    async fn scan_and_open(
        &self,
        state: &mut RunState,
        now: DateTime<Utc>,
    ) -> anyhow::Result<CycleOutcome> {
        let opportunities = self.scan(ScanMode::Live, now).await?;
        state.last_scan_at = Some(now);

        let Some(best) = opportunities.first() else {
            tracing::debug!("No opportunity this cycle");
            return Ok(CycleOutcome::NoOpportunity);
        };

        let position = match self.lifecycle.open(&mut state.open_position, best, now) {
            Ok(position) => position.clone(),
            Err(LifecycleError::NoExecutableEntry(token)) => {
                tracing::warn!(token = %token, "Best opportunity has no executable entry");
                return Ok(CycleOutcome::NoOpportunity);
            }
            Err(e) => return Err(e.into()),
        };

        self.store
            .append_event(position.id, &TradeEvent::opened(&position))?;
        Ok(CycleOutcome::Opened(position))
    }

    async fn monitor(
        &self,
        state: &mut RunState,
        now: DateTime<Utc>,
    ) -> anyhow::Result<CycleOutcome> {
        let Some(position) = state.open_position.as_ref() else {
            return Ok(CycleOutcome::NoQuote);
        };
        let position_id = position.id;
        let token_id = position.token_id.clone();

        // An unreachable book still lets the time stop fire on the last mark
        let book = match self.books.fetch_book(&token_id).await {
            Ok(book) => book,
            Err(e) => {
                tracing::warn!(token = %token_id, error = %e, "Failed to fetch position book");
                telemetry::increment(telemetry::CounterMetric::BookFetchFailures, 1);
                OrderBook::new(token_id.clone())
            }
        };

        self.refresh_snapshot(&token_id, &book, now)?;

        match self.lifecycle.tick(&mut state.open_position, &book, now)? {
            TickOutcome::Holding(mark) => {
                self.store
                    .append_event(position_id, &TradeEvent::marked(&mark))?;
                Ok(CycleOutcome::Held(mark))
            }
            TickOutcome::Closed { summary, mark } => {
                if let Some(mark) = mark {
                    self.store
                        .append_event(position_id, &TradeEvent::marked(&mark))?;
                }
                self.store
                    .append_event(position_id, &TradeEvent::closed(&summary))?;
                self.store.record_close(&summary)?;
                state.last_closed_id = Some(summary.position_id);
                Ok(CycleOutcome::Closed(summary))
            }
            TickOutcome::NoQuote => Ok(CycleOutcome::NoQuote),
        }
    }

    fn refresh_snapshot(
        &self,
        token_id: &str,
        book: &OrderBook,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let (Some(bid), Some(ask)) = (book.best_bid(), book.best_ask()) else {
            return Ok(());
        };

        let mut snapshots = self.store.load_snapshots()?;
        snapshots.observe(
            token_id,
            Snapshot {
                mid: (bid + ask) / rust_decimal::Decimal::TWO,
                bid,
                ask,
                observed_at: now,
            },
        );
        self.store.save_snapshots(&snapshots)?;
        Ok(())
    }
}
