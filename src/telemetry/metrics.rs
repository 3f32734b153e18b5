//! Prometheus metrics

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Markets returned by the catalog
    MarketsFetched,
    /// Markets passing catalog-level eligibility
    MarketsEligible,
    /// Order book fetches that failed and were skipped
    BookFetchFailures,
    /// Opportunities produced by a scan
    Opportunities,
    /// Positions opened
    PositionsOpened,
    /// Positions closed
    PositionsClosed,
    /// Exits priced at best bid because the sell simulation failed
    DegradedExits,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Open position count (0 or 1)
    OpenPositions,
    /// Unrealized P&L of the open position at best bid
    UnrealizedPnl,
    /// P&L of the most recently closed trade
    LastRealizedPnl,
    /// Tokens tracked in the snapshot document
    TrackedTokens,
}

impl CounterMetric {
    fn name(self) -> &'static str {
        match self {
            CounterMetric::MarketsFetched => "polyscout_markets_fetched_total",
            CounterMetric::MarketsEligible => "polyscout_markets_eligible_total",
            CounterMetric::BookFetchFailures => "polyscout_book_fetch_failures_total",
            CounterMetric::Opportunities => "polyscout_opportunities_total",
            CounterMetric::PositionsOpened => "polyscout_positions_opened_total",
            CounterMetric::PositionsClosed => "polyscout_positions_closed_total",
            CounterMetric::DegradedExits => "polyscout_degraded_exits_total",
        }
    }
}

impl GaugeMetric {
    fn name(self) -> &'static str {
        match self {
            GaugeMetric::OpenPositions => "polyscout_open_positions",
            GaugeMetric::UnrealizedPnl => "polyscout_unrealized_pnl_usd",
            GaugeMetric::LastRealizedPnl => "polyscout_last_realized_pnl_usd",
            GaugeMetric::TrackedTokens => "polyscout_tracked_tokens",
        }
    }
}

/// Increment a counter
pub fn increment(metric: CounterMetric, by: u64) {
    ::metrics::counter!(metric.name()).increment(by);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
    tracing::trace!(metric = metric.name(), value, "Setting gauge");
}
