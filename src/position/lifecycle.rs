//! Single-slot position state machine
//!
//! `None` → `Open` on promotion of an opportunity; `Open` → closed (and back
//! to `None`) when an exit rule fires on a monitoring tick.

use super::types::{
    BookState, ClosedTradeSummary, EntryFill, ExitPricing, ExitReason, ExitThresholds,
    LifecycleError, Mark, Position, PositionStatus, TickOutcome,
};
use crate::config::PositionConfig;
use crate::execution::{simulate_fill, BookSide};
use crate::orderbook::OrderBook;
use crate::scanner::Opportunity;
use crate::telemetry::{self, CounterMetric, GaugeMetric};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Highest take-profit price a binary outcome can reach
const MAX_TAKE_PROFIT: Decimal = dec!(0.999);
/// Lowest stop-loss price a binary outcome can reach
const MIN_STOP_LOSS: Decimal = dec!(0.001);

/// Opens, marks and closes the simulated position
#[derive(Debug, Clone)]
pub struct PositionLifecycle {
    config: PositionConfig,
}

impl PositionLifecycle {
    pub fn new(config: PositionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PositionConfig {
        &self.config
    }

    /// Promote an opportunity into the empty slot
    ///
    /// The entry price is re-simulated on the opportunity's book at the
    /// position notional.
    pub fn open<'a>(
        &self,
        slot: &'a mut Option<Position>,
        opportunity: &Opportunity,
        now: DateTime<Utc>,
    ) -> Result<&'a Position, LifecycleError> {
        if let Some(existing) = slot.as_ref() {
            return Err(LifecycleError::PositionAlreadyOpen(existing.id));
        }

        let notional = self.config.notional;
        let fill = simulate_fill(&opportunity.book, BookSide::Buy, notional)
            .ok_or_else(|| LifecycleError::NoExecutableEntry(opportunity.token_id.clone()))?;

        let entry_price = fill.avg_price;
        let exits = ExitThresholds {
            take_profit: (entry_price + self.config.take_profit_offset).min(MAX_TAKE_PROFIT),
            stop_loss: (entry_price - self.config.stop_loss_offset).max(MIN_STOP_LOSS),
            max_hold_secs: self.config.max_hold_secs,
        };

        let position = Position {
            id: Position::derive_id(now, &opportunity.market.id, &opportunity.token_id),
            opened_at: now,
            market_id: opportunity.market.id.clone(),
            question: opportunity.market.question.clone(),
            token_id: opportunity.token_id.clone(),
            outcome: opportunity.outcome.clone(),
            notional,
            entry: EntryFill {
                avg_price: entry_price,
                shares: fill.shares,
                cost: fill.notional_filled,
                book: BookState {
                    bid: opportunity.bid,
                    ask: opportunity.ask,
                    mid: opportunity.mid,
                },
            },
            exits,
            status: PositionStatus::Open,
            last_mark: None,
        };

        tracing::info!(
            position_id = %position.id,
            market = %position.question,
            outcome = %position.outcome,
            entry = %entry_price,
            shares = %fill.shares,
            take_profit = %exits.take_profit,
            stop_loss = %exits.stop_loss,
            "Opened position"
        );
        telemetry::increment(CounterMetric::PositionsOpened, 1);
        telemetry::set_gauge(GaugeMetric::OpenPositions, 1.0);

        Ok(slot.insert(position))
    }

    /// First exit rule that fires at `bid`, if any
    ///
    /// Time stop is checked first and short-circuits the price rules.
    pub fn evaluate_exit(
        &self,
        position: &Position,
        bid: Decimal,
        now: DateTime<Utc>,
    ) -> Option<ExitReason> {
        let max_hold = i64::try_from(position.exits.max_hold_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX);
        if now - position.opened_at >= max_hold {
            return Some(ExitReason::TimeStop);
        }
        if bid >= position.exits.take_profit {
            return Some(ExitReason::TakeProfit);
        }
        if bid <= position.exits.stop_loss {
            return Some(ExitReason::StopLoss);
        }
        None
    }

    /// Mark the position to a two-sided book
    pub fn mark(
        &self,
        position: &mut Position,
        book: &OrderBook,
        now: DateTime<Utc>,
    ) -> Option<Mark> {
        let (bid, ask) = (book.best_bid()?, book.best_ask()?);
        let mark = Mark {
            mid: (bid + ask) / Decimal::TWO,
            bid,
            ask,
            at: now,
            unrealized_pnl: (bid - position.entry.avg_price) * position.entry.shares,
        };
        telemetry::set_gauge(
            GaugeMetric::UnrealizedPnl,
            mark.unrealized_pnl.to_f64().unwrap_or(0.0),
        );
        position.last_mark = Some(mark.clone());
        Some(mark)
    }

    /// One monitoring step: mark, evaluate exits, close if one fired
    ///
    /// Exits are evaluated against the book's best bid, or the last marked bid
    /// when the book has none.
    pub fn tick(
        &self,
        slot: &mut Option<Position>,
        book: &OrderBook,
        now: DateTime<Utc>,
    ) -> Result<TickOutcome, LifecycleError> {
        let position = slot.as_mut().ok_or(LifecycleError::NoOpenPosition)?;

        let fresh = self.mark(position, book, now);
        let bid = book
            .best_bid()
            .or_else(|| position.last_mark.as_ref().map(|m| m.bid));
        let Some(bid) = bid else {
            tracing::debug!(token = %position.token_id, "No bid to evaluate exits against");
            return Ok(TickOutcome::NoQuote);
        };

        match self.evaluate_exit(position, bid, now) {
            Some(reason) => self
                .close(slot, book, bid, reason, now)
                .map(|summary| TickOutcome::Closed {
                    summary,
                    mark: fresh,
                }),
            None => Ok(fresh.map_or(TickOutcome::NoQuote, TickOutcome::Holding)),
        }
    }

    /// Close the open position and clear the slot
    fn close(
        &self,
        slot: &mut Option<Position>,
        book: &OrderBook,
        bid: Decimal,
        reason: ExitReason,
        now: DateTime<Utc>,
    ) -> Result<ClosedTradeSummary, LifecycleError> {
        let mut position = slot.take().ok_or(LifecycleError::NoOpenPosition)?;

        let exit_notional = position.notional.min(position.entry.cost);
        let (exit_avg_price, exit_pricing) =
            match simulate_fill(book, BookSide::Sell, exit_notional) {
                Some(fill) => (fill.avg_price, ExitPricing::Simulated),
                None => {
                    tracing::warn!(
                        position_id = %position.id,
                        token = %position.token_id,
                        notional = %exit_notional,
                        bid = %bid,
                        "Insufficient bid depth for exit, pricing at best bid"
                    );
                    telemetry::increment(CounterMetric::DegradedExits, 1);
                    (bid, ExitPricing::BestBidFallback)
                }
            };

        position.mark_closed(reason);
        let summary =
            ClosedTradeSummary::from_position(position, exit_avg_price, exit_pricing, now)
                .ok_or(LifecycleError::NoOpenPosition)?;
        let pnl = summary.pnl;

        tracing::info!(
            position_id = %summary.position_id,
            reason = ?reason,
            entry = %summary.entry_avg_price,
            exit = %exit_avg_price,
            pnl = %pnl,
            duration_secs = summary.duration_secs,
            "Closed position"
        );
        telemetry::increment(CounterMetric::PositionsClosed, 1);
        telemetry::set_gauge(GaugeMetric::OpenPositions, 0.0);
        telemetry::set_gauge(GaugeMetric::UnrealizedPnl, 0.0);
        telemetry::set_gauge(GaugeMetric::LastRealizedPnl, pnl.to_f64().unwrap_or(0.0));

        Ok(summary)
    }
}

impl Default for PositionLifecycle {
    fn default() -> Self {
        Self::new(PositionConfig::default())
    }
}
