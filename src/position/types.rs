//! Position types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    TimeStop,
}

/// Lifecycle status of a position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionStatus {
    Open,
    Closed(ExitReason),
}

/// How the exit price was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPricing {
    /// Sell-side fill simulation
    Simulated,
    /// Not enough bid depth; priced at best bid
    BestBidFallback,
}

/// Top of book at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookState {
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
}

/// Simulated entry execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFill {
    pub avg_price: Decimal,
    pub shares: Decimal,
    /// Currency spent; the position's cost basis
    pub cost: Decimal,
    pub book: BookState,
}

/// Exit rule parameters fixed at entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitThresholds {
    pub take_profit: Decimal,
    pub stop_loss: Decimal,
    pub max_hold_secs: u64,
}

/// Most recent mark-to-market
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub mid: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub at: DateTime<Utc>,
    /// P&L if sold at `bid`
    pub unrealized_pnl: Decimal,
}

/// The single simulated position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Derived from open time, market and token
    pub id: Uuid,
    pub opened_at: DateTime<Utc>,
    pub market_id: String,
    pub question: String,
    pub token_id: String,
    pub outcome: String,
    pub notional: Decimal,
    pub entry: EntryFill,
    pub exits: ExitThresholds,
    pub status: PositionStatus,
    pub last_mark: Option<Mark>,
}

impl Position {
    /// Deterministic id for a position opened at `opened_at` on a token
    pub fn derive_id(opened_at: DateTime<Utc>, market_id: &str, token_id: &str) -> Uuid {
        let name = format!("{}:{}:{}", opened_at.timestamp_millis(), market_id, token_id);
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }

    pub fn is_open(&self) -> bool {
        self.status == PositionStatus::Open
    }

    /// Record the exit reason; the position leaves the live slot after this
    pub fn mark_closed(&mut self, reason: ExitReason) {
        self.status = PositionStatus::Closed(reason);
    }
}

/// Immutable record of a finished trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedTradeSummary {
    pub position_id: Uuid,
    pub market_id: String,
    pub question: String,
    pub token_id: String,
    pub outcome: String,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub entry_avg_price: Decimal,
    pub exit_avg_price: Decimal,
    pub shares: Decimal,
    pub pnl: Decimal,
    pub reason: ExitReason,
    pub exit_pricing: ExitPricing,
}

impl ClosedTradeSummary {
    /// Summarize a closed position; `None` while it is still open
    pub fn from_position(
        position: Position,
        exit_avg_price: Decimal,
        exit_pricing: ExitPricing,
        closed_at: DateTime<Utc>,
    ) -> Option<Self> {
        let PositionStatus::Closed(reason) = position.status else {
            return None;
        };
        Some(Self {
            position_id: position.id,
            market_id: position.market_id,
            question: position.question,
            token_id: position.token_id,
            outcome: position.outcome,
            opened_at: position.opened_at,
            closed_at,
            duration_secs: (closed_at - position.opened_at).num_seconds(),
            entry_avg_price: position.entry.avg_price,
            exit_avg_price,
            shares: position.entry.shares,
            pnl: (exit_avg_price - position.entry.avg_price) * position.entry.shares,
            reason,
            exit_pricing,
        })
    }
}

/// Outcome of one monitoring tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// No exit fired; position marked
    Holding(Mark),
    /// An exit fired; the slot is now empty
    Closed {
        summary: ClosedTradeSummary,
        /// Mark taken on the closing tick, if the book was two-sided
        mark: Option<Mark>,
    },
    /// Book had no usable bid and no earlier mark exists
    NoQuote,
}

/// Entries in the per-trade event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "UPPERCASE")]
pub enum TradeEvent {
    Open {
        time: DateTime<Utc>,
        market_id: String,
        token_id: String,
        entry_avg_price: Decimal,
        shares: Decimal,
        take_profit: Decimal,
        stop_loss: Decimal,
    },
    Mark {
        time: DateTime<Utc>,
        mid: Decimal,
        bid: Decimal,
        ask: Decimal,
        unrealized_pnl: Decimal,
    },
    Close {
        time: DateTime<Utc>,
        reason: ExitReason,
        exit_avg_price: Decimal,
        pnl: Decimal,
        exit_pricing: ExitPricing,
    },
}

impl TradeEvent {
    pub fn opened(position: &Position) -> Self {
        TradeEvent::Open {
            time: position.opened_at,
            market_id: position.market_id.clone(),
            token_id: position.token_id.clone(),
            entry_avg_price: position.entry.avg_price,
            shares: position.entry.shares,
            take_profit: position.exits.take_profit,
            stop_loss: position.exits.stop_loss,
        }
    }

    pub fn marked(mark: &Mark) -> Self {
        TradeEvent::Mark {
            time: mark.at,
            mid: mark.mid,
            bid: mark.bid,
            ask: mark.ask,
            unrealized_pnl: mark.unrealized_pnl,
        }
    }

    pub fn closed(summary: &ClosedTradeSummary) -> Self {
        TradeEvent::Close {
            time: summary.closed_at,
            reason: summary.reason,
            exit_avg_price: summary.exit_avg_price,
            pnl: summary.pnl,
            exit_pricing: summary.exit_pricing,
        }
    }
}

/// Position lifecycle errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    /// A position is already open
    #[error("Position {0} is already open")]
    PositionAlreadyOpen(Uuid),
    /// Not enough ask depth to enter at the configured notional
    #[error("No executable entry for token {0}")]
    NoExecutableEntry(String),
    /// Nothing to close
    #[error("No open position")]
    NoOpenPosition,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    #[test]
    fn test_derive_id_is_deterministic() {
        let at = Utc::now();
        let a = Position::derive_id(at, "m1", "tok");
        assert_eq!(a, Position::derive_id(at, "m1", "tok"));
        assert_ne!(a, Position::derive_id(at, "m1", "other"));
        assert_ne!(a, Position::derive_id(at + Duration::milliseconds(1), "m1", "tok"));
    }

    #[test]
    fn test_status_serialization() {
        let open = serde_json::to_value(PositionStatus::Open).unwrap();
        assert_eq!(open, serde_json::json!({"state": "OPEN"}));

        let closed = serde_json::to_value(PositionStatus::Closed(ExitReason::TakeProfit)).unwrap();
        assert_eq!(
            closed,
            serde_json::json!({"state": "CLOSED", "reason": "TAKE_PROFIT"})
        );
    }

    fn position(opened_at: DateTime<Utc>) -> Position {
        Position {
            id: Position::derive_id(opened_at, "m1", "tok"),
            opened_at,
            market_id: "m1".to_string(),
            question: "Will it rain?".to_string(),
            token_id: "tok".to_string(),
            outcome: "Yes".to_string(),
            notional: dec!(50),
            entry: EntryFill {
                avg_price: dec!(0.40),
                shares: dec!(125),
                cost: dec!(50),
                book: BookState {
                    bid: dec!(0.39),
                    ask: dec!(0.40),
                    mid: dec!(0.395),
                },
            },
            exits: ExitThresholds {
                take_profit: dec!(0.42),
                stop_loss: dec!(0.38),
                max_hold_secs: 1800,
            },
            status: PositionStatus::Open,
            last_mark: None,
        }
    }

    #[test]
    fn test_summary_requires_closed_status() {
        let opened_at = Utc::now();
        let closed_at = opened_at + Duration::seconds(90);
        let mut p = position(opened_at);

        let pending = ClosedTradeSummary::from_position(
            p.clone(),
            dec!(0.43),
            ExitPricing::Simulated,
            closed_at,
        );
        assert!(pending.is_none());

        p.mark_closed(ExitReason::TakeProfit);
        assert!(!p.is_open());
        assert_eq!(p.status, PositionStatus::Closed(ExitReason::TakeProfit));

        let summary =
            ClosedTradeSummary::from_position(p, dec!(0.43), ExitPricing::Simulated, closed_at)
                .unwrap();
        assert_eq!(summary.reason, ExitReason::TakeProfit);
        assert_eq!(summary.pnl, dec!(3.75));
        assert_eq!(summary.duration_secs, 90);
    }

    #[test]
    fn test_trade_event_tagging() {
        let event = TradeEvent::Mark {
            time: Utc::now(),
            mid: dec!(0.5),
            bid: dec!(0.49),
            ask: dec!(0.51),
            unrealized_pnl: dec!(-1.2),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "MARK");

        let back: TradeEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
