//! Simulated position lifecycle

mod lifecycle;
mod types;

pub use lifecycle::PositionLifecycle;
pub use types::{
    BookState, ClosedTradeSummary, EntryFill, ExitPricing, ExitReason, ExitThresholds,
    LifecycleError, Mark, Position, PositionStatus, TickOutcome, TradeEvent,
};
