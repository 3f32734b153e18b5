//! State persistence
//!
//! Everything the poll loop needs to survive a restart: the snapshot
//! document, the run state (including the open position), per-trade event
//! logs, closed-trade summaries and the last-closed pointer.

mod json;
mod memory;

pub use json::JsonFileStore;
pub use memory::MemoryStore;

use crate::position::{ClosedTradeSummary, Position, TradeEvent};
use crate::snapshot::SnapshotBook;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Persistence errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Summaries are write-once
    #[error("Summary for position {0} already written")]
    SummaryExists(Uuid),
}

/// Run state carried between poll cycles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunState {
    pub created_at: DateTime<Utc>,
    pub last_scan_at: Option<DateTime<Utc>>,
    /// The single open position, if any
    pub open_position: Option<Position>,
    pub last_closed_id: Option<Uuid>,
}

impl RunState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            last_scan_at: None,
            open_position: None,
            last_closed_id: None,
        }
    }
}

/// Pointer to the most recently closed trade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastClosed {
    pub position_id: Uuid,
    pub closed_at: DateTime<Utc>,
    /// Set once the close has been reported
    pub notified: bool,
}

/// Storage backend for the poll loop's documents
pub trait StateStore: Send + Sync {
    /// Snapshot document; empty when none was saved yet
    fn load_snapshots(&self) -> Result<SnapshotBook, StoreError>;
    fn save_snapshots(&self, book: &SnapshotBook) -> Result<(), StoreError>;

    fn load_run_state(&self) -> Result<Option<RunState>, StoreError>;
    fn save_run_state(&self, state: &RunState) -> Result<(), StoreError>;

    /// Append to a position's event log
    fn append_event(&self, position_id: Uuid, event: &TradeEvent) -> Result<(), StoreError>;
    fn load_events(&self, position_id: Uuid) -> Result<Vec<TradeEvent>, StoreError>;

    /// Write a closed-trade summary; fails if one already exists
    fn write_summary(&self, summary: &ClosedTradeSummary) -> Result<(), StoreError>;
    fn load_summary(&self, position_id: Uuid) -> Result<Option<ClosedTradeSummary>, StoreError>;

    fn load_last_closed(&self) -> Result<Option<LastClosed>, StoreError>;
    fn save_last_closed(&self, pointer: &LastClosed) -> Result<(), StoreError>;

    /// Record a close: summary first, then the pointer
    fn record_close(&self, summary: &ClosedTradeSummary) -> Result<(), StoreError> {
        self.write_summary(summary)?;
        self.save_last_closed(&LastClosed {
            position_id: summary.position_id,
            closed_at: summary.closed_at,
            notified: false,
        })
    }

    /// Last closed trade if it hasn't been reported yet, marking it reported
    fn take_unnotified(&self) -> Result<Option<ClosedTradeSummary>, StoreError> {
        let Some(mut pointer) = self.load_last_closed()? else {
            return Ok(None);
        };
        if pointer.notified {
            return Ok(None);
        }
        let summary = self.load_summary(pointer.position_id)?;
        pointer.notified = true;
        self.save_last_closed(&pointer)?;
        Ok(summary)
    }
}
