//! In-process store

use super::{LastClosed, RunState, StateStore, StoreError};
use crate::position::{ClosedTradeSummary, TradeEvent};
use crate::snapshot::SnapshotBook;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    snapshots: SnapshotBook,
    run_state: Option<RunState>,
    events: HashMap<Uuid, Vec<TradeEvent>>,
    summaries: HashMap<Uuid, ClosedTradeSummary>,
    last_closed: Option<LastClosed>,
}

/// Keeps every document in memory; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl StateStore for MemoryStore {
    fn load_snapshots(&self) -> Result<SnapshotBook, StoreError> {
        Ok(self.lock().snapshots.clone())
    }

    fn save_snapshots(&self, book: &SnapshotBook) -> Result<(), StoreError> {
        self.lock().snapshots = book.clone();
        Ok(())
    }

    fn load_run_state(&self) -> Result<Option<RunState>, StoreError> {
        Ok(self.lock().run_state.clone())
    }

    fn save_run_state(&self, state: &RunState) -> Result<(), StoreError> {
        self.lock().run_state = Some(state.clone());
        Ok(())
    }

    fn append_event(&self, position_id: Uuid, event: &TradeEvent) -> Result<(), StoreError> {
        self.lock()
            .events
            .entry(position_id)
            .or_default()
            .push(event.clone());
        Ok(())
    }

    fn load_events(&self, position_id: Uuid) -> Result<Vec<TradeEvent>, StoreError> {
        Ok(self
            .lock()
            .events
            .get(&position_id)
            .cloned()
            .unwrap_or_default())
    }

    fn write_summary(&self, summary: &ClosedTradeSummary) -> Result<(), StoreError> {
        let mut inner = self.lock();
        if inner.summaries.contains_key(&summary.position_id) {
            return Err(StoreError::SummaryExists(summary.position_id));
        }
        inner.summaries.insert(summary.position_id, summary.clone());
        Ok(())
    }

    fn load_summary(&self, position_id: Uuid) -> Result<Option<ClosedTradeSummary>, StoreError> {
        Ok(self.lock().summaries.get(&position_id).cloned())
    }

    fn load_last_closed(&self) -> Result<Option<LastClosed>, StoreError> {
        Ok(self.lock().last_closed.clone())
    }

    fn save_last_closed(&self, pointer: &LastClosed) -> Result<(), StoreError> {
        self.lock().last_closed = Some(pointer.clone());
        Ok(())
    }
}
