//! Per-token price snapshots
//!
//! The last observed mid/bid/ask for every token the scanner has looked at.
//! Entries are overwritten on each observation and never removed, so the next
//! cycle can measure how far a token's mid moved in between.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last observed price state for one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub mid: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub observed_at: DateTime<Utc>,
}

/// The persisted snapshot document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotBook {
    /// Time of the most recent observation of any token
    pub observation_time: Option<DateTime<Utc>>,
    pub by_token: BTreeMap<String, Snapshot>,
}

impl SnapshotBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation, replacing any previous entry for the token
    pub fn observe(&mut self, token_id: &str, snapshot: Snapshot) {
        let at = snapshot.observed_at;
        self.by_token.insert(token_id.to_string(), snapshot);
        self.observation_time = Some(self.observation_time.map_or(at, |t| t.max(at)));
    }

    pub fn get(&self, token_id: &str) -> Option<&Snapshot> {
        self.by_token.get(token_id)
    }

    /// Absolute mid move since the previous observation; zero for unseen tokens
    pub fn abs_move(&self, token_id: &str, mid: Decimal) -> Decimal {
        self.get(token_id)
            .map(|prev| (mid - prev.mid).abs())
            .unwrap_or(Decimal::ZERO)
    }

    pub fn len(&self) -> usize {
        self.by_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_token.is_empty()
    }
}
