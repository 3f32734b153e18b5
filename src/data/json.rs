//! JSON document store on the local filesystem

use super::{LastClosed, RunState, StateStore, StoreError};
use crate::position::{ClosedTradeSummary, TradeEvent};
use crate::snapshot::SnapshotBook;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const SNAPSHOTS_FILE: &str = "snapshots.json";
const STATE_FILE: &str = "state.json";
const LAST_CLOSED_FILE: &str = "last_closed.json";
const TRADES_DIR: &str = "trades";
const CLOSED_DIR: &str = "closed";

/// Stores each document as a JSON file under one directory
///
/// ```text
/// state_dir/
///   snapshots.json
///   state.json
///   last_closed.json
///   trades/<position-id>.jsonl
///   closed/<position-id>.json
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `root`, creating the directory layout
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { root: root.into() };
        store.ensure_dirs()?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dirs(&self) -> Result<(), StoreError> {
        fs::create_dir_all(self.root.join(TRADES_DIR))?;
        fs::create_dir_all(self.root.join(CLOSED_DIR))?;
        Ok(())
    }

    fn events_path(&self, position_id: Uuid) -> PathBuf {
        self.root.join(TRADES_DIR).join(format!("{}.jsonl", position_id))
    }

    fn summary_path(&self, position_id: Uuid) -> PathBuf {
        self.root.join(CLOSED_DIR).join(format!("{}.json", position_id))
    }

    /// Write via a temp file and rename so readers never see a torn document
    fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<(), StoreError> {
        let path = self.root.join(name);
        let tmp = self.root.join(format!("{}.tmp", name));

        let mut file = File::create(&tmp)?;
        serde_json::to_writer_pretty(&mut file, value)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;

        tracing::trace!(path = ?path, "Wrote document");
        Ok(())
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl StateStore for JsonFileStore {
    fn load_snapshots(&self) -> Result<SnapshotBook, StoreError> {
        Ok(Self::read_json(&self.root.join(SNAPSHOTS_FILE))?.unwrap_or_default())
    }

    fn save_snapshots(&self, book: &SnapshotBook) -> Result<(), StoreError> {
        self.write_json(SNAPSHOTS_FILE, book)
    }

    fn load_run_state(&self) -> Result<Option<RunState>, StoreError> {
        Self::read_json(&self.root.join(STATE_FILE))
    }

    fn save_run_state(&self, state: &RunState) -> Result<(), StoreError> {
        self.write_json(STATE_FILE, state)
    }

    fn append_event(&self, position_id: Uuid, event: &TradeEvent) -> Result<(), StoreError> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.events_path(position_id))?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn load_events(&self, position_id: Uuid) -> Result<Vec<TradeEvent>, StoreError> {
        let content = match fs::read_to_string(self.events_path(position_id)) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StoreError::from))
            .collect()
    }

    fn write_summary(&self, summary: &ClosedTradeSummary) -> Result<(), StoreError> {
        let path = self.summary_path(summary.position_id);
        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::SummaryExists(summary.position_id));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::to_writer_pretty(&file, summary)?;
        file.sync_all()?;

        tracing::debug!(path = ?path, "Wrote trade summary");
        Ok(())
    }

    fn load_summary(&self, position_id: Uuid) -> Result<Option<ClosedTradeSummary>, StoreError> {
        Self::read_json(&self.summary_path(position_id))
    }

    fn load_last_closed(&self) -> Result<Option<LastClosed>, StoreError> {
        Self::read_json(&self.root.join(LAST_CLOSED_FILE))
    }

    fn save_last_closed(&self, pointer: &LastClosed) -> Result<(), StoreError> {
        self.write_json(LAST_CLOSED_FILE, pointer)
    }
}
