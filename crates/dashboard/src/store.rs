//! History store: the single source of truth for every panel.
//!
//! A run's history and summary live together in one [`RunSnapshot`] behind an
//! `Arc`. Replacing the store swaps that one pointer, so a reader holding a
//! snapshot always sees history and summary from the same run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sim_contract::{HistoryRecord, SimulationParams, SimulationResult, SummaryRecord};

/// Identifier of a committed run. Equal to the sequence number of the request
/// that produced it, so later runs always compare greater.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RunId(pub u64);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// One committed run. Never mutated after construction.
#[derive(Debug, Clone, Serialize)]
pub struct RunSnapshot {
    pub id: RunId,
    /// Parameters the run was requested with.
    pub params: SimulationParams,
    pub result: SimulationResult,
    pub completed_at: DateTime<Utc>,
}

impl RunSnapshot {
    pub fn history(&self) -> &[HistoryRecord] {
        &self.result.history
    }

    pub fn summary(&self) -> &SummaryRecord {
        &self.result.summary
    }

    /// Record for `day` in this run.
    pub fn record(&self, day: u32) -> Option<&HistoryRecord> {
        self.result.record(day)
    }
}

/// Holds the latest accepted run, or nothing before the first success.
#[derive(Debug, Default)]
pub struct HistoryStore {
    current: Option<Arc<RunSnapshot>>,
    replacements: u64,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the current run.
    pub fn current(&self) -> Option<Arc<RunSnapshot>> {
        self.current.clone()
    }

    /// Borrow the current run without bumping the refcount.
    pub fn peek(&self) -> Option<&RunSnapshot> {
        self.current.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Number of successful replacements so far.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Swap in a new run wholesale. Returns the handle now current.
    pub fn replace(&mut self, next: RunSnapshot) -> Arc<RunSnapshot> {
        let next = Arc::new(next);
        self.current = Some(Arc::clone(&next));
        self.replacements += 1;
        next
    }
}
