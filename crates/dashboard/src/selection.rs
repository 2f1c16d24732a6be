//! The single active day shared by every chart.
//!
//! Any panel may publish a hover; the most recent one wins regardless of
//! which panel raised it. Panels keep no selection of their own and read
//! [`ActiveDaySelector::current`] when rendering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sim_contract::HistoryRecord;

use crate::panels::PanelKind;
use crate::store::RunId;

/// The active day and where it came from.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Selection {
    /// Run the record belongs to.
    pub run: RunId,
    pub record: HistoryRecord,
    /// Panel whose hover produced the selection.
    pub source: PanelKind,
}

/// Holds at most one selected day.
#[derive(Debug, Default)]
pub struct ActiveDaySelector {
    current: Option<Selection>,
    version: u64,
}

impl ActiveDaySelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `record` the active day. Last write wins.
    pub fn select(&mut self, run: RunId, record: &HistoryRecord, source: PanelKind) {
        self.current = Some(Selection {
            run,
            record: record.clone(),
            source,
        });
        self.version += 1;
    }

    /// Drop the selection. Returns whether there was one.
    pub fn clear(&mut self) -> bool {
        let had = self.current.take().is_some();
        if had {
            self.version += 1;
        }
        had
    }

    pub fn current(&self) -> Option<&HistoryRecord> {
        self.current.as_ref().map(|s| &s.record)
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Incremented on every change, for observers that poll.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Decode a hover payload from a chart front end.
///
/// Accepts either the record object itself or a chart state of the form
/// `{"activePayload": [{"payload": <record>}]}`. Anything that does not
/// deserialize to a complete [`HistoryRecord`] yields `None`.
pub fn record_from_payload(payload: &Value) -> Option<HistoryRecord> {
    let inner = payload
        .pointer("/activePayload/0/payload")
        .unwrap_or(payload);
    HistoryRecord::deserialize(inner).ok()
}
