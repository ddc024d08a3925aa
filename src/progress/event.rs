//! Typed events pushed to run observers

use crate::types::{OperationRecord, ProgressSummary, SortError};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One update from a run
///
/// Serialized as `{"type": "operation" | "summary", "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A file reached its terminal outcome
    Operation(OperationRecord),
    /// Counters after the latest change
    Summary(ProgressSummary),
}

impl ProgressEvent {
    /// JSON encoding consumed by web and `--json` observers
    pub fn to_json(&self) -> Result<String, SortError> {
        serde_json::to_string(self)
            .map_err(|e| SortError::Io(std::io::Error::other(e.to_string())))
    }

    /// Whether this is the last event of a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressEvent::Summary(s) if s.completed)
    }
}

/// Receiving half handed to observers
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

pub(crate) type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;
