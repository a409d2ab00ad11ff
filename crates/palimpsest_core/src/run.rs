//! Streaming run events and the run log they accumulate into.

use crate::VersionId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle status reported by a streaming run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RunStatus {
    /// Still streaming
    #[default]
    Running,
    /// Finished; the backend has persisted the log
    Completed,
    /// Aborted by the backend; the log carries the reason
    Failed,
}

impl RunStatus {
    /// Whether no further events are expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// A function call as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallPayload {
    /// Function name
    pub name: String,
    /// Arguments chosen by the model
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// One event of a streaming run.
///
/// A single event may carry several fields at once; every field is optional.
///
/// # Examples
///
/// ```
/// use palimpsest_core::{RunEvent, RunStatus};
///
/// let event: RunEvent = serde_json::from_str(r#"{"raw_output": "He"}"#).unwrap();
/// assert_eq!(event.raw_output.as_deref(), Some("He"));
///
/// let done: RunEvent = serde_json::from_str(r#"{"status": "completed"}"#).unwrap();
/// assert_eq!(done.status, Some(RunStatus::Completed));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunEvent {
    /// Lifecycle status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
    /// Error or diagnostic message accompanying a status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    /// Id of a version the backend created for this run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<VersionId>,
    /// Ordinal of the created version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_ordinal: Option<u32>,
    /// Inputs the backend resolved for the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inputs: Option<BTreeMap<String, serde_json::Value>>,
    /// Next fragment of raw model output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
    /// Next fragments of parsed outputs, by key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_outputs: Option<BTreeMap<String, String>>,
    /// Function the model decided to call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCallPayload>,
    /// Result of the function call, possibly in pieces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<serde_json::Value>,
}

impl RunEvent {
    /// Event carrying only a raw output fragment.
    pub fn raw(fragment: impl Into<String>) -> Self {
        Self {
            raw_output: Some(fragment.into()),
            ..Default::default()
        }
    }

    /// Event carrying only a status, with an optional message.
    pub fn status(status: RunStatus, log: Option<String>) -> Self {
        Self {
            status: Some(status),
            log,
            ..Default::default()
        }
    }
}

/// Accumulated function-call state of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCallRecord {
    /// Function name
    pub name: String,
    /// Arguments chosen by the model
    pub arguments: serde_json::Value,
    /// Streamed response text
    pub response: Option<String>,
}

/// Everything streamed so far for one run invocation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunLogEntry {
    /// Resolved inputs
    pub inputs: Option<BTreeMap<String, serde_json::Value>>,
    /// Raw output, concatenated in arrival order
    pub raw_output: String,
    /// Parsed outputs, each concatenated in arrival order
    pub parsed_outputs: BTreeMap<String, String>,
    /// Function call, if the model made one
    pub function_call: Option<FunctionCallRecord>,
    /// Last reported status
    pub status: RunStatus,
}
