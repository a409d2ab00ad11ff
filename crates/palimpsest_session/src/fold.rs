//! Folding streamed run events into a run log entry.
//!
//! [`fold_run_event`] is a pure reducer: it never touches a session, a
//! backend or an observer. Side effects the event calls for come back as
//! [`RunEffect`]s for the caller to apply.

use palimpsest_core::{FunctionCallRecord, RunEvent, RunLogEntry, RunStatus, VersionId};
use serde::Serialize;

/// Something the caller must do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "effect")]
pub enum RunEffect {
    /// The backend created a version for this run
    VersionCreated {
        /// New version id
        id: VersionId,
        /// New version number, when reported
        ordinal: Option<u32>,
    },
    /// The run finished and its log is persisted
    Completed,
    /// The run failed
    Failed {
        /// Message to show the user
        message: String,
    },
}

/// Result of folding one event.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFold {
    /// The updated entry
    pub entry: RunLogEntry,
    /// Effects requested by the event, in the order they must be applied
    pub effects: Vec<RunEffect>,
}

impl RunFold {
    /// Whether the event ended the run.
    pub fn is_terminal(&self) -> bool {
        self.entry.status.is_terminal()
    }
}

/// Default message when a failure event carries no log.
pub const UNKNOWN_FAILURE: &str = "Run failed without a message";

/// Fold one event into `entry`.
///
/// Fragments are concatenated in arrival order with no separator and no
/// deduplication. Parsed outputs concatenate per key. A function call
/// replaces any earlier one; a function response appends to the current
/// call's response. The status is applied last, so an event that carries
/// both output and `completed` keeps its output.
///
/// # Examples
///
/// ```
/// use palimpsest_core::{RunEvent, RunLogEntry};
/// use palimpsest_session::fold_run_event;
///
/// let entry = RunLogEntry::default();
/// let entry = fold_run_event(entry, &RunEvent::raw("He")).entry;
/// let entry = fold_run_event(entry, &RunEvent::raw("llo")).entry;
/// assert_eq!(entry.raw_output, "Hello");
/// ```
pub fn fold_run_event(mut entry: RunLogEntry, event: &RunEvent) -> RunFold {
    let mut effects = Vec::new();

    if let Some(id) = &event.version_id {
        effects.push(RunEffect::VersionCreated {
            id: id.clone(),
            ordinal: event.version_ordinal,
        });
    }

    if let Some(inputs) = &event.inputs {
        entry.inputs = Some(inputs.clone());
    }

    if let Some(fragment) = &event.raw_output {
        entry.raw_output.push_str(fragment);
    }

    if let Some(parsed) = &event.parsed_outputs {
        for (key, fragment) in parsed {
            entry
                .parsed_outputs
                .entry(key.clone())
                .or_default()
                .push_str(fragment);
        }
    }

    if let Some(call) = &event.function_call {
        entry.function_call = Some(FunctionCallRecord {
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            response: None,
        });
    }

    if let Some(response) = &event.function_response {
        let piece = match response {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        let record = entry.function_call.get_or_insert_with(|| {
            tracing::warn!("Function response arrived before any function call");
            FunctionCallRecord {
                name: String::new(),
                arguments: serde_json::Value::Null,
                response: None,
            }
        });
        record.response.get_or_insert_with(String::new).push_str(&piece);
    }

    if let Some(status) = event.status {
        entry.status = status;
        match status {
            RunStatus::Completed => effects.push(RunEffect::Completed),
            RunStatus::Failed => effects.push(RunEffect::Failed {
                message: event
                    .log
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
            }),
            RunStatus::Running => {}
        }
    }

    RunFold { entry, effects }
}

#[cfg(test)]
mod tests {
    use super::*;
    use palimpsest_core::FunctionCallPayload;
    use std::collections::BTreeMap;

    fn parsed(key: &str, value: &str) -> RunEvent {
        RunEvent {
            parsed_outputs: Some(BTreeMap::from([(key.to_string(), value.to_string())])),
            ..Default::default()
        }
    }

    #[test]
    fn parsed_outputs_concatenate_per_key() {
        let entry = fold_run_event(RunLogEntry::default(), &parsed("a", "1")).entry;
        let entry = fold_run_event(entry, &parsed("b", "x")).entry;
        let entry = fold_run_event(entry, &parsed("a", "2")).entry;

        assert_eq!(entry.parsed_outputs["a"], "12");
        assert_eq!(entry.parsed_outputs["b"], "x");
    }

    #[test]
    fn function_response_appends_to_current_call() {
        let call = RunEvent {
            function_call: Some(FunctionCallPayload {
                name: "get_weather".into(),
                arguments: serde_json::json!({"city": "Oslo"}),
            }),
            ..Default::default()
        };
        let first = RunEvent {
            function_response: Some(serde_json::json!("{\"temp\":")),
            ..Default::default()
        };
        let second = RunEvent {
            function_response: Some(serde_json::json!(4)),
            ..Default::default()
        };

        let entry = fold_run_event(RunLogEntry::default(), &call).entry;
        let entry = fold_run_event(entry, &first).entry;
        let entry = fold_run_event(entry, &second).entry;

        let record = entry.function_call.unwrap();
        assert_eq!(record.name, "get_weather");
        assert_eq!(record.response.as_deref(), Some("{\"temp\":4"));
    }

    #[test]
    fn new_function_call_replaces_previous_record() {
        let mut entry = RunLogEntry::default();
        for name in ["first", "second"] {
            let event = RunEvent {
                function_call: Some(FunctionCallPayload {
                    name: name.into(),
                    arguments: serde_json::Value::Null,
                }),
                function_response: Some(serde_json::json!("r")),
                ..Default::default()
            };
            entry = fold_run_event(entry, &event).entry;
        }
        let record = entry.function_call.unwrap();
        assert_eq!(record.name, "second");
        assert_eq!(record.response.as_deref(), Some("r"));
    }

    #[test]
    fn failure_without_log_gets_default_message() {
        let fold = fold_run_event(
            RunLogEntry::default(),
            &RunEvent::status(RunStatus::Failed, None),
        );
        assert!(fold.is_terminal());
        assert_eq!(
            fold.effects,
            vec![RunEffect::Failed {
                message: UNKNOWN_FAILURE.to_string()
            }]
        );
    }

    #[test]
    fn version_effect_precedes_status_effect() {
        let event = RunEvent {
            version_id: Some("v9".into()),
            version_ordinal: Some(9),
            status: Some(RunStatus::Completed),
            raw_output: Some("done".into()),
            ..Default::default()
        };
        let fold = fold_run_event(RunLogEntry::default(), &event);

        assert_eq!(fold.entry.raw_output, "done");
        assert_eq!(
            fold.effects,
            vec![
                RunEffect::VersionCreated {
                    id: "v9".into(),
                    ordinal: Some(9)
                },
                RunEffect::Completed
            ]
        );
    }
}
