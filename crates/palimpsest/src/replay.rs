//! Folding a recorded run offline.

use palimpsest_core::{RunEvent, RunLogEntry};
use palimpsest_error::{JsonError, PalimpsestResult};
use palimpsest_session::{RunEffect, fold_run_event};
use serde::Serialize;

/// What a recorded event stream folds into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaySummary {
    /// Events folded, up to and including the terminal one
    pub events: usize,
    /// Events after the terminal status, which a live run never reads
    pub ignored: usize,
    /// The folded entry
    pub entry: RunLogEntry,
    /// Every effect the events requested, in order
    pub effects: Vec<RunEffect>,
    /// Whether a completed or failed status arrived
    pub terminated: bool,
}

/// Fold newline-delimited JSON run events, as a backend would stream them.
///
/// Blank lines are skipped. Folding stops at the first terminal status.
///
/// # Examples
///
/// ```
/// use palimpsest::replay_events;
///
/// let summary = replay_events(
///     r#"{"raw_output": "Hel"}
/// {"raw_output": "lo"}
/// {"status": "completed"}"#,
/// )
/// .unwrap();
/// assert_eq!(summary.entry.raw_output, "Hello");
/// assert!(summary.terminated);
/// ```
#[tracing::instrument(skip(text))]
pub fn replay_events(text: &str) -> PalimpsestResult<ReplaySummary> {
    let mut summary = ReplaySummary {
        events: 0,
        ignored: 0,
        entry: RunLogEntry::default(),
        effects: Vec::new(),
        terminated: false,
    };

    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if summary.terminated {
            summary.ignored += 1;
            continue;
        }
        let event: RunEvent = serde_json::from_str(line).map_err(|e| {
            JsonError::new(format!("Invalid run event on line {}: {}", number + 1, e))
        })?;
        let fold = fold_run_event(std::mem::take(&mut summary.entry), &event);
        summary.terminated = fold.is_terminal();
        summary.entry = fold.entry;
        summary.effects.extend(fold.effects);
        summary.events += 1;
    }

    if summary.ignored > 0 {
        tracing::warn!(ignored = summary.ignored, "Events after terminal status ignored");
    }
    Ok(summary)
}
