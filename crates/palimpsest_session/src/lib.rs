//! Draft tracking and streaming run aggregation for Palimpsest.
//!
//! An [`EditSession`] holds one entity's selected version, the draft being
//! edited, the version most recently created from that draft, and the live
//! logs of in-flight runs. Around it:
//!
//! - [`compare`] derives the equality and staleness booleans that gate Save and Run
//! - [`fold_run_event`] folds one streamed event into a run log entry
//! - [`RunDispatcher`] starts runs and applies folded events to the session
//! - [`VersionActions`] fetches, saves, publishes and patches versions
//! - [`watch_changes`] follows the realtime feed and refetches on change

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod actions;
pub mod compare;
mod config;
mod dispatcher;
mod fold;
mod observer;
mod session;
mod target;
mod watcher;

pub use actions::VersionActions;
pub use compare::{DraftIssue, DraftStatus};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use dispatcher::{RunDispatcher, RunEnd, RunOutcome};
pub use fold::{RunEffect, RunFold, UNKNOWN_FAILURE, fold_run_event};
pub use observer::{
    Observed, RecordingObserver, SessionObserver, Toast, ToastLevel, TracingObserver,
};
pub use session::{EditSession, RunLogMap, SharedSession};
pub use target::RunTarget;
pub use watcher::watch_changes;

pub use tokio_util::sync::CancellationToken;
