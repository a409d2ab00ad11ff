//! Notifications the session engine sends to its host.

use palimpsest_core::VersionKey;
use serde::Serialize;
use std::sync::Mutex;

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    /// Neutral information
    Info,
    /// Something finished well
    Success,
    /// Something went wrong
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    /// Severity
    pub level: ToastLevel,
    /// Text to show
    pub message: String,
}

impl Toast {
    /// Informational toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
        }
    }

    /// Success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            message: message.into(),
        }
    }

    /// Error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            message: message.into(),
        }
    }
}

/// Receiver of session notifications.
///
/// Callbacks are synchronous and are never invoked while the session lock
/// is held, so implementations may read the session.
pub trait SessionObserver: Send + Sync {
    /// Show a notification.
    fn on_toast(&self, _toast: &Toast) {}

    /// Persisted run logs of `key` changed; refetch them.
    fn on_run_logs_invalidated(&self, _key: &VersionKey) {}

    /// The version list changed; refetch it.
    fn on_versions_invalidated(&self) {}
}

/// Observer that turns notifications into tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SessionObserver for TracingObserver {
    fn on_toast(&self, toast: &Toast) {
        match toast.level {
            ToastLevel::Error => tracing::error!(message = %toast.message, "toast"),
            ToastLevel::Success | ToastLevel::Info => {
                tracing::info!(level = ?toast.level, message = %toast.message, "toast")
            }
        }
    }

    fn on_run_logs_invalidated(&self, key: &VersionKey) {
        tracing::debug!(version = %key, "Run logs invalidated");
    }

    fn on_versions_invalidated(&self) {
        tracing::debug!("Version list invalidated");
    }
}

/// One recorded notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Observed {
    /// A toast
    Toast(Toast),
    /// A run-log invalidation
    RunLogsInvalidated {
        /// Affected bucket
        version: VersionKey,
    },
    /// A version-list invalidation
    VersionsInvalidated,
}

/// Observer that keeps every notification in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Observed>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<Observed> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Only the toasts.
    pub fn toasts(&self) -> Vec<Toast> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Observed::Toast(toast) => Some(toast),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: Observed) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl SessionObserver for RecordingObserver {
    fn on_toast(&self, toast: &Toast) {
        self.record(Observed::Toast(toast.clone()));
    }

    fn on_run_logs_invalidated(&self, key: &VersionKey) {
        self.record(Observed::RunLogsInvalidated {
            version: key.clone(),
        });
    }

    fn on_versions_invalidated(&self) {
        self.record(Observed::VersionsInvalidated);
    }
}
