//! In-memory implementation of every backend trait.
//!
//! Versions, scripted run events and change subscribers live in one
//! `RwLock`-protected state. All data is lost when the backend is dropped.

use crate::{ChangeFeed, ChangeStream, RunBackend, RunEventStream, VersionSource, VersionWriter};
use async_trait::async_trait;
use chrono::Utc;
use palimpsest_core::{
    ChangeNotice, ChangeScope, CreateVersionRequest, PublishRequest, RunEvent, RunRequest,
    RunStatus, Version, VersionFields, VersionId,
};
use palimpsest_error::{BackendError, BackendErrorKind, PalimpsestError, PalimpsestResult};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};

/// One step of a scripted run.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedEvent {
    /// Yield this event
    Event(RunEvent),
    /// Yield a stream error with this message
    Error(String),
}

#[derive(Debug, Default)]
struct State {
    versions: Vec<Version>,
    scripts: VecDeque<Vec<ScriptedEvent>>,
    run_requests: Vec<RunRequest>,
    publish_requests: Vec<PublishRequest>,
    subscribers: Vec<mpsc::UnboundedSender<ChangeNotice>>,
    channels: Vec<String>,
    unavailable: bool,
    next_id: u64,
}

impl State {
    fn check_available(&self) -> PalimpsestResult<()> {
        if self.unavailable {
            return Err(BackendError::new(BackendErrorKind::Unavailable(
                "in-memory backend switched off".to_string(),
            ))
            .into());
        }
        Ok(())
    }

    fn find_mut(&mut self, id: &VersionId) -> PalimpsestResult<&mut Version> {
        self.versions
            .iter_mut()
            .find(|v| &v.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn create(&mut self, fields: VersionFields, from_version: Option<VersionId>) -> Version {
        self.next_id += 1;
        let ordinal = self
            .versions
            .iter()
            .map(|v| v.ordinal)
            .max()
            .unwrap_or(0)
            .saturating_add(1);
        let version = Version {
            id: VersionId::from(format!("mem-{}", self.next_id)),
            ordinal,
            from_version,
            is_published: false,
            tags: Vec::new(),
            memo: None,
            author: None,
            created_at: Utc::now(),
            fields,
        };
        tracing::debug!(id = %version.id, ordinal, "Created in-memory version");
        self.versions.push(version.clone());
        version
    }

    fn broadcast(&mut self, notice: ChangeNotice) {
        self.subscribers.retain(|tx| tx.send(notice.clone()).is_ok());
    }
}

fn not_found(id: &VersionId) -> PalimpsestError {
    BackendError::new(BackendErrorKind::NotFound(format!("version {}", id))).into()
}

/// Backend that keeps everything in memory.
///
/// Runs replay scripts queued with [`InMemoryBackend::push_script`]; with no
/// script queued a run completes immediately. A run without a version id
/// creates a version first and reports it in the opening event, the way the
/// real run-and-create call does.
///
/// # Example
///
/// ```no_run
/// use palimpsest_interface::{InMemoryBackend, VersionSource};
///
/// #[tokio::main]
/// async fn main() {
///     let backend = InMemoryBackend::new();
///     assert!(backend.list_versions().await.unwrap().is_empty());
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<State>>,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend holding the given versions.
    pub fn with_versions(versions: Vec<Version>) -> Self {
        let state = State {
            versions,
            ..Default::default()
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Queue the events the next run will stream.
    pub async fn push_script(&self, script: Vec<ScriptedEvent>) {
        self.state.write().await.scripts.push_back(script);
    }

    /// Make every call fail with an unavailable error (or stop doing so).
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.write().await.unavailable = unavailable;
    }

    /// Snapshot of the stored versions.
    pub async fn versions(&self) -> Vec<Version> {
        self.state.read().await.versions.clone()
    }

    /// Every run request received so far.
    pub async fn run_requests(&self) -> Vec<RunRequest> {
        self.state.read().await.run_requests.clone()
    }

    /// Every publish request received so far.
    pub async fn publish_requests(&self) -> Vec<PublishRequest> {
        self.state.read().await.publish_requests.clone()
    }

    /// Channel names passed to `subscribe`, in order.
    pub async fn subscribed_channels(&self) -> Vec<String> {
        self.state.read().await.channels.clone()
    }

    /// Deliver a change notice to every subscriber.
    pub async fn notify(&self, notice: ChangeNotice) {
        self.state.write().await.broadcast(notice);
    }
}

#[async_trait]
impl VersionSource for InMemoryBackend {
    async fn list_versions(&self) -> PalimpsestResult<Vec<Version>> {
        let state = self.state.read().await;
        state.check_available()?;
        let mut versions = state.versions.clone();
        versions.sort_by_key(|v| v.ordinal);
        Ok(versions)
    }

    async fn fetch_version(&self, id: &VersionId) -> PalimpsestResult<Version> {
        let state = self.state.read().await;
        state.check_available()?;
        state
            .versions
            .iter()
            .find(|v| &v.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl VersionWriter for InMemoryBackend {
    async fn create_version(&self, req: &CreateVersionRequest) -> PalimpsestResult<Version> {
        let mut state = self.state.write().await;
        state.check_available()?;
        let version = state.create(req.fields.clone(), req.from_version.clone());
        state.broadcast(ChangeNotice {
            scope: ChangeScope::Versions,
            version_id: Some(version.id.clone()),
        });
        Ok(version)
    }

    async fn publish(&self, req: &PublishRequest) -> PalimpsestResult<()> {
        let mut state = self.state.write().await;
        state.check_available()?;
        state.find_mut(&req.version_id)?;
        for version in state.versions.iter_mut() {
            version.is_published = version.id == req.version_id;
        }
        state.publish_requests.push(req.clone());
        state.broadcast(ChangeNotice {
            scope: ChangeScope::Versions,
            version_id: Some(req.version_id.clone()),
        });
        Ok(())
    }

    async fn update_memo(&self, id: &VersionId, memo: Option<String>) -> PalimpsestResult<()> {
        let mut state = self.state.write().await;
        state.check_available()?;
        state.find_mut(id)?.memo = memo;
        Ok(())
    }

    async fn update_tags(&self, id: &VersionId, tags: Vec<String>) -> PalimpsestResult<()> {
        let mut state = self.state.write().await;
        state.check_available()?;
        state.find_mut(id)?.tags = tags;
        Ok(())
    }
}

#[async_trait]
impl RunBackend for InMemoryBackend {
    async fn run_stream(&self, req: &RunRequest) -> PalimpsestResult<RunEventStream> {
        let mut state = self.state.write().await;
        state.check_available()?;
        state.run_requests.push(req.clone());

        let mut events: Vec<PalimpsestResult<RunEvent>> = Vec::new();
        match &req.version_id {
            Some(id) => {
                state.find_mut(id)?;
            }
            None => {
                let created = state.create(req.fields(), req.from_version.clone());
                events.push(Ok(RunEvent {
                    version_id: Some(created.id.clone()),
                    version_ordinal: Some(created.ordinal),
                    ..Default::default()
                }));
                state.broadcast(ChangeNotice {
                    scope: ChangeScope::Versions,
                    version_id: Some(created.id),
                });
            }
        }

        let script = state
            .scripts
            .pop_front()
            .unwrap_or_else(|| vec![ScriptedEvent::Event(RunEvent::status(RunStatus::Completed, None))]);
        events.extend(script.into_iter().map(|step| match step {
            ScriptedEvent::Event(event) => Ok(event),
            ScriptedEvent::Error(message) => {
                Err(BackendError::new(BackendErrorKind::Stream(message)).into())
            }
        }));

        tracing::debug!(events = events.len(), "Streaming scripted run");
        Ok(Box::pin(futures_util::stream::iter(events)))
    }
}

#[async_trait]
impl ChangeFeed for InMemoryBackend {
    async fn subscribe(&self, channel: &str) -> PalimpsestResult<ChangeStream> {
        let mut state = self.state.write().await;
        state.check_available()?;
        let (tx, rx) = mpsc::unbounded_channel();
        state.subscribers.push(tx);
        state.channels.push(channel.to_string());
        tracing::debug!(channel, "Subscribed to in-memory change feed");

        let stream = futures_util::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|notice| (notice, rx))
        });
        Ok(Box::pin(stream))
    }
}
