//! Trait definitions for backend collaborators.

use async_trait::async_trait;
use futures_util::stream::Stream;
use palimpsest_core::{
    ChangeNotice, CreateVersionRequest, PublishRequest, RunEvent, RunRequest, Version, VersionId,
};
use palimpsest_error::PalimpsestResult;
use std::pin::Pin;

/// Stream of events produced by one run.
pub type RunEventStream = Pin<Box<dyn Stream<Item = PalimpsestResult<RunEvent>> + Send>>;

/// Stream of realtime change notices.
pub type ChangeStream = Pin<Box<dyn Stream<Item = ChangeNotice> + Send>>;

/// Read access to the versions of one entity.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// All versions, ordered by ordinal.
    async fn list_versions(&self) -> PalimpsestResult<Vec<Version>>;

    /// One version with its full prompt body.
    async fn fetch_version(&self, id: &VersionId) -> PalimpsestResult<Version>;
}

/// Write access to the versions of one entity.
#[async_trait]
pub trait VersionWriter: Send + Sync {
    /// Create a version without running it.
    async fn create_version(&self, req: &CreateVersionRequest) -> PalimpsestResult<Version>;

    /// Mark a version published, unmarking the previous one.
    async fn publish(&self, req: &PublishRequest) -> PalimpsestResult<()>;

    /// Replace a version's memo.
    async fn update_memo(&self, id: &VersionId, memo: Option<String>) -> PalimpsestResult<()>;

    /// Replace a version's tags.
    async fn update_tags(&self, id: &VersionId, tags: Vec<String>) -> PalimpsestResult<()>;
}

/// Streaming run-and-create call.
#[async_trait]
pub trait RunBackend: Send + Sync {
    /// Start a run.
    ///
    /// When `req.version_id` is `None` the backend creates a version from the
    /// submitted fields first and reports its id in one of the events.
    async fn run_stream(&self, req: &RunRequest) -> PalimpsestResult<RunEventStream>;
}

/// Realtime "something changed" channel.
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Subscribe to notices on a named channel.
    async fn subscribe(&self, channel: &str) -> PalimpsestResult<ChangeStream>;
}
