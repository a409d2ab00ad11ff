//! Fetch, save, publish and patch operations around a session.

use crate::observer::{SessionObserver, Toast};
use crate::session::SharedSession;
use palimpsest_core::{
    CachedVersion, CreateVersionRequest, ProjectRef, PublishRequest, Version, VersionId,
};
use palimpsest_error::{PalimpsestResult, SessionError, SessionErrorKind};
use palimpsest_interface::{VersionSource, VersionWriter};
use std::sync::Arc;

/// Backend-facing operations on one edit session.
///
/// Fetch failures are returned to the caller and leave the session
/// untouched. Writes refetch the version list afterwards.
#[derive(Clone)]
pub struct VersionActions {
    session: SharedSession,
    source: Arc<dyn VersionSource>,
    writer: Arc<dyn VersionWriter>,
    observer: Arc<dyn SessionObserver>,
}

impl VersionActions {
    /// Bundle a session with its backends.
    pub fn new(
        session: SharedSession,
        source: Arc<dyn VersionSource>,
        writer: Arc<dyn VersionWriter>,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            session,
            source,
            writer,
            observer,
        }
    }

    /// The session these actions operate on.
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub(crate) fn observer(&self) -> &dyn SessionObserver {
        self.observer.as_ref()
    }

    /// Fetch the version list into the session. Returns the number of versions.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_versions(&self) -> PalimpsestResult<usize> {
        let versions = self.source.list_versions().await?;
        let count = versions.len();
        self.session.write().await.set_versions(versions);
        Ok(count)
    }

    /// Fetch one version and select it, seeding the draft.
    #[tracing::instrument(skip(self), fields(version = %id))]
    pub async fn load_version(&self, id: &VersionId) -> PalimpsestResult<()> {
        let version = self.source.fetch_version(id).await?;
        self.session.write().await.select_version(version);
        Ok(())
    }

    /// Save the draft as a new version.
    ///
    /// Only allowed while the draft differs from the original and from the
    /// cache. The created version becomes the cache, so saving again without
    /// further edits is refused.
    #[tracing::instrument(skip(self))]
    pub async fn save_draft(&self) -> PalimpsestResult<Version> {
        let request = {
            let session = self.session.read().await;
            let status = session
                .status()
                .ok_or_else(|| SessionError::new(SessionErrorKind::NoVersionSelected))?;
            if !status.can_save {
                let reason = if !status.issues.is_empty() {
                    format!("{:?}", status.issues)
                } else if status.is_equal_to_original {
                    "draft equals the selected version".to_string()
                } else {
                    "draft equals the version already created from it".to_string()
                };
                return Err(SessionError::new(SessionErrorKind::NotSavable(reason)).into());
            }
            let (Some(original), Some(draft)) = (session.original(), session.draft()) else {
                return Err(SessionError::new(SessionErrorKind::NoVersionSelected).into());
            };
            CreateVersionRequest {
                fields: draft.clone(),
                from_version: Some(original.id.clone()),
            }
        };

        let created = match self.writer.create_version(&request).await {
            Ok(created) => created,
            Err(err) => {
                self.observer
                    .on_toast(&Toast::error(format!("Failed to save version: {}", err)));
                return Err(err);
            }
        };
        tracing::info!(id = %created.id, ordinal = created.ordinal, "Saved new version");

        self.session.write().await.set_cache(CachedVersion {
            id: created.id.clone(),
            ordinal: created.ordinal,
            fields: request.fields,
        });
        self.observer
            .on_toast(&Toast::success(format!("Saved version {}", created.ordinal)));
        self.refresh_versions().await?;
        Ok(created)
    }

    /// Publish the selected version.
    #[tracing::instrument(skip(self, project), fields(project = %project.id))]
    pub async fn publish_selected(&self, project: ProjectRef) -> PalimpsestResult<()> {
        let request = {
            let session = self.session.read().await;
            let version_id = session
                .selected_id()
                .cloned()
                .ok_or_else(|| SessionError::new(SessionErrorKind::NoVersionSelected))?;
            PublishRequest {
                previous_published_version_id: session.published_version().map(|v| v.id.clone()),
                version_id,
                project,
            }
        };

        if let Err(err) = self.writer.publish(&request).await {
            self.observer
                .on_toast(&Toast::error(format!("Failed to publish: {}", err)));
            return Err(err);
        }
        self.observer.on_toast(&Toast::success("Published"));
        self.refresh_versions().await?;
        Ok(())
    }

    /// Replace a version's memo.
    #[tracing::instrument(skip(self, memo), fields(version = %id))]
    pub async fn update_memo(&self, id: &VersionId, memo: Option<String>) -> PalimpsestResult<()> {
        self.writer.update_memo(id, memo).await?;
        self.refresh_versions().await?;
        Ok(())
    }

    /// Replace a version's tags.
    #[tracing::instrument(skip(self, tags), fields(version = %id))]
    pub async fn update_tags(&self, id: &VersionId, tags: Vec<String>) -> PalimpsestResult<()> {
        self.writer.update_tags(id, tags).await?;
        self.refresh_versions().await?;
        Ok(())
    }
}
