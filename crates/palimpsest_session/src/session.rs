//! The edit session: one entity's selected version, draft, cache and live runs.

use crate::compare::{DraftStatus, fields_equal};
use crate::target::RunTarget;
use palimpsest_core::{
    CachedVersion, CallId, EntityKind, ParsingType, PromptBody, PromptMessage, RunLogEntry, Version,
    VersionFields, VersionId, VersionKey,
};
use palimpsest_error::{PalimpsestError, PalimpsestResult, SessionError, SessionErrorKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Session shared between the host, the dispatcher and the change watcher.
pub type SharedSession = Arc<RwLock<EditSession>>;

/// Live run logs, by version bucket then call id.
pub type RunLogMap = BTreeMap<VersionKey, BTreeMap<CallId, RunLogEntry>>;

fn body_mismatch(kind: EntityKind, missing: &str) -> PalimpsestError {
    SessionError::new(SessionErrorKind::BodyMismatch(format!(
        "{} drafts have no {}",
        kind, missing
    )))
    .into()
}

/// Client-side state of one edited entity.
///
/// Pure state: nothing here performs I/O. The draft is only present while a
/// version is selected.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use palimpsest_core::{PromptBody, Version, VersionFields};
/// use palimpsest_session::EditSession;
///
/// let version = Version {
///     id: "v1".into(),
///     ordinal: 1,
///     from_version: None,
///     is_published: true,
///     tags: vec![],
///     memo: None,
///     author: None,
///     created_at: Utc::now(),
///     fields: VersionFields::new(PromptBody::SystemPrompt("Hi".into()), "gpt-3.5-turbo"),
/// };
///
/// let mut session = EditSession::new();
/// session.select_version(version);
/// assert!(session.status().unwrap().is_equal_to_original);
///
/// session.set_system_prompt("Hello").unwrap();
/// assert!(session.status().unwrap().can_save);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    versions: Vec<Version>,
    original: Option<Version>,
    draft: Option<VersionFields>,
    cache: Option<CachedVersion>,
    run_logs: RunLogMap,
}

impl EditSession {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh session for sharing.
    pub fn shared() -> SharedSession {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Last fetched version list.
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// Replace the version list.
    pub fn set_versions(&mut self, versions: Vec<Version>) {
        tracing::debug!(count = versions.len(), "Storing version list");
        self.versions = versions;
    }

    /// The currently published version, according to the last fetched list.
    pub fn published_version(&self) -> Option<&Version> {
        self.versions.iter().find(|v| v.is_published)
    }

    /// Select a version and seed the draft from it.
    ///
    /// The draft is a deep copy of the version's fields, with output keys
    /// dropped when no parser is configured. The cache is cleared.
    #[tracing::instrument(
        skip(self, version),
        fields(version = %version.id, kind = %version.fields.kind())
    )]
    pub fn select_version(&mut self, version: Version) {
        self.draft = Some(version.fields.seeded());
        self.original = Some(version);
        if self.cache.take().is_some() {
            tracing::debug!("Cleared new-version cache on version switch");
        }
    }

    /// Drop the selection, draft and cache.
    pub fn clear_selection(&mut self) {
        self.original = None;
        self.draft = None;
        self.cache = None;
    }

    /// Id of the selected version.
    pub fn selected_id(&self) -> Option<&VersionId> {
        self.original.as_ref().map(|v| &v.id)
    }

    /// The selected version as fetched.
    pub fn original(&self) -> Option<&Version> {
        self.original.as_ref()
    }

    /// The edit buffer.
    pub fn draft(&self) -> Option<&VersionFields> {
        self.draft.as_ref()
    }

    /// The new-version cache.
    pub fn cache(&self) -> Option<&CachedVersion> {
        self.cache.as_ref()
    }

    /// Remember a version created from the draft.
    ///
    /// If the draft has already moved on from `cached.fields`, the cache is
    /// dropped straight away.
    pub fn set_cache(&mut self, cached: CachedVersion) {
        tracing::debug!(id = %cached.id, ordinal = cached.ordinal, "Caching new version");
        self.cache = Some(cached);
        self.invalidate_stale_cache();
    }

    /// Forget the new-version cache.
    pub fn clear_cache(&mut self) {
        self.cache = None;
    }

    fn invalidate_stale_cache(&mut self) {
        let stale = match (&self.cache, &self.draft) {
            (Some(cached), Some(draft)) => !fields_equal(draft, &cached.fields),
            (Some(_), None) => true,
            _ => false,
        };
        if stale {
            tracing::debug!("Draft diverged from cached version, invalidating cache");
            self.cache = None;
        }
    }

    fn edit_draft(
        &mut self,
        edit: impl FnOnce(&mut VersionFields) -> PalimpsestResult<()>,
    ) -> PalimpsestResult<()> {
        let draft = self
            .draft
            .as_mut()
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoVersionSelected))?;
        edit(draft)?;
        self.invalidate_stale_cache();
        Ok(())
    }

    /// Replace every prompt step of a function-model draft.
    pub fn set_prompts(&mut self, prompts: Vec<PromptMessage>) -> PalimpsestResult<()> {
        self.edit_draft(|draft| match &mut draft.body {
            PromptBody::Prompts(current) => {
                *current = prompts;
                Ok(())
            }
            PromptBody::SystemPrompt(_) => Err(body_mismatch(EntityKind::ChatModel, "prompt steps")),
        })
    }

    /// Change the content of one prompt step.
    pub fn update_prompt_content(
        &mut self,
        step: u32,
        content: impl Into<String>,
    ) -> PalimpsestResult<()> {
        let content = content.into();
        self.edit_draft(|draft| match &mut draft.body {
            PromptBody::Prompts(prompts) => {
                let prompt = prompts
                    .iter_mut()
                    .find(|p| p.step == step)
                    .ok_or_else(|| SessionError::new(SessionErrorKind::UnknownStep(step)))?;
                prompt.content = content;
                Ok(())
            }
            PromptBody::SystemPrompt(_) => Err(body_mismatch(EntityKind::ChatModel, "prompt steps")),
        })
    }

    /// Replace the system prompt of a chat-model draft.
    pub fn set_system_prompt(&mut self, text: impl Into<String>) -> PalimpsestResult<()> {
        let text = text.into();
        self.edit_draft(|draft| match &mut draft.body {
            PromptBody::SystemPrompt(current) => {
                *current = text;
                Ok(())
            }
            PromptBody::Prompts(_) => Err(body_mismatch(EntityKind::FunctionModel, "system prompt")),
        })
    }

    /// Change the model.
    pub fn set_model(&mut self, model: impl Into<String>) -> PalimpsestResult<()> {
        let model = model.into();
        self.edit_draft(|draft| {
            draft.model = model;
            Ok(())
        })
    }

    /// Change the parser. Removing the parser also clears the output keys.
    pub fn set_parsing_type(&mut self, parsing_type: Option<ParsingType>) -> PalimpsestResult<()> {
        self.edit_draft(|draft| {
            draft.parsing_type = parsing_type;
            if parsing_type.is_none() {
                draft.output_keys.clear();
            }
            Ok(())
        })
    }

    /// Replace the output keys.
    pub fn set_output_keys(&mut self, keys: Vec<String>) -> PalimpsestResult<()> {
        self.edit_draft(|draft| {
            draft.output_keys = keys;
            Ok(())
        })
    }

    /// Replace the function list.
    pub fn set_functions(&mut self, functions: Vec<String>) -> PalimpsestResult<()> {
        self.edit_draft(|draft| {
            draft.functions = functions;
            Ok(())
        })
    }

    /// Throw away draft edits.
    pub fn reset_draft(&mut self) -> PalimpsestResult<()> {
        let seeded = self
            .original
            .as_ref()
            .map(|v| v.fields.seeded())
            .ok_or_else(|| SessionError::new(SessionErrorKind::NoVersionSelected))?;
        self.edit_draft(|draft| {
            *draft = seeded;
            Ok(())
        })
    }

    /// Derived draft state, or `None` when nothing is selected.
    pub fn status(&self) -> Option<DraftStatus> {
        let original = self.original.as_ref()?;
        let draft = self.draft.as_ref()?;
        Some(DraftStatus::compute(
            draft,
            &original.fields.seeded(),
            self.cache.as_ref(),
        ))
    }

    /// Decide what a run started now would execute.
    pub fn resolve_target(&self) -> PalimpsestResult<RunTarget> {
        match (&self.original, &self.draft) {
            (Some(original), Some(draft)) => {
                Ok(RunTarget::resolve(original, draft, self.cache.as_ref()))
            }
            _ => Err(SessionError::new(SessionErrorKind::NoVersionSelected).into()),
        }
    }

    /// All live run logs.
    pub fn run_logs(&self) -> &RunLogMap {
        &self.run_logs
    }

    /// Live runs of one version bucket.
    pub fn runs_for(&self, key: &VersionKey) -> Option<&BTreeMap<CallId, RunLogEntry>> {
        self.run_logs.get(key)
    }

    /// One live run.
    pub fn run_log(&self, key: &VersionKey, call: &CallId) -> Option<&RunLogEntry> {
        self.run_logs.get(key).and_then(|runs| runs.get(call))
    }

    /// Number of live runs across all versions.
    pub fn live_run_count(&self) -> usize {
        self.run_logs.values().map(BTreeMap::len).sum()
    }

    /// Insert or overwrite a live run.
    pub fn upsert_run(&mut self, key: VersionKey, call: CallId, entry: RunLogEntry) {
        self.run_logs.entry(key).or_default().insert(call, entry);
    }

    /// Apply `update` to a live run. Returns false if the run is unknown.
    pub fn update_run(
        &mut self,
        key: &VersionKey,
        call: &CallId,
        update: impl FnOnce(&mut RunLogEntry),
    ) -> bool {
        match self.run_logs.get_mut(key).and_then(|runs| runs.get_mut(call)) {
            Some(entry) => {
                update(entry);
                true
            }
            None => false,
        }
    }

    /// Remove a live run, dropping its bucket when it becomes empty.
    pub fn remove_run(&mut self, key: &VersionKey, call: &CallId) -> Option<RunLogEntry> {
        let runs = self.run_logs.get_mut(key)?;
        let removed = runs.remove(call);
        if runs.is_empty() {
            self.run_logs.remove(key);
        }
        removed
    }

    /// Move a live run to another bucket, e.g. once its draft became a version.
    pub fn rekey_run(&mut self, from: &VersionKey, to: VersionKey, call: &CallId) -> bool {
        match self.remove_run(from, call) {
            Some(entry) => {
                self.upsert_run(to, call.clone(), entry);
                true
            }
            None => false,
        }
    }
}
