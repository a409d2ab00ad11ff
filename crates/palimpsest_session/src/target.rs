//! Which version a run executes.

use crate::compare::fields_equal;
use palimpsest_core::{CachedVersion, RunRequest, Version, VersionFields, VersionId, VersionKey};
use serde::Serialize;
use std::collections::BTreeMap;

/// Target of one run, resolved once when the run starts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "target", content = "version_id")]
pub enum RunTarget {
    /// The draft is unchanged; run the selected version itself
    Original(VersionId),
    /// The draft matches a version created earlier; run that one
    CachedDraft(VersionId),
    /// The draft is new; the backend creates a version and runs it
    NewDraft,
}

impl RunTarget {
    /// Decide the target for running `draft` while `original` is selected.
    ///
    /// The draft is compared with the original as it was seeded, so output
    /// keys left on a version without a parser do not count as an edit.
    pub fn resolve(
        original: &Version,
        draft: &VersionFields,
        cache: Option<&CachedVersion>,
    ) -> Self {
        if fields_equal(draft, &original.fields.seeded()) {
            return Self::Original(original.id.clone());
        }
        match cache {
            Some(cached) if fields_equal(draft, &cached.fields) => {
                Self::CachedDraft(cached.id.clone())
            }
            _ => Self::NewDraft,
        }
    }

    /// Existing version the run executes, if any.
    pub fn version_id(&self) -> Option<&VersionId> {
        match self {
            Self::Original(id) | Self::CachedDraft(id) => Some(id),
            Self::NewDraft => None,
        }
    }

    /// Bucket the live run log is stored under.
    pub fn version_key(&self) -> VersionKey {
        self.version_id()
            .cloned()
            .map_or(VersionKey::Draft, VersionKey::Version)
    }

    /// Build the backend request for this target.
    ///
    /// Runs of the original submit the original's fields; draft runs submit
    /// the draft and name the original as parent.
    pub fn request(
        &self,
        original: &Version,
        draft: &VersionFields,
        sample_input: BTreeMap<String, String>,
    ) -> RunRequest {
        match self {
            Self::Original(id) => {
                RunRequest::from_fields(&original.fields, Some(id.clone()), None, sample_input)
            }
            Self::CachedDraft(id) => RunRequest::from_fields(
                draft,
                Some(id.clone()),
                Some(original.id.clone()),
                sample_input,
            ),
            Self::NewDraft => {
                RunRequest::from_fields(draft, None, Some(original.id.clone()), sample_input)
            }
        }
    }
}
