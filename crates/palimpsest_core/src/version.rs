//! Saved version records.

use crate::{VersionFields, VersionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved, immutable version as returned by the version list/detail fetch.
///
/// # Examples
///
/// ```
/// use palimpsest_core::Version;
///
/// let json = r#"{
///     "id": "v1",
///     "ordinal": 1,
///     "from_version": null,
///     "is_published": true,
///     "system_prompt": "You are helpful.",
///     "model": "gpt-3.5-turbo",
///     "created_at": "2024-03-01T12:00:00Z"
/// }"#;
/// let version: Version = serde_json::from_str(json).unwrap();
/// assert_eq!(version.ordinal, 1);
/// assert!(version.is_published);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Version {
    /// Backend id
    pub id: VersionId,
    /// Human-facing version number
    pub ordinal: u32,
    /// Version this one was derived from
    #[serde(default)]
    pub from_version: Option<VersionId>,
    /// Whether this is the project's published version
    #[serde(default)]
    pub is_published: bool,
    /// Free-form labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-form note
    #[serde(default)]
    pub memo: Option<String>,
    /// Who created the version
    #[serde(default)]
    pub author: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Persisted editable fields
    #[serde(flatten)]
    pub fields: VersionFields,
}
