//! The new-version cache record.

use crate::{VersionFields, VersionId};
use serde::{Deserialize, Serialize};

/// The version most recently created from the current draft.
///
/// Holding on to it lets repeated runs of an unchanged draft reuse the
/// created version instead of creating another one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedVersion {
    /// Id the backend assigned
    pub id: VersionId,
    /// Version number the backend assigned
    pub ordinal: u32,
    /// The fields the version was created from
    pub fields: VersionFields,
}
