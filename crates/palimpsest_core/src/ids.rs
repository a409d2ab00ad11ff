//! Identifier types.

use serde::{Deserialize, Serialize};

/// Backend identifier of a saved version.
///
/// # Examples
///
/// ```
/// use palimpsest_core::VersionId;
///
/// let id = VersionId::from("v-17");
/// assert_eq!(id.as_str(), "v-17");
/// assert_eq!(format!("{}", id), "v-17");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VersionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier of one run invocation.
///
/// Several runs may stream against the same version at once; the call id
/// keeps their log entries apart.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Generate a fresh random call id.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CallId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Bucket under which live run logs are stored.
///
/// Runs of an unsaved draft have no version id until the backend reports one,
/// so they live under [`VersionKey::Draft`] until then.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum VersionKey {
    /// Runs against a saved version
    #[display("{}", _0)]
    Version(VersionId),
    /// Runs of a draft the backend has not created yet
    #[display("draft")]
    Draft,
}

impl From<VersionId> for VersionKey {
    fn from(id: VersionId) -> Self {
        Self::Version(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_call_ids_differ() {
        assert_ne!(CallId::random(), CallId::random());
    }

    #[test]
    fn version_key_display() {
        assert_eq!(VersionKey::from(VersionId::from("abc")).to_string(), "abc");
        assert_eq!(VersionKey::Draft.to_string(), "draft");
    }
}
