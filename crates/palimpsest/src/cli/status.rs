//! Draft status command handler.

use super::{print_json, read_json};
use palimpsest::{CachedVersion, DraftStatus, Version, VersionFields};
use std::path::Path;

/// Print the [`DraftStatus`] of a draft against its original and optional cache.
#[tracing::instrument]
pub async fn draft_status(
    original: &Path,
    draft: &Path,
    cache: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let original: Version = read_json(original).await?;
    let draft: VersionFields = read_json(draft).await?;
    let cache: Option<CachedVersion> = match cache {
        Some(path) => Some(read_json(path).await?),
        None => None,
    };

    let status = DraftStatus::compute(&draft, &original.fields, cache.as_ref());
    if !status.issues.is_empty() {
        tracing::info!(issues = status.issues.len(), "Draft has validation issues");
    }
    print_json(&status)
}
