//! Run replay command handler.

use super::print_json;
use palimpsest::replay_events;
use std::path::Path;

/// Fold the events stored at `path` and print the summary.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub async fn replay_run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    let summary = replay_events(&text)?;
    if !summary.terminated {
        tracing::warn!("Recording ends without a completed or failed status");
    }
    print_json(&summary)
}
