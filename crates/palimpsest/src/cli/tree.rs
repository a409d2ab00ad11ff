//! Version tree command handler.

use super::{print_json, read_json};
use palimpsest::{PalimpsestConfig, Version, layout_versions};
use std::path::Path;

/// Print the layout of the versions stored at `path`.
#[tracing::instrument(skip(path, config), fields(path = %path.display()))]
pub async fn tree_layout(
    path: &Path,
    config: &PalimpsestConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let versions: Vec<Version> = read_json(path).await?;
    let layout = layout_versions(&versions, &config.tree)?;
    tracing::info!(nodes = layout.nodes.len(), "Version tree laid out");
    print_json(&layout)
}
