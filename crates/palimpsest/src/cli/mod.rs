//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the palimpsest binary.

mod commands;
mod replay;
mod status;
mod tree;

pub use commands::{Cli, Commands};
pub use replay::replay_run;
pub use status::draft_status;
pub use tree::tree_layout;

use palimpsest::{JsonError, PalimpsestResult};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read and parse one JSON file.
#[tracing::instrument(fields(path = %path.display()))]
async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(parse_json(&text)?)
}

fn parse_json<T: DeserializeOwned>(text: &str) -> PalimpsestResult<T> {
    Ok(serde_json::from_str(text).map_err(JsonError::from)?)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use palimpsest::{PalimpsestErrorKind, Version};

    #[test]
    fn malformed_json_maps_to_the_json_kind() {
        let err = parse_json::<Version>("{").unwrap_err();
        match err.kind() {
            PalimpsestErrorKind::Json(json) => assert!(json.message.contains("EOF")),
            other => panic!("Expected a JSON error, got {other:?}"),
        }
    }
}
