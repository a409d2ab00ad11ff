//! Session engine configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Tunables for the session engine.
///
/// # Example
///
/// ```toml
/// [session]
/// max_concurrent_runs = 4
/// changes_channel = "versions"
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct SessionConfig {
    /// Maximum simultaneous runs; unlimited when absent
    #[serde(default)]
    #[builder(default)]
    max_concurrent_runs: Option<usize>,

    /// Realtime channel watched for external version changes
    #[serde(default = "default_changes_channel")]
    #[builder(default = "default_changes_channel()")]
    changes_channel: String,
}

fn default_changes_channel() -> String {
    "versions".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_runs: None,
            changes_channel: default_changes_channel(),
        }
    }
}
