//! CLI command definitions.

use clap::{Parser, Subcommand};
use palimpsest::{PalimpsestConfig, PalimpsestResult};
use std::path::PathBuf;

/// Palimpsest - prompt version drafts, run logs and version trees
#[derive(Parser, Debug)]
#[command(name = "palimpsest")]
#[command(about = "Prompt version drafts, streaming run logs and version trees", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the layered defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Configuration from `--config`, or the layered defaults.
    pub fn load_config(&self) -> PalimpsestResult<PalimpsestConfig> {
        match &self.config {
            Some(path) => PalimpsestConfig::from_file(path),
            None => PalimpsestConfig::load(),
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lay out a JSON version list as a tree and print nodes and edges
    Tree {
        /// Path to a JSON array of versions
        versions: PathBuf,
    },

    /// Fold a recorded run (one JSON event per line) and print the result
    Replay {
        /// Path to the newline-delimited event file
        events: PathBuf,
    },

    /// Compare a draft against its original and print the save/run status
    Status {
        /// Path to the original version (JSON)
        original: PathBuf,

        /// Path to the draft fields (JSON)
        draft: PathBuf,

        /// Path to the version created from the draft (JSON)
        #[arg(long)]
        cache: Option<PathBuf>,
    },
}
