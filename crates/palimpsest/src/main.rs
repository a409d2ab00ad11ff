//! Palimpsest CLI binary.
//!
//! This binary provides command-line access to Palimpsest's offline tools:
//! - Lay out a version list as a tree
//! - Replay a recorded run event stream
//! - Compute the save/run status of a draft

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, draft_status, replay_run, tree_layout};

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.load_config()?;

    match cli.command {
        Commands::Tree { versions } => tree_layout(&versions, &config).await?,
        Commands::Replay { events } => replay_run(&events).await?,
        Commands::Status {
            original,
            draft,
            cache,
        } => draft_status(&original, &draft, cache.as_deref()).await?,
    }

    Ok(())
}
