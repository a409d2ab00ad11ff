//! Palimpsest - prompt version drafts, streaming run logs and version trees.
//!
//! Palimpsest is the client-side engine behind a prompt versioning
//! dashboard. It tracks the version being edited and its draft, decides
//! when a draft may be saved or run, folds streamed run events into live
//! run logs, and lays the version history out as a tree.
//!
//! # Quick Start
//!
//! ```no_run
//! use palimpsest::{
//!     CancellationToken, EditSession, InMemoryBackend, PalimpsestConfig, RunDispatcher,
//!     TracingObserver, VersionActions,
//! };
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PalimpsestConfig::load()?;
//!     let backend = Arc::new(InMemoryBackend::new());
//!     let session = EditSession::shared();
//!
//!     let actions = VersionActions::new(
//!         session.clone(),
//!         backend.clone(),
//!         backend.clone(),
//!         Arc::new(TracingObserver),
//!     );
//!     actions.refresh_versions().await?;
//!     actions.load_version(&"v1".into()).await?;
//!     session.write().await.set_model("gpt-4")?;
//!
//!     let dispatcher =
//!         RunDispatcher::new(session, backend, Arc::new(TracingObserver), config.session);
//!     let outcome = dispatcher.run(BTreeMap::new(), CancellationToken::new()).await?;
//!     println!("{}", outcome.entry.raw_output);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `palimpsest_error` - Error types
//! - `palimpsest_core` - Versions, drafts, run events and run log entries
//! - `palimpsest_interface` - Backend traits and the in-memory backend
//! - `palimpsest_session` - Edit session, comparators, run dispatch
//! - `palimpsest_tree` - Version tree construction and layout
//!
//! This crate re-exports everything and adds configuration loading.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod replay;

pub use config::PalimpsestConfig;
pub use replay::{ReplaySummary, replay_events};

pub use palimpsest_core::*;
pub use palimpsest_error::*;
pub use palimpsest_interface::*;
pub use palimpsest_session::*;
pub use palimpsest_tree::*;
