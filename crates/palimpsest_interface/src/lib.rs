//! Backend trait definitions for Palimpsest.
//!
//! The session engine never talks to a network itself. Everything it needs
//! from the outside world (version fetches, version creation, streaming runs,
//! publish and patch calls, realtime change notices) goes through the traits
//! in this crate. [`InMemoryBackend`] implements all of them for tests and
//! offline demos.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod memory;
mod traits;

pub use memory::{InMemoryBackend, ScriptedEvent};
pub use traits::{ChangeFeed, ChangeStream, RunBackend, RunEventStream, VersionSource, VersionWriter};
