//! Error types for the Palimpsest library.
//!
//! This crate provides the error types shared by every Palimpsest crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum names the specific condition
//! - `*Error` struct wraps the kind together with the source location
//! - constructors use `#[track_caller]` so the location is captured automatically
//!
//! # Examples
//!
//! ```
//! use palimpsest_error::{PalimpsestResult, SessionError, SessionErrorKind};
//!
//! fn save() -> PalimpsestResult<()> {
//!     Err(SessionError::new(SessionErrorKind::NoVersionSelected))?
//! }
//!
//! assert!(save().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod config;
mod error;
mod json;
mod run;
mod session;
mod tree;

pub use backend::{BackendError, BackendErrorKind};
pub use config::ConfigError;
pub use error::{PalimpsestError, PalimpsestErrorKind, PalimpsestResult};
pub use json::JsonError;
pub use run::{RunError, RunErrorKind};
pub use session::{SessionError, SessionErrorKind};
pub use tree::{TreeError, TreeErrorKind};
