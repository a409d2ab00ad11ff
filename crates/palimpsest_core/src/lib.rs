//! Core data types for the Palimpsest prompt versioning engine.
//!
//! This crate holds the records shared by every other Palimpsest crate:
//! versions and their editable fields, the run request sent to a backend,
//! the events a streaming run emits, and the run log those events fold into.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cached;
mod fields;
mod ids;
mod parsing;
mod prompt;
mod request;
mod run;
mod version;

pub use cached::CachedVersion;
pub use fields::VersionFields;
pub use ids::{CallId, VersionId, VersionKey};
pub use parsing::ParsingType;
pub use prompt::{EntityKind, PromptBody, PromptMessage, Role};
pub use request::{
    ChangeNotice, ChangeScope, CreateVersionRequest, ProjectRef, PublishRequest, RunRequest,
    RunRequestBuilder,
};
pub use run::{FunctionCallPayload, FunctionCallRecord, RunEvent, RunLogEntry, RunStatus};
pub use version::Version;
