//! Edit session error types.

/// Ways an edit session operation can be misused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum SessionErrorKind {
    /// An operation needs a selected version and none is selected
    #[display("No version is selected")]
    NoVersionSelected,
    /// Save was requested but the draft is not eligible
    #[display("Draft cannot be saved: {}", _0)]
    NotSavable(String),
    /// The draft has validation issues that disable Run and Save
    #[display("Draft is invalid: {}", _0)]
    InvalidDraft(String),
    /// A prompt step addressed by an edit does not exist
    #[display("Prompt step {} does not exist", _0)]
    UnknownStep(u32),
    /// A draft edit does not fit the entity's prompt body
    #[display("Prompt body mismatch: {}", _0)]
    BodyMismatch(String),
    /// A run was requested while the configured limit is reached
    #[display("Run limit reached: {} runs already in flight", _0)]
    RunLimitReached(usize),
}

/// Error type for edit session operations.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    /// The specific condition
    pub kind: SessionErrorKind,
    /// Line number where the error was raised
    pub line: u32,
    /// Source file where the error was raised
    pub file: &'static str,
}

impl SessionError {
    /// Create a new SessionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
