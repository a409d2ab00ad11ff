//! Version tree error types.

/// Reasons a version list cannot be turned into a single-rooted tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum TreeErrorKind {
    /// Two versions share one id
    #[display("Duplicate version id: {}", _0)]
    DuplicateId(String),
    /// A parent reference names a version outside the list
    #[display("Version '{}' references missing parent '{}'", child, parent)]
    MissingParent {
        /// The version holding the dangling reference
        child: String,
        /// The parent id that did not resolve
        parent: String,
    },
    /// Following parent references loops back
    #[display("Cycle detected through version '{}'", _0)]
    Cycle(String),
}

/// Tree error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Tree Error: {} at line {} in {}", kind, line, file)]
pub struct TreeError {
    /// The specific condition
    pub kind: TreeErrorKind,
    /// Line number where the error was raised
    pub line: u32,
    /// Source file where the error was raised
    pub file: &'static str,
}

impl TreeError {
    /// Create a new TreeError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TreeErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
