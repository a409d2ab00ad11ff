//! Streaming run error types.

/// Specific run failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum RunErrorKind {
    /// The backend refused to start the run
    #[display("Failed to start run: {}", _0)]
    Start(String),
    /// The event stream yielded an error before completion
    #[display("Run stream failed: {}", _0)]
    Stream(String),
    /// The backend reported `status: failed`
    #[display("Run failed: {}", _0)]
    Reported(String),
    /// The stream ended without a terminal status
    #[display("Run stream ended without a completion status")]
    Truncated,
}

/// Error type for streaming runs.
///
/// # Examples
///
/// ```
/// use palimpsest_error::{RunError, RunErrorKind};
///
/// let err = RunError::new(RunErrorKind::Reported("rate limited".to_string()));
/// assert!(format!("{}", err).contains("rate limited"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Run Error: {} at line {} in {}", kind, line, file)]
pub struct RunError {
    /// The specific condition
    pub kind: RunErrorKind,
    /// Line number where the error was raised
    pub line: u32,
    /// Source file where the error was raised
    pub file: &'static str,
}

impl RunError {
    /// Create a new RunError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RunErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
