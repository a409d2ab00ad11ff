//! Backend error types.

/// Failure reported by a backend collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BackendErrorKind {
    /// The requested record does not exist
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// The backend could not be reached
    #[display("Backend unavailable: {}", _0)]
    Unavailable(String),
    /// The backend refused the request
    #[display("Request rejected: {}", _0)]
    Rejected(String),
    /// The event stream broke mid-run
    #[display("Stream interrupted: {}", _0)]
    Stream(String),
}

/// Backend error with location tracking.
///
/// # Examples
///
/// ```
/// use palimpsest_error::{BackendError, BackendErrorKind};
///
/// let err = BackendError::new(BackendErrorKind::NotFound("version v9".to_string()));
/// assert!(format!("{}", err).contains("Not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Backend Error: {} at line {} in {}", kind, line, file)]
pub struct BackendError {
    /// The kind of failure
    pub kind: BackendErrorKind,
    /// Line number where the error was raised
    pub line: u32,
    /// Source file where the error was raised
    pub file: &'static str,
}

impl BackendError {
    /// Create a new backend error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BackendErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
