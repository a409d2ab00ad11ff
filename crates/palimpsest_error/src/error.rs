//! Top-level error wrapper types.

use crate::{BackendError, ConfigError, JsonError, RunError, SessionError, TreeError};

/// Every error a Palimpsest operation can produce.
///
/// # Examples
///
/// ```
/// use palimpsest_error::{BackendError, BackendErrorKind, PalimpsestError};
///
/// let err: PalimpsestError =
///     BackendError::new(BackendErrorKind::Unavailable("timeout".into())).into();
/// assert!(format!("{}", err).contains("Backend Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PalimpsestErrorKind {
    /// Backend (fetch, create, run, publish) error
    #[from(BackendError)]
    Backend(BackendError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Edit session misuse
    #[from(SessionError)]
    Session(SessionError),
    /// Streaming run failure
    #[from(RunError)]
    Run(RunError),
    /// Version tree construction failure
    #[from(TreeError)]
    Tree(TreeError),
}

/// Palimpsest error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Palimpsest Error: {}", _0)]
pub struct PalimpsestError(Box<PalimpsestErrorKind>);

impl PalimpsestError {
    /// Create a new error from a kind.
    pub fn new(kind: PalimpsestErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PalimpsestErrorKind {
        &self.0
    }
}

impl<T> From<T> for PalimpsestError
where
    T: Into<PalimpsestErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Palimpsest operations.
pub type PalimpsestResult<T> = std::result::Result<T, PalimpsestError>;
