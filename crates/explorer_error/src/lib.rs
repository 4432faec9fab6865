//! Error types for the Knowledge Explorer library.
//!
//! Every domain error records the source location where it was created.
//! [`ExplorerError`] wraps them all so call sites can use `?` freely.

mod config;
mod generation;
mod session;
mod upload;

pub use config::ConfigError;
pub use generation::{GenerationError, GenerationErrorKind};
pub use session::{SessionError, SessionErrorKind};
pub use upload::{UploadError, UploadErrorKind};

/// All error conditions surfaced by the explorer crates.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum ExplorerErrorKind {
    /// Startup configuration problem
    #[display("{_0}")]
    Config(ConfigError),
    /// Attachment transfer problem
    #[display("{_0}")]
    Upload(UploadError),
    /// Remote generation problem
    #[display("{_0}")]
    Generation(GenerationError),
    /// Submission refused
    #[display("{_0}")]
    Session(SessionError),
}

/// Explorer error wrapping one of the domain errors.
///
/// # Examples
///
/// ```
/// use explorer_error::{ConfigError, ExplorerError, ExplorerErrorKind};
///
/// let err: ExplorerError = ConfigError::new("GOOGLE_API_KEY not set").into();
/// assert!(matches!(err.kind(), ExplorerErrorKind::Config(_)));
/// ```
#[derive(Debug)]
pub struct ExplorerError(Box<ExplorerErrorKind>);

impl ExplorerError {
    /// Create a new ExplorerError from a kind.
    pub fn new(kind: ExplorerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ExplorerErrorKind {
        &self.0
    }
}

impl std::fmt::Display for ExplorerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Explorer Error: {}", self.0)
    }
}

impl std::error::Error for ExplorerError {}

impl<T> From<T> for ExplorerError
where
    T: Into<ExplorerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for explorer operations.
pub type ExplorerResult<T> = std::result::Result<T, ExplorerError>;
