//! Generation error types.

/// Reasons a remote generation call failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// HTTP error with status code and message
    #[display("HTTP {status_code} error: {message}")]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message
        message: String,
    },
    /// The request never reached the service
    #[display("Generation request failed: {_0}")]
    Request(String),
    /// The response stream broke off or carried garbage
    #[display("Stream interrupted: {_0}")]
    Stream(String),
    /// The service refused to answer (safety filter, recitation, ...)
    #[display("Response blocked: {_0}")]
    Blocked(String),
    /// The response body could not be understood
    #[display("Invalid response: {_0}")]
    InvalidResponse(String),
    /// Sampling controls outside their allowed range
    #[display("Invalid generation parameters: {_0}")]
    InvalidParameters(String),
    /// The call exceeded its time bound
    #[display("Generation timed out after {_0}s")]
    Timeout(u64),
}

impl GenerationErrorKind {
    /// Message suitable for showing in place of the answer.
    ///
    /// HTTP failures show the service's own message rather than the status
    /// line, which is what a user can act on (e.g. "quota exceeded").
    pub fn user_message(&self) -> String {
        match self {
            GenerationErrorKind::Http { message, .. } => message.clone(),
            GenerationErrorKind::Request(msg)
            | GenerationErrorKind::Stream(msg)
            | GenerationErrorKind::InvalidResponse(msg)
            | GenerationErrorKind::InvalidParameters(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use explorer_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Http {
///     status_code: 429,
///     message: "quota exceeded".to_string(),
/// });
/// assert_eq!(err.kind().user_message(), "quota exceeded");
/// assert!(err.to_string().contains("HTTP 429"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    kind: GenerationErrorKind,
    line: u32,
    file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}

impl From<GenerationErrorKind> for GenerationError {
    #[track_caller]
    fn from(kind: GenerationErrorKind) -> Self {
        Self::new(kind)
    }
}
