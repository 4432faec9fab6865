//! Submission rejection errors.

/// Reasons a question was refused before any remote call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum SessionErrorKind {
    /// The question was empty or whitespace only
    #[display("Please enter a question")]
    EmptyQuestion,
    /// Another request is still in flight on this session
    #[display("A request is already in progress")]
    Busy,
    /// The question does not belong to the selected topic
    #[display("Question does not appear to be about {_0}")]
    OffTopic(String),
}

/// Session error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Session Error: {} at line {} in {}", kind, line, file)]
pub struct SessionError {
    kind: SessionErrorKind,
    line: u32,
    file: &'static str,
}

impl SessionError {
    /// Create a new session error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: SessionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SessionErrorKind {
        &self.kind
    }
}
