//! Attachment upload error types.

/// Reasons an attachment could not be transferred or activated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum UploadErrorKind {
    /// Reading the attachment from local storage failed
    #[display("Failed to read attachment: {_0}")]
    Io(String),
    /// The attachment type is not accepted
    #[display("Unsupported attachment type: {_0}")]
    Unsupported(String),
    /// The remote upload call returned an error status
    #[display("Upload rejected with HTTP {status_code}: {message}")]
    Remote {
        /// HTTP status code
        status_code: u16,
        /// Error body returned by the service
        message: String,
    },
    /// The upload request never reached the service
    #[display("Upload request failed: {_0}")]
    Request(String),
    /// The service answered with something other than a file resource
    #[display("Invalid upload response: {_0}")]
    InvalidResponse(String),
    /// The remote service marked the file as failed while processing it
    #[display("Remote processing failed for {_0}")]
    ProcessingFailed(String),
    /// The file never left the processing state
    #[display("File {name} still processing after {waited_secs}s")]
    Timeout {
        /// Remote file name
        name: String,
        /// Seconds spent waiting
        waited_secs: u64,
    },
}

/// Upload error with location tracking.
///
/// # Examples
///
/// ```
/// use explorer_error::{UploadError, UploadErrorKind};
///
/// let err = UploadError::new(UploadErrorKind::ProcessingFailed("files/abc".into()));
/// assert!(err.to_string().contains("files/abc"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Upload Error: {} at line {} in {}", kind, line, file)]
pub struct UploadError {
    kind: UploadErrorKind,
    line: u32,
    file: &'static str,
}

impl UploadError {
    /// Create a new upload error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: UploadErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &UploadErrorKind {
        &self.kind
    }
}

impl From<UploadErrorKind> for UploadError {
    #[track_caller]
    fn from(kind: UploadErrorKind) -> Self {
        Self::new(kind)
    }
}
