//! References to files already transferred to the remote service.

use serde::{Deserialize, Serialize};

/// Processing state of a remote file.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum FileState {
    /// Still being processed; not yet usable in a request
    #[display("processing")]
    Processing,
    /// Ready to be referenced
    #[display("active")]
    Active,
    /// Processing failed permanently
    #[display("failed")]
    Failed,
}

/// Opaque handle to an uploaded file, substitutable for its bytes in a request.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct RemoteFileHandle {
    /// Resource name assigned by the service, e.g. `files/abc123`
    name: String,
    /// URI used to reference the file in a generation request
    uri: String,
    /// MIME type reported by the service
    mime_type: String,
    /// Current processing state
    state: FileState,
}

impl RemoteFileHandle {
    /// Creates a handle from its parts.
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        mime_type: impl Into<String>,
        state: FileState,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            mime_type: mime_type.into(),
            state,
        }
    }

    /// Returns a builder for constructing a handle.
    pub fn builder() -> RemoteFileHandleBuilder {
        RemoteFileHandleBuilder::default()
    }

    /// Whether the file can be used in a generation request.
    pub fn is_active(&self) -> bool {
        self.state == FileState::Active
    }
}
