//! Wire types for the Gemini REST API.

use serde::{Deserialize, Serialize};

/// Body of `generateContent` and `streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation contents, oldest first
    pub contents: Vec<Content>,
    /// Sampling controls
    pub generation_config: GenerationConfig,
}

/// One message in the Gemini conversation format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// `"user"` or `"model"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Message parts
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A text or file-reference part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Reference to an uploaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_data: Option<FileData>,
    /// Set on reasoning parts that are not part of the answer
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
}

impl Part {
    /// Text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// File reference part.
    pub fn file(mime_type: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self {
            file_data: Some(FileData {
                mime_type: mime_type.into(),
                file_uri: file_uri.into(),
            }),
            ..Self::default()
        }
    }
}

/// File reference inside a part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// MIME type of the file
    pub mime_type: String,
    /// URI returned by the upload
    pub file_uri: String,
}

/// Sampling controls in wire form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Top-k cutoff
    pub top_k: u32,
}

/// Response of `generateContent`, and each event of the streaming variant.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Answer candidates
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    /// Present when the prompt itself was rejected
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One answer candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<Content>,
    /// Why generation stopped, e.g. `STOP` or `SAFETY`
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was blocked
    #[serde(default)]
    pub block_reason: Option<String>,
}

/// Processing state as reported by the Files API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WireFileState {
    #[default]
    StateUnspecified,
    Processing,
    Active,
    Failed,
    #[serde(other)]
    Unknown,
}

/// A file resource from the Files API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResource {
    /// Resource name, e.g. `files/abc123`
    pub name: String,
    /// Display name given at upload
    #[serde(default)]
    pub display_name: Option<String>,
    /// MIME type
    #[serde(default)]
    pub mime_type: String,
    /// URI for use in requests
    #[serde(default)]
    pub uri: String,
    /// Processing state
    #[serde(default)]
    pub state: WireFileState,
}

/// Response of the upload finalize call.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadFileResponse {
    /// The created file
    pub file: FileResource,
}

/// Metadata sent when starting an upload.
#[derive(Debug, Clone, Serialize)]
pub struct CreateFileRequest {
    /// File metadata
    pub file: FileMetadata,
}

/// File metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    /// Name shown in the Files API
    pub display_name: String,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Error details
    pub error: ApiErrorDetail,
}

/// Error details.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    /// HTTP-like code
    #[serde(default)]
    pub code: Option<u16>,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Canonical status, e.g. `RESOURCE_EXHAUSTED`
    #[serde(default)]
    pub status: Option<String>,
}
