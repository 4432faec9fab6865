//! Generation request sent to a driver.

use crate::{ConversationTurn, GenerationParameters, RemoteFileHandle};
use serde::{Deserialize, Serialize};

/// Everything the remote generator needs for one answer.
///
/// `history` holds the earlier turns of the conversation; `prompt` is the
/// fully built instruction for the new question and `files` the handles of
/// its attachments.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// Prior turns sent as context
    #[builder(default)]
    history: Vec<ConversationTurn>,
    /// Instruction text for this question
    prompt: String,
    /// Attachments already uploaded
    #[builder(default)]
    files: Vec<RemoteFileHandle>,
    /// Sampling controls
    #[builder(default)]
    parameters: GenerationParameters,
}

impl GenerateRequest {
    /// Creates a request from its parts.
    pub fn new(
        history: Vec<ConversationTurn>,
        prompt: impl Into<String>,
        files: Vec<RemoteFileHandle>,
        parameters: GenerationParameters,
    ) -> Self {
        Self {
            history,
            prompt: prompt.into(),
            files,
            parameters,
        }
    }

    /// Returns a builder for constructing a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}
