//! Conversions between the explorer data model and Gemini wire types.

use super::dto::{
    ApiErrorBody, Content, FileResource, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, Part, WireFileState,
};
use explorer_core::{FileState, GenerateRequest, RemoteFileHandle, Role};
use explorer_error::{GenerationError, GenerationErrorKind};

/// Finish reasons that mean the answer was withheld.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Build the wire request: prior turns, then the new user turn with its
/// attachments ahead of the prompt text.
///
/// Adjacent turns with the same role are merged into one content entry, so
/// a question left unanswered by a failed request is sent together with the
/// next one.
pub fn to_wire(request: &GenerateRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = Vec::new();
    for turn in request.history() {
        push_turn(&mut contents, *turn.role(), vec![Part::text(turn.content().clone())]);
    }

    let mut parts: Vec<Part> = request
        .files()
        .iter()
        .map(|file| Part::file(file.mime_type().clone(), file.uri().clone()))
        .collect();
    parts.push(Part::text(request.prompt().clone()));
    push_turn(&mut contents, Role::User, parts);

    let params = request.parameters();
    GenerateContentRequest {
        contents,
        generation_config: GenerationConfig {
            temperature: *params.temperature(),
            top_p: *params.top_p(),
            top_k: *params.top_k(),
        },
    }
}

fn push_turn(contents: &mut Vec<Content>, role: Role, parts: Vec<Part>) {
    let role = wire_role(role);
    match contents.last_mut() {
        Some(last) if last.role.as_deref() == Some(role) => last.parts.extend(parts),
        _ => contents.push(Content {
            role: Some(role.to_string()),
            parts,
        }),
    }
}

fn wire_role(role: Role) -> &'static str {
    match role {
        Role::User => "user",
        Role::Assistant => "model",
    }
}

/// Extract answer text from a response or stream event.
///
/// Returns `Ok(None)` for events that carry no text (usage-only events,
/// a bare `STOP`). Thought parts are skipped.
///
/// # Errors
///
/// Returns [`GenerationErrorKind::Blocked`] when the prompt or the answer was
/// withheld by the service.
pub fn answer_text(response: &GenerateContentResponse) -> Result<Option<String>, GenerationError> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_ref())
    {
        return Err(GenerationError::new(GenerationErrorKind::Blocked(format!(
            "prompt rejected ({})",
            reason
        ))));
    }

    let Some(candidate) = response.candidates.first() else {
        return Ok(None);
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|content| content.parts.iter())
        .filter(|part| !part.thought)
        .filter_map(|part| part.text.as_deref())
        .collect();

    if !text.is_empty() {
        return Ok(Some(text));
    }

    match candidate.finish_reason.as_deref() {
        Some(reason) if BLOCKING_FINISH_REASONS.contains(&reason) => Err(GenerationError::new(
            GenerationErrorKind::Blocked(format!("answer withheld ({})", reason)),
        )),
        _ => Ok(None),
    }
}

/// Decode one SSE payload of `streamGenerateContent`.
///
/// # Errors
///
/// Returns [`GenerationErrorKind::InvalidResponse`] for malformed JSON, an
/// HTTP-kind error when the event is an error envelope, and
/// [`GenerationErrorKind::Blocked`] for withheld answers.
pub fn parse_stream_payload(payload: &str) -> Result<Option<String>, GenerationError> {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorBody>(payload) {
        return Err(GenerationError::new(GenerationErrorKind::Http {
            status_code: envelope.error.code.unwrap_or(500),
            message: envelope.error.message,
        }));
    }

    let response: GenerateContentResponse = serde_json::from_str(payload).map_err(|e| {
        GenerationError::new(GenerationErrorKind::InvalidResponse(format!(
            "Failed to parse stream event: {}",
            e
        )))
    })?;
    answer_text(&response)
}

/// Convert a Files API resource into a handle.
pub fn handle_from_wire(file: FileResource) -> RemoteFileHandle {
    let state = match file.state {
        WireFileState::Active => FileState::Active,
        WireFileState::Failed => FileState::Failed,
        WireFileState::StateUnspecified | WireFileState::Processing | WireFileState::Unknown => {
            FileState::Processing
        }
    };
    RemoteFileHandle::new(file.name, file.uri, file.mime_type, state)
}

/// Best-effort human message from an error response body.
pub fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body.trim().to_string(),
    }
}
