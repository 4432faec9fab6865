//! Google Gemini provider.
//!
//! Talks to the REST API directly with `reqwest`:
//! - `models/{model}:generateContent` for complete answers
//! - `models/{model}:streamGenerateContent?alt=sse` for incremental answers
//! - `upload/v1beta/files` and `v1beta/files/{id}` for attachments

mod client;
mod conversions;
mod dto;
mod files;
mod sse;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_READ_TIMEOUT, GeminiClient};
pub use conversions::parse_stream_payload;
pub use sse::SseDecoder;
