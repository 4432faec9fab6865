//! Remote generation providers for Knowledge Explorer.
//!
//! Each provider implements [`explorer_interface::GenerativeDriver`] and,
//! where the service supports attachments, [`explorer_interface::FileStore`].
//!
//! Providers are feature-gated:
//! - `gemini` (default) - Google Gemini REST API

#[cfg(feature = "gemini")]
mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_READ_TIMEOUT, GeminiClient, SseDecoder,
    parse_stream_payload,
};
