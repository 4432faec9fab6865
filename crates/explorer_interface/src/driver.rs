//! Remote generation API seam.

use async_trait::async_trait;
use explorer_core::GenerateRequest;
use explorer_error::GenerationError;
use futures_util::stream::BoxStream;

/// Incremental text produced by a streaming generation.
///
/// Each item is either a text fragment or the error that ended the stream.
pub type TextStream = BoxStream<'static, Result<String, GenerationError>>;

/// A remote text generator.
///
/// Implementations translate a [`GenerateRequest`] into a provider call.
/// They must be shareable across tasks because the streaming worker runs
/// on its own task.
#[async_trait]
pub trait GenerativeDriver: Send + Sync {
    /// Generate a complete answer in one call.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, GenerationError>;

    /// Start a streaming generation.
    ///
    /// Errors that happen before the first fragment (bad status, unreachable
    /// host) are returned directly; later failures arrive as stream items.
    async fn generate_stream(&self, request: &GenerateRequest)
    -> Result<TextStream, GenerationError>;

    /// Provider name used in logs, e.g. `"gemini"`.
    fn provider_name(&self) -> &'static str;

    /// Model identifier used in logs.
    fn model_name(&self) -> &str;
}
