//! Core data types for the Knowledge Explorer library.
//!
//! This crate provides the data model shared by the driver seams, the Gemini
//! provider and the streaming coordinator.

mod asset;
mod chunk;
mod handle;
mod observability;
mod parameters;
mod request;
mod role;
mod topic;
mod turn;

pub use asset::{SUPPORTED_ATTACHMENTS, UploadedAsset, mime_for_extension};
pub use chunk::StreamChunk;
pub use handle::{FileState, RemoteFileHandle, RemoteFileHandleBuilder};
pub use observability::{LogFormat, init_tracing};
pub use parameters::{GenerationParameters, GenerationParametersBuilder, MAX_TEMPERATURE};
pub use request::{GenerateRequest, GenerateRequestBuilder};
pub use role::Role;
pub use topic::{GENERIC_PERSONA, Topic};
pub use turn::ConversationTurn;
