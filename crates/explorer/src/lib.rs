//! Knowledge Explorer: topic-aware questions over a remote generative API.
//!
//! A question goes through three stages:
//!
//! 1. [`build_prompt`] turns `(topic, question)` into instruction text.
//! 2. [`AssetUploader`] transfers attachments and waits until they are
//!    active.
//! 3. [`StreamCoordinator`] runs the generation on a worker task and polls
//!    its chunks into a growing answer, ending in exactly one terminal
//!    state.
//!
//! [`ChatSession`] ties these together, keeps the conversation history and
//! refuses overlapping requests.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use explorer::{ChatSession, Credentials, ExplorerConfig, StreamCoordinator};
//! use explorer_models::GeminiClient;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ExplorerConfig::default();
//! let credentials = Credentials::from_env()?;
//! let client = Arc::new(GeminiClient::new(credentials.api_key(), config.model()));
//!
//! let session = ChatSession::new(StreamCoordinator::new(
//!     client.clone(),
//!     client,
//!     config.coordinator_config(),
//! ));
//! let outcome = session
//!     .submit_question("Space", "Why is Mars red?", Vec::new(), *config.parameters())
//!     .await?;
//! println!("{}", outcome.display_text());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod coordinator;
mod pending;
mod prompt;
mod relevance;
mod session;
mod upload;

pub use config::{API_KEY_VARS, Credentials, DEFAULT_BASE_URL, DEFAULT_MODEL, ExplorerConfig, ExplorerConfigBuilder};
pub use coordinator::{
    CANCELLED_MESSAGE, CoordinatorConfig, CoordinatorConfigBuilder, OutcomeStatus,
    PartialResponsePolicy, PreparedRequest, RequestState, ResponseOutcome, StreamCoordinator,
    WORKER_LOST_MESSAGE,
};
pub use pending::{PENDING_FRAMES, PendingIndicator};
pub use prompt::build_prompt;
pub use relevance::{SPACE_KEYWORDS, check_relevance, is_space_related};
pub use session::{ATTACHMENT_HEADING, ChatSession, user_turn_content};
pub use upload::{AssetUploader, UploadPolicy, UploadPolicyBuilder};
