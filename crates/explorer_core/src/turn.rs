//! Conversation history entries.

use crate::Role;
use serde::{Deserialize, Serialize};

/// One entry of a chat transcript.
///
/// Turns are appended to a session's history and never edited afterwards.
///
/// # Examples
///
/// ```
/// use explorer_core::{ConversationTurn, Role};
///
/// let turn = ConversationTurn::user("What is inflation?");
///
/// assert_eq!(*turn.role(), Role::User);
/// assert_eq!(turn.content(), "What is inflation?");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
)]
pub struct ConversationTurn {
    /// Author of the turn
    role: Role,
    /// Markdown text of the turn
    content: String,
}

impl ConversationTurn {
    /// Creates a new turn with the given role and content.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Creates a user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Creates an assistant turn.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
