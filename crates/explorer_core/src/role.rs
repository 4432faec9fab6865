//! Role types for conversation participants.

use serde::{Deserialize, Serialize};

/// Who authored a conversation turn.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("user")]
    User,
    #[display("assistant")]
    Assistant,
}
