//! Messages passed from the streaming worker to the consumer.

/// One message on the response channel.
///
/// A worker emits any number of `Data` chunks, at most one `Error`, and
/// always exactly one `Done` last.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StreamChunk {
    /// Incremental answer text
    Data(String),
    /// The remote call failed; the message is user-facing
    Error(String),
    /// End of the sequence
    Done,
}
