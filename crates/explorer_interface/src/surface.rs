//! Rendering surface seam.

use std::time::Duration;

/// Receives incremental updates while an answer is produced.
///
/// Every method has an empty default so a front-end only implements what
/// it can show. Calls arrive on the consumer side of the coordinator, in
/// order, never concurrently.
pub trait DisplaySurface: Send {
    /// Attachments are being transferred.
    fn uploading(&mut self, _count: usize) {}

    /// No text yet; `indicator` is the next frame of the pending animation.
    fn pending(&mut self, _indicator: &str) {}

    /// The accumulated answer so far.
    fn update(&mut self, _buffer: &str) {}

    /// The request failed; `message` is shown in place of the answer.
    fn failed(&mut self, _message: &str) {}

    /// The answer is complete.
    fn completed(&mut self, _text: &str, _elapsed: Duration) {}
}

/// Surface that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {}
