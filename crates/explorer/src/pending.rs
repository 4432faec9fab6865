//! Animated placeholder shown while no text has arrived.

/// Suffix frames cycled by [`PendingIndicator`].
pub const PENDING_FRAMES: [&str; 4] = ["", ".", "..", "..."];

/// Rotating "Thinking" indicator. Purely cosmetic.
#[derive(Debug, Clone, Default)]
pub struct PendingIndicator {
    ticks: usize,
}

impl PendingIndicator {
    /// Return the next frame and advance.
    pub fn advance(&mut self) -> String {
        let frame = format!("Thinking{}", PENDING_FRAMES[self.ticks % PENDING_FRAMES.len()]);
        self.ticks = self.ticks.wrapping_add(1);
        frame
    }

    /// How many frames have been shown.
    pub fn ticks(&self) -> usize {
        self.ticks
    }
}
