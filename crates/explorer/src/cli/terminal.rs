//! Terminal rendering for answers.

use explorer_interface::DisplaySurface;
use std::io::Write;
use std::time::Duration;

/// Prints answers to stdout as they grow.
///
/// The pending indicator and status lines go to stderr so that piping
/// stdout captures only the answer text.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    printed: usize,
    indicator_shown: bool,
}

impl TerminalSurface {
    /// Creates a surface for one answer.
    pub fn new() -> Self {
        Self::default()
    }

    fn clear_indicator(&mut self) {
        if self.indicator_shown {
            eprint!("\r\x1b[2K");
            std::io::stderr().flush().ok();
            self.indicator_shown = false;
        }
    }
}

impl DisplaySurface for TerminalSurface {
    fn uploading(&mut self, count: usize) {
        eprintln!("Uploading {} file(s)...", count);
    }

    fn pending(&mut self, indicator: &str) {
        eprint!("\r\x1b[2K{}", indicator);
        std::io::stderr().flush().ok();
        self.indicator_shown = true;
    }

    fn update(&mut self, buffer: &str) {
        self.clear_indicator();
        if let Some(delta) = buffer.get(self.printed..) {
            print!("{}", delta);
            std::io::stdout().flush().ok();
        }
        self.printed = buffer.len();
    }

    fn failed(&mut self, message: &str) {
        self.clear_indicator();
        if self.printed > 0 {
            println!();
        }
        eprintln!("An error occurred: {}", message);
    }

    fn completed(&mut self, _text: &str, elapsed: Duration) {
        self.clear_indicator();
        println!();
        eprintln!("\n⏱️ Response time: {:.2} seconds", elapsed.as_secs_f64());
    }
}
