//! Terminal progress bar.

use std::io::Write;

/// Reading or writing phase, shown as the bar prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Read,
    Write,
}

/// A single-line stderr progress bar, updated synchronously from reader
/// and writer callbacks.
pub struct ProgressBar {
    enabled: bool,
    finished: bool,
}

const BAR_LENGTH: usize = 50;

impl ProgressBar {
    pub fn new(enabled: bool) -> ProgressBar {
        ProgressBar { enabled, finished: false }
    }

    pub fn update(&mut self, phase: Phase, fraction: f64) {
        if !self.enabled {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        let prefix = match phase {
            Phase::Read => "Reading:",
            Phase::Write => "Writing:",
        };
        let filled = (BAR_LENGTH as f64 * fraction) as usize;
        let bar: String = "█".repeat(filled) + &"-".repeat(BAR_LENGTH - filled);

        let mut err = std::io::stderr();
        let _ = write!(err, "\r{prefix} |{bar}| {:3.0}% Complete", fraction * 100.0);
        let _ = err.flush();
        self.finished = fraction >= 1.0;
    }

    /// Terminates the bar line, if one was drawn.
    pub fn finish(&mut self) {
        if self.enabled && self.finished {
            let _ = writeln!(std::io::stderr());
            self.finished = false;
        }
    }
}
