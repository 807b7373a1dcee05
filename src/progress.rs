//! Progress display for the publishing run
//!
//! Wraps indicatif so the orchestrator can report per-package progress
//! without owning terminal concerns. Quiet mode (and machine output)
//! yields a reporter that does nothing.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter for the publishing workflow
pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    /// Create a reporter for `total` packages; `enabled` false yields a
    /// no-op reporter
    pub fn start(enabled: bool, total: u64) -> Self {
        if !enabled || total == 0 {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:30.green/blue}] {pos}/{len}")
                .expect("Invalid template")
                .progress_chars("█▓▒░"),
        );
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Advance past one package, showing its name as the current message
    pub fn advance(&self, package: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_message(format!("Publishing {}", package));
            bar.inc(1);
        }
    }

    /// Remove the bar from the terminal
    pub fn clear(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
