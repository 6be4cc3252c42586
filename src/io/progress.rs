//! Terminal progress display for the fitting and generation phases

use crate::io::configuration::PROGRESS_UPDATE_INTERVAL;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>10} [{bar:40.cyan/blue}] {pos}/{len} ({elapsed_precise})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// One progress bar per phase, redrawn every few positions
#[derive(Default)]
pub struct ProgressManager {
    bar: Option<ProgressBar>,
}

impl ProgressManager {
    /// Create a manager with no active phase
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a phase of `total` positions, replacing any unfinished one
    pub fn start_phase(&mut self, label: &str, total: usize) {
        self.finish_phase();

        let bar = ProgressBar::new(total as u64);
        bar.set_style(PHASE_STYLE.clone());
        bar.set_prefix(label.to_string());
        self.bar = Some(bar);
    }

    /// Report `done` positions; redraws only every few positions
    pub fn update(&self, done: usize) {
        if let Some(ref bar) = self.bar {
            if done % PROGRESS_UPDATE_INTERVAL == 0 || Some(done as u64) == bar.length() {
                bar.set_position(done as u64);
            }
        }
    }

    /// Position of the active phase
    pub fn position(&self) -> Option<u64> {
        self.bar.as_ref().map(ProgressBar::position)
    }

    /// Complete and clear the active phase
    pub fn finish_phase(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
