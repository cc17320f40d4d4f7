// file: src/pipeline/progress.rs
// description: stage spinner and per-run counters for a search run
// reference: uses indicatif for spinners and logs run metrics

use crate::utils::logging::format_step;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub fetched: usize,
    pub dropped_undated: usize,
    pub filtered_out: usize,
    pub ranked: usize,
    pub summarized: usize,
    pub summary_fallbacks: usize,
    pub displayed: usize,
    pub duration_ms: u128,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that made it through the recency filter.
    pub fn eligible(&self) -> usize {
        self.fetched.saturating_sub(self.filtered_out)
    }

    pub fn summary_success_rate(&self) -> f64 {
        let total = self.summarized + self.summary_fallbacks;
        if total == 0 {
            return 0.0;
        }
        (self.summarized as f64 / total as f64) * 100.0
    }

    pub fn log(&self) {
        info!("=== Search Run Summary ===");
        info!("Duration: {} ms", self.duration_ms);
        info!("Entries fetched: {}", self.fetched);
        info!("Entries dropped (no usable date): {}", self.dropped_undated);
        info!("Outside recency window: {}", self.filtered_out);
        info!("Ranked: {}", self.ranked);
        if self.summarized + self.summary_fallbacks > 0 {
            info!("Summarized: {}", self.summarized);
            info!("Summary fallbacks: {}", self.summary_fallbacks);
            info!("Summary success rate: {:.2}%", self.summary_success_rate());
        }
        info!("Displayed: {}", self.displayed);
        info!("==========================");
    }
}

/// One spinner walked through the numbered pipeline stages.
/// Hidden when progress output is disabled.
pub struct StageProgress {
    bar: ProgressBar,
    total_stages: usize,
    current: usize,
    started: Instant,
}

impl StageProgress {
    pub fn new(total_stages: usize, visible: bool) -> Self {
        let bar = if visible {
            create_spinner()
        } else {
            ProgressBar::hidden()
        };

        Self {
            bar,
            total_stages,
            current: 0,
            started: Instant::now(),
        }
    }

    pub fn stage(&mut self, message: &str) {
        self.current = (self.current + 1).min(self.total_stages);
        self.bar
            .set_message(format_step(self.current, self.total_stages, message));
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}
