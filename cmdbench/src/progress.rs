//! Terminal Progress Rendering
//!
//! Renders the runner's per-iteration progress snapshots — the core only
//! supplies numbers; the estimate and ETA shown here come straight from
//! the observer payload.

use cmdbench_core::Progress;
use cmdbench_stats::select_unit;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar over one command's measured runs.
pub struct MeasureBar {
    bar: ProgressBar,
}

impl MeasureBar {
    /// Create a bar spanning `total_runs` measured iterations.
    pub fn new(total_runs: u64) -> Self {
        let bar = ProgressBar::new(total_runs);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▒-"),
        );
        bar.set_message("warming up");
        Self { bar }
    }

    /// Render one progress snapshot.
    pub fn update(&self, progress: Progress) {
        let unit = select_unit(progress.running_mean_ns);
        let estimate = if unit.divisor == 0 {
            "0.00 ns".to_string()
        } else {
            format!("{:.2} {}", unit.scale(progress.running_mean_ns), unit.label)
        };

        let eta_secs = progress.eta.as_secs();
        self.bar.set_position(progress.completed);
        self.bar.set_message(format!(
            "current estimate: {} ETA {:02}:{:02}:{:02}",
            estimate.green(),
            eta_secs / 3600,
            (eta_secs % 3600) / 60,
            eta_secs % 60
        ));
    }

    /// Remove the bar after a completed benchmark.
    pub fn finish(self) {
        self.bar.finish_and_clear();
    }

    /// Remove the bar after a failed or cancelled benchmark.
    pub fn abandon(self) {
        self.bar.finish_and_clear();
    }
}
