//! The Benchmark Runner
//!
//! Drives warmup and measured iterations of a single command through a
//! [`ProcessTimer`] and folds the collected samples into one immutable
//! [`BenchmarkResult`]. The incremental running mean feeds the progress
//! observer only; the final aggregate is recomputed from the full sample
//! set so no accumulation drift reaches the reported result.

use std::time::Duration;

use cmdbench_stats::{compute_summary, select_unit, update_running_mean, TimeUnit};

use crate::cancel::CancelToken;
use crate::error::BenchError;
use crate::timer::ProcessTimer;

/// One measured iteration: real, user and kernel time of a single
/// completed execution. Owned by the runner while a benchmark is in
/// flight and discarded once folded into the result.
#[derive(Debug, Clone, Copy)]
pub struct RawSample {
    /// Wall-clock duration in nanoseconds.
    pub real_ns: i64,
    /// User-mode CPU time in nanoseconds.
    pub user_ns: i64,
    /// Kernel-mode CPU time in nanoseconds.
    pub kernel_ns: i64,
}

/// Snapshot delivered to the progress observer after each measured
/// iteration.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    /// Measured iterations completed so far.
    pub completed: u64,
    /// Total measured iterations requested.
    pub total: u64,
    /// Incremental running mean of real time. Informational only.
    pub running_mean_ns: i64,
    /// `running_mean * (total - completed)`.
    pub eta: Duration,
}

/// Aggregate outcome of one benchmarked command. Never mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    /// The invocation string as given on the command line.
    pub command: String,
    /// Truncating integer mean of the real-time samples, in nanoseconds.
    pub mean_real_ns: i64,
    /// Smallest real-time sample.
    pub min_real_ns: i64,
    /// Largest real-time sample.
    pub max_real_ns: i64,
    /// Sample standard deviation of real time. `None` when only a single
    /// run was measured.
    pub stdev_real_ns: Option<f64>,
    /// Mean user-mode CPU time, in nanoseconds.
    pub mean_user_ns: i64,
    /// Mean kernel-mode CPU time, in nanoseconds.
    pub mean_kernel_ns: i64,
    /// Number of measured runs folded into this result.
    pub runs: u64,
    /// Display unit derived from the real-time mean.
    pub real_unit: TimeUnit,
    /// Display unit derived from the user-time mean.
    pub user_unit: TimeUnit,
    /// Display unit derived from the kernel-time mean.
    pub kernel_unit: TimeUnit,
}

/// Runs one command's warmup and measured iterations.
///
/// The runner owns its timer, so independent benchmarks (and tests) never
/// share state.
pub struct BenchmarkRunner<T> {
    timer: T,
    warmup_runs: u64,
    measured_runs: u64,
}

impl<T: ProcessTimer> BenchmarkRunner<T> {
    /// Create a runner that performs `warmup_runs` discarded executions
    /// followed by `measured_runs` timed ones.
    pub fn new(timer: T, warmup_runs: u64, measured_runs: u64) -> Self {
        Self {
            timer,
            warmup_runs,
            measured_runs,
        }
    }

    /// Benchmark one command, reporting progress after each measured
    /// iteration.
    ///
    /// `command` is the display string for the result; `program` and
    /// `args` are the tokenized invocation handed to the timer. Any
    /// execution error aborts the whole benchmark with no partial result,
    /// and cancellation discards all samples collected so far.
    pub fn run(
        &mut self,
        token: &CancelToken,
        command: &str,
        program: &str,
        args: &[String],
        mut observer: impl FnMut(Progress),
    ) -> Result<BenchmarkResult, BenchError> {
        if self.measured_runs == 0 {
            return Err(BenchError::Config(
                "measured run count must be at least 1".into(),
            ));
        }

        // Warmup: same execution path as measurement, timing discarded.
        for _ in 0..self.warmup_runs {
            if token.is_cancelled() {
                return Err(BenchError::Cancelled);
            }
            self.timer.reset();
            self.timer.run(token, program, args)?;
        }

        let mut samples = Vec::with_capacity(self.measured_runs as usize);
        let mut running_mean = 0i64;
        for completed_before in 0..self.measured_runs {
            if token.is_cancelled() {
                return Err(BenchError::Cancelled);
            }
            self.timer.reset();
            self.timer.run(token, program, args)?;

            let sample = RawSample {
                real_ns: self.timer.real_time_ns(),
                user_ns: self.timer.user_time_ns(),
                kernel_ns: self.timer.kernel_time_ns(),
            };
            samples.push(sample);

            running_mean =
                update_running_mean(running_mean, completed_before as i64, sample.real_ns);
            let completed = completed_before + 1;
            let remaining = self.measured_runs - completed;
            observer(Progress {
                completed,
                total: self.measured_runs,
                running_mean_ns: running_mean,
                eta: Duration::from_nanos(running_mean.max(0) as u64 * remaining),
            });
        }

        Ok(aggregate(command, &samples))
    }
}

/// Fold the full sample set into the final result.
fn aggregate(command: &str, samples: &[RawSample]) -> BenchmarkResult {
    let real: Vec<i64> = samples.iter().map(|s| s.real_ns).collect();
    let summary = compute_summary(&real);

    let runs = samples.len() as i64;
    let mean_user_ns = samples.iter().map(|s| s.user_ns).sum::<i64>() / runs;
    let mean_kernel_ns = samples.iter().map(|s| s.kernel_ns).sum::<i64>() / runs;

    BenchmarkResult {
        command: command.to_string(),
        mean_real_ns: summary.mean_ns,
        min_real_ns: summary.min_ns,
        max_real_ns: summary.max_ns,
        stdev_real_ns: summary.stdev_ns,
        mean_user_ns,
        mean_kernel_ns,
        runs: samples.len() as u64,
        real_unit: select_unit(summary.mean_ns),
        user_unit: select_unit(mean_user_ns),
        kernel_unit: select_unit(mean_kernel_ns),
    }
}
