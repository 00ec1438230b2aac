//! Child-Process Execution Timing
//!
//! Exactly one platform variant is compiled per build:
//!
//! - **Windows**: the child is started suspended, attached to a job
//!   object, then resumed; the job's cumulative accounting covers every
//!   process the command spawns transitively (a shell wrapping the real
//!   command, and its children in turn).
//! - **Unix**: `wait4(2)` reports the rusage of the direct child, which
//!   includes descendants the child itself reaped. Grandchildren the child
//!   never waits on are not accounted — a known limitation relative to the
//!   job-object variant.
//!
//! Real time is always the timer's own wall clock spanning the execution.

use crate::cancel::CancelToken;
use crate::error::BenchError;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::RusageTimer as OsProcessTimer;
#[cfg(windows)]
pub use windows::JobObjectTimer as OsProcessTimer;

/// Runs one child process to completion and records its elapsed real,
/// user and kernel time.
///
/// Accessors report the most recently completed run; [`reset`] must be
/// called before each reuse of an instance.
///
/// [`reset`]: ProcessTimer::reset
pub trait ProcessTimer {
    /// Clear any previously recorded measurement.
    fn reset(&mut self);

    /// Launch the process, wait for it to exit, and record timings.
    ///
    /// A non-zero exit status is still a valid sample — benchmarking a
    /// failing command is legitimate. Only a failure to launch, wait or
    /// query timing is an error, and a cancelled token terminates the
    /// in-flight child.
    fn run(
        &mut self,
        token: &CancelToken,
        program: &str,
        args: &[String],
    ) -> Result<(), BenchError>;

    /// Wall-clock duration of the last run, in nanoseconds.
    fn real_time_ns(&self) -> i64;

    /// User-mode CPU time of the last run, in nanoseconds.
    fn user_time_ns(&self) -> i64;

    /// Kernel-mode CPU time of the last run, in nanoseconds.
    fn kernel_time_ns(&self) -> i64;
}
