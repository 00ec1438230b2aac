#![warn(missing_docs)]
//! cmdbench Core - Process Timing and the Measurement Loop
//!
//! This crate provides the execution engine for command benchmarks:
//! - A [`ProcessTimer`] capability with exactly one platform variant
//!   compiled per build: job-object accounting on Windows, `wait4(2)`
//!   rusage on Unix
//! - The [`BenchmarkRunner`] warmup/measure/aggregate loop with live
//!   progress reporting
//! - [`compare_results`] for the relative-speed summary
//! - Cooperative cancellation via [`CancelToken`]

mod cancel;
mod comparison;
mod error;
mod runner;
mod timer;

pub use cancel::CancelToken;
pub use comparison::{compare_results, ComparisonEntry};
pub use error::BenchError;
pub use runner::{BenchmarkResult, BenchmarkRunner, Progress, RawSample};
pub use timer::{OsProcessTimer, ProcessTimer};
