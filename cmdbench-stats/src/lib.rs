#![warn(missing_docs)]
//! cmdbench Statistical Engine
//!
//! Pure numeric routines shared by the benchmark runner and the summary
//! output:
//! - Running-mean updates for live progress estimates
//! - Sample standard deviation over integer nanosecond samples
//! - Human-scale time-unit selection
//! - Relative-speed ratios with a propagated uncertainty band

mod comparison;
mod summary;
mod units;

pub use comparison::{relative_speeds, speed_ratio, RelativeSpeed, SpeedMeasurement, SpeedRatio};
pub use summary::{compute_summary, sample_stdev, update_running_mean, SampleSummary};
pub use units::{select_unit, TimeUnit};
