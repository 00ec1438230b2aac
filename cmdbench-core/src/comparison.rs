//! Relative-Speed Ranking of Completed Results
//!
//! Thin orchestration over the pure ratio math in `cmdbench-stats`: sorts
//! completed results ascending by mean real time and decorates each
//! non-fastest entry with its speed ratio against the fastest.

use cmdbench_stats::{relative_speeds, SpeedMeasurement, SpeedRatio};

use crate::runner::BenchmarkResult;

/// A ranked, read-only view over one result. Lives only as long as the
/// results it borrows from — the summary-printing phase.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonEntry<'a> {
    /// The underlying benchmark result.
    pub result: &'a BenchmarkResult,
    /// Ratio against the fastest result. `None` for the fastest entry
    /// itself, which serves as the baseline.
    pub ratio: Option<SpeedRatio>,
}

/// Rank results ascending by mean real time.
///
/// The sort is stable, so ties keep input order. The first returned entry
/// is the baseline and carries no ratio; a single-result input therefore
/// yields no ratio entries at all.
pub fn compare_results(results: &[BenchmarkResult]) -> Vec<ComparisonEntry<'_>> {
    let measurements: Vec<SpeedMeasurement> = results
        .iter()
        .map(|r| SpeedMeasurement {
            mean_ns: r.mean_real_ns,
            stdev_ns: r.stdev_real_ns,
        })
        .collect();

    relative_speeds(&measurements)
        .into_iter()
        .map(|speed| ComparisonEntry {
            result: &results[speed.index],
            ratio: speed.ratio,
        })
        .collect()
}
