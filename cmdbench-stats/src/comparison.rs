//! Relative-Speed Comparison
//!
//! Ranks a set of measurements against the fastest one and attaches an
//! uncertainty band to each speed ratio. The band is the sum of the two
//! one-sided deltas obtained by shifting both means one standard deviation
//! in the same direction; it overstates the true spread and can go
//! non-finite when `baseline_mean - baseline_stdev` is zero or negative.
//! Non-finite values are surfaced as-is, never a panic.

/// Mean and spread of one benchmark, as input to the comparison.
#[derive(Debug, Clone, Copy)]
pub struct SpeedMeasurement {
    /// Mean real time in nanoseconds.
    pub mean_ns: i64,
    /// Sample standard deviation in nanoseconds, when defined.
    pub stdev_ns: Option<f64>,
}

/// A speed ratio against the baseline with its uncertainty band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedRatio {
    /// `mean / baseline_mean`; at least 1.0 for finite inputs.
    pub factor: f64,
    /// Width of the uncertainty band around `factor`.
    pub uncertainty: f64,
}

/// One ranked entry of the comparison, ascending by mean.
#[derive(Debug, Clone, Copy)]
pub struct RelativeSpeed {
    /// Index of the measurement in the caller's input slice.
    pub index: usize,
    /// Ratio against the fastest measurement. `None` for the baseline
    /// itself.
    pub ratio: Option<SpeedRatio>,
}

/// Ratio of `measurement` to `baseline` with the propagated band.
///
/// A measurement without a defined stdev contributes zero spread.
pub fn speed_ratio(measurement: SpeedMeasurement, baseline: SpeedMeasurement) -> SpeedRatio {
    let mean = measurement.mean_ns as f64;
    let base_mean = baseline.mean_ns as f64;
    let stdev = measurement.stdev_ns.unwrap_or(0.0);
    let base_stdev = baseline.stdev_ns.unwrap_or(0.0);

    let factor = mean / base_mean;
    let high_delta = (mean + stdev) / (base_mean + base_stdev) - factor;
    let low_delta = factor - (mean - stdev) / (base_mean - base_stdev);

    SpeedRatio {
        factor,
        uncertainty: high_delta.abs() + low_delta.abs(),
    }
}

/// Rank measurements ascending by mean.
///
/// The sort is stable, so equal means keep their input order. The first
/// entry is the baseline and carries no ratio; every other entry is
/// compared against it. A single measurement yields one baseline entry and
/// no ratios.
pub fn relative_speeds(measurements: &[SpeedMeasurement]) -> Vec<RelativeSpeed> {
    let mut order: Vec<usize> = (0..measurements.len()).collect();
    order.sort_by_key(|&index| measurements[index].mean_ns);

    let Some(&baseline_index) = order.first() else {
        return Vec::new();
    };
    let baseline = measurements[baseline_index];

    order
        .into_iter()
        .enumerate()
        .map(|(rank, index)| RelativeSpeed {
            index,
            ratio: (rank > 0).then(|| speed_ratio(measurements[index], baseline)),
        })
        .collect()
}
