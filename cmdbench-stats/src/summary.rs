//! Sample Aggregation
//!
//! Folds a complete set of raw timing samples into mean, extrema and
//! standard deviation. The incremental running mean exists for live
//! progress estimates only; the authoritative aggregate is always
//! recomputed from the full sample set.

/// Aggregate of one command's real-time samples, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleSummary {
    /// Truncating integer mean of all samples.
    pub mean_ns: i64,
    /// Smallest sample.
    pub min_ns: i64,
    /// Largest sample.
    pub max_ns: i64,
    /// Sample standard deviation. `None` with fewer than two samples.
    pub stdev_ns: Option<f64>,
}

/// Fold one new sample into a running mean.
///
/// Uses truncating integer division so every call site agrees on the same
/// estimate for a given prefix of samples.
pub fn update_running_mean(prev_mean: i64, prev_count: i64, sample: i64) -> i64 {
    (prev_mean * prev_count + sample) / (prev_count + 1)
}

/// Sample standard deviation around an integer mean:
/// `sqrt(Σ(x - mean)² / (n - 1))`.
///
/// Returns `None` when fewer than two samples exist — a single measurement
/// has no variance, which is not the same as zero variance.
pub fn sample_stdev(samples: &[i64], mean_ns: i64) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    // Squared nanosecond deltas overflow i64 once the spread passes a
    // few seconds; widen before multiplying.
    let mut numerator: i128 = 0;
    for &sample in samples {
        let delta = (sample - mean_ns) as i128;
        numerator += delta * delta;
    }
    Some((numerator as f64 / (samples.len() - 1) as f64).sqrt())
}

/// Compute the aggregate for a complete sample set in a single pass.
///
/// An empty slice yields a zeroed summary with no stdev; callers that
/// guarantee at least one measured run never observe it.
pub fn compute_summary(samples: &[i64]) -> SampleSummary {
    if samples.is_empty() {
        return SampleSummary {
            mean_ns: 0,
            min_ns: 0,
            max_ns: 0,
            stdev_ns: None,
        };
    }

    let mut total: i64 = 0;
    let mut min_ns = i64::MAX;
    let mut max_ns = i64::MIN;
    for &sample in samples {
        total += sample;
        min_ns = min_ns.min(sample);
        max_ns = max_ns.max(sample);
    }
    let mean_ns = total / samples.len() as i64;

    SampleSummary {
        mean_ns,
        min_ns,
        max_ns,
        stdev_ns: sample_stdev(samples, mean_ns),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_summary() {
        let samples = [10, 20, 30, 40, 50];
        let summary = compute_summary(&samples);

        assert_eq!(summary.mean_ns, 30);
        assert_eq!(summary.min_ns, 10);
        assert_eq!(summary.max_ns, 50);
        // stdev = sqrt(1000 / 4) ≈ 15.81
        let stdev = summary.stdev_ns.unwrap();
        assert!((stdev - (1000.0f64 / 4.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_min_mean_max_ordering() {
        let sets: &[&[i64]] = &[
            &[1],
            &[5, 5, 5],
            &[1, 2, 3, 4, 5, 6, 7],
            &[1_000_000, 3, 999, 42],
        ];
        for samples in sets {
            let summary = compute_summary(samples);
            assert!(summary.min_ns <= summary.mean_ns);
            assert!(summary.mean_ns <= summary.max_ns);
        }
    }

    #[test]
    fn test_stdev_undefined_below_two_samples() {
        assert_eq!(sample_stdev(&[], 0), None);
        assert_eq!(sample_stdev(&[42], 42), None);

        let summary = compute_summary(&[42]);
        assert_eq!(summary.mean_ns, 42);
        assert_eq!(summary.min_ns, 42);
        assert_eq!(summary.max_ns, 42);
        assert_eq!(summary.stdev_ns, None);
    }

    #[test]
    fn test_stdev_zero_variance() {
        let stdev = sample_stdev(&[7, 7, 7, 7], 7).unwrap();
        assert!(stdev.abs() < f64::EPSILON);
    }

    #[test]
    fn test_running_mean_matches_direct_mean() {
        let samples = [13, 907, 44, 5_000_001, 2, 318, 77_777];

        let mut running = 0i64;
        for (i, &sample) in samples.iter().enumerate() {
            running = update_running_mean(running, i as i64, sample);
        }

        let direct = samples.iter().sum::<i64>() / samples.len() as i64;
        // Truncating division loses at most one unit per fold.
        assert!((running - direct).abs() <= samples.len() as i64);
    }

    #[test]
    fn test_running_mean_first_sample() {
        assert_eq!(update_running_mean(0, 0, 1234), 1234);
    }

    #[test]
    fn test_empty_summary_is_zeroed() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.mean_ns, 0);
        assert_eq!(summary.stdev_ns, None);
    }
}
