//! Time-Unit Selection
//!
//! Picks the largest human-scale unit that a nanosecond duration still
//! registers in, scanning from hours down to nanoseconds.

/// A display scale for nanosecond durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUnit {
    /// Nanoseconds per unit. Zero only for the sentinel returned for a
    /// zero-duration input.
    pub divisor: i64,
    /// Short label, e.g. `"ms"`.
    pub label: &'static str,
}

const NANOS_PER_MICRO: i64 = 1_000;
const NANOS_PER_MILLI: i64 = 1_000_000;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;

/// Unit tiers ordered largest to smallest.
const TIERS: [TimeUnit; 6] = [
    TimeUnit { divisor: NANOS_PER_HOUR, label: "h" },
    TimeUnit { divisor: NANOS_PER_MINUTE, label: "m" },
    TimeUnit { divisor: NANOS_PER_SECOND, label: "s" },
    TimeUnit { divisor: NANOS_PER_MILLI, label: "ms" },
    TimeUnit { divisor: NANOS_PER_MICRO, label: "µs" },
    TimeUnit { divisor: 1, label: "ns" },
];

impl TimeUnit {
    /// Scale an integer nanosecond value into this unit.
    pub fn scale(&self, ns: i64) -> f64 {
        if self.divisor == 0 {
            return 0.0;
        }
        ns as f64 / self.divisor as f64
    }

    /// Scale an already-fractional nanosecond value (e.g. a stdev) into
    /// this unit.
    pub fn scale_f64(&self, ns: f64) -> f64 {
        if self.divisor == 0 {
            return 0.0;
        }
        ns / self.divisor as f64
    }
}

/// Select the first tier the duration registers a whole unit in.
///
/// A zero duration fits no tier and yields the zero-divisor sentinel;
/// [`TimeUnit::scale`] guards it instead of dividing by zero.
pub fn select_unit(mean_ns: i64) -> TimeUnit {
    for tier in TIERS {
        if mean_ns / tier.divisor > 0 {
            return tier;
        }
    }
    TimeUnit { divisor: 0, label: "" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(select_unit(1).label, "ns");
        assert_eq!(select_unit(999).label, "ns");
        assert_eq!(select_unit(1_000).label, "µs");
        assert_eq!(select_unit(999_999).label, "µs");
        assert_eq!(select_unit(1_000_000).label, "ms");
        assert_eq!(select_unit(NANOS_PER_SECOND).label, "s");
        assert_eq!(select_unit(NANOS_PER_MINUTE).label, "m");
        assert_eq!(select_unit(NANOS_PER_HOUR).label, "h");
        assert_eq!(select_unit(3 * NANOS_PER_HOUR).label, "h");
    }

    #[test]
    fn test_monotonic_over_increasing_durations() {
        let durations = [
            1,
            500,
            1_000,
            250_000,
            NANOS_PER_MILLI,
            40 * NANOS_PER_MILLI,
            NANOS_PER_SECOND,
            59 * NANOS_PER_SECOND,
            NANOS_PER_MINUTE,
            NANOS_PER_HOUR,
        ];
        let mut previous = 0i64;
        for duration in durations {
            let unit = select_unit(duration);
            assert!(
                unit.divisor >= previous,
                "unit shrank at {} ns: {} < {}",
                duration,
                unit.divisor,
                previous
            );
            previous = unit.divisor;
        }
    }

    #[test]
    fn test_zero_duration_sentinel() {
        let unit = select_unit(0);
        assert_eq!(unit.divisor, 0);
        assert_eq!(unit.label, "");
        // The sentinel must not divide by zero.
        assert_eq!(unit.scale(0), 0.0);
        assert_eq!(unit.scale_f64(0.0), 0.0);
    }

    #[test]
    fn test_scaling() {
        let unit = select_unit(1_500_000);
        assert_eq!(unit.label, "ms");
        assert!((unit.scale(1_500_000) - 1.5).abs() < 1e-9);
        assert!((unit.scale_f64(250_000.0) - 0.25).abs() < 1e-9);
    }
}
