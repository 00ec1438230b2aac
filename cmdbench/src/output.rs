//! Output Formatting
//!
//! Builds the per-command result block and the relative-speed summary as
//! strings, colorized unless colours are globally disabled.

use cmdbench_core::{compare_results, BenchmarkResult};
use cmdbench_stats::TimeUnit;
use colored::Colorize;

/// Scale `ns` into `unit` for display, guarding the zero-duration
/// sentinel.
fn scaled(ns: i64, unit: TimeUnit) -> String {
    if unit.divisor == 0 {
        return "0.00 ns".to_string();
    }
    format!("{:.2} {}", unit.scale(ns), unit.label)
}

fn scaled_f64(ns: f64, unit: TimeUnit) -> String {
    if unit.divisor == 0 {
        return "0.00 ns".to_string();
    }
    format!("{:.2} {}", unit.scale_f64(ns), unit.label)
}

/// Format one command's result block.
pub fn format_result(result: &BenchmarkResult) -> String {
    let mut output = String::new();

    let mean = scaled(result.mean_real_ns, result.real_unit).green();
    let cpu = format!(
        "[User: {}, System: {}]",
        scaled(result.mean_user_ns, result.user_unit).cyan(),
        scaled(result.mean_kernel_ns, result.kernel_unit).cyan()
    );

    match result.stdev_real_ns {
        Some(stdev) => {
            output.push_str(&format!(
                "  Time ({} ± {}):\t{} ± {}\t{}\n",
                "mean".green(),
                "σ".green(),
                mean,
                scaled_f64(stdev, result.real_unit).green(),
                cpu
            ));
        }
        // A single run has no spread to report.
        None => {
            output.push_str(&format!("  Time ({}):\t{}\t{}\n", "mean".green(), mean, cpu));
        }
    }

    output.push_str(&format!(
        "  Range ({} … {}):\t{} … {}\t{}\n",
        "min".cyan(),
        "max".red(),
        scaled(result.min_real_ns, result.real_unit).cyan(),
        scaled(result.max_real_ns, result.real_unit).red(),
        format!("{} runs", result.runs).bright_black()
    ));

    output
}

/// Format the relative-speed summary across all completed results.
///
/// Entries arrive ranked ascending by mean real time; the fastest command
/// leads and every slower command gets a ratio line against it.
pub fn format_summary(results: &[BenchmarkResult]) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", "Summary".bold()));

    for entry in compare_results(results) {
        match entry.ratio {
            None => {
                output.push_str(&format!("  '{}' ran\n", entry.result.command.cyan()));
            }
            Some(ratio) => {
                output.push_str(&format!(
                    "    {} ± {} times faster than '{}'\n",
                    format!("{:.2}", ratio.factor).green(),
                    format!("{:.2}", ratio.uncertainty).green(),
                    entry.result.command.red()
                ));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmdbench_stats::select_unit;

    fn result(command: &str, mean_ns: i64, stdev_ns: Option<f64>) -> BenchmarkResult {
        BenchmarkResult {
            command: command.to_string(),
            mean_real_ns: mean_ns,
            min_real_ns: mean_ns / 2,
            max_real_ns: mean_ns * 2,
            stdev_real_ns: stdev_ns,
            mean_user_ns: mean_ns / 2,
            mean_kernel_ns: mean_ns / 4,
            runs: 10,
            real_unit: select_unit(mean_ns),
            user_unit: select_unit(mean_ns / 2),
            kernel_unit: select_unit(mean_ns / 4),
        }
    }

    // Keep assertions free of ANSI escapes.
    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_result_block_contains_all_metrics() {
        plain();
        let block = format_result(&result("sleep 0.1", 100_000_000, Some(5_000_000.0)));

        assert!(block.contains("Time (mean ± σ)"));
        assert!(block.contains("100.00 ms"));
        assert!(block.contains("5.00 ms"));
        assert!(block.contains("User: 50.00 ms"));
        assert!(block.contains("System: 25.00 ms"));
        assert!(block.contains("Range (min … max)"));
        assert!(block.contains("10 runs"));
    }

    #[test]
    fn test_single_run_block_omits_stdev() {
        plain();
        let block = format_result(&result("true", 1_000_000, None));
        assert!(block.contains("Time (mean)"));
        assert!(!block.contains("σ"));
    }

    #[test]
    fn test_zero_duration_sentinel_displays_as_zero() {
        plain();
        let mut zeroed = result("true", 1_000_000, None);
        zeroed.mean_kernel_ns = 0;
        zeroed.kernel_unit = select_unit(0);
        let block = format_result(&zeroed);
        assert!(block.contains("System: 0.00 ns"));
    }

    #[test]
    fn test_summary_ranks_fastest_first() {
        plain();
        let results = vec![
            result("slow", 200_000_000, Some(10_000_000.0)),
            result("fast", 100_000_000, Some(5_000_000.0)),
        ];
        let summary = format_summary(&results);

        assert!(summary.starts_with("Summary"));
        assert!(summary.contains("'fast' ran"));
        assert!(summary.contains("2.00"));
        assert!(summary.contains("times faster than 'slow'"));
        // The baseline line precedes the ratio line.
        assert!(summary.find("'fast' ran").unwrap() < summary.find("times faster").unwrap());
    }
}
