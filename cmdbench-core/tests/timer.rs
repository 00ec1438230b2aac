//! Integration tests driving the platform timer against real child
//! processes. Unix-only: the validator environment has no Windows job
//! objects to exercise.

#![cfg(unix)]

use cmdbench_core::{BenchError, BenchmarkRunner, CancelToken, OsProcessTimer, ProcessTimer};

fn shell_args(script: &str) -> Vec<String> {
    vec!["-c".to_string(), script.to_string()]
}

#[test]
fn test_successful_run_records_real_time() {
    let mut timer = OsProcessTimer::new();
    timer.reset();
    timer
        .run(&CancelToken::new(), "/bin/sh", &shell_args("exit 0"))
        .unwrap();

    assert!(timer.real_time_ns() > 0);
    assert!(timer.user_time_ns() >= 0);
    assert!(timer.kernel_time_ns() >= 0);
}

#[test]
fn test_nonzero_exit_is_a_valid_sample() {
    let mut timer = OsProcessTimer::new();
    timer.reset();
    // Benchmarking a failing command is legitimate; only launch/wait
    // failures are errors.
    timer
        .run(&CancelToken::new(), "/bin/sh", &shell_args("exit 3"))
        .unwrap();
    assert!(timer.real_time_ns() > 0);
}

#[test]
fn test_missing_executable_is_a_launch_error() {
    let mut timer = OsProcessTimer::new();
    timer.reset();
    let err = timer
        .run(
            &CancelToken::new(),
            "/nonexistent/cmdbench-test-binary",
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, BenchError::Launch { .. }));
}

#[test]
fn test_wall_clock_bounds_a_sleep() {
    let mut timer = OsProcessTimer::new();
    timer.reset();
    timer
        .run(&CancelToken::new(), "/bin/sh", &shell_args("sleep 0.05"))
        .unwrap();

    // At least the sleep itself; generous upper bound for slow machines.
    assert!(timer.real_time_ns() >= 40_000_000);
    assert!(timer.real_time_ns() < 5_000_000_000);
}

#[test]
fn test_reset_clears_previous_measurement() {
    let mut timer = OsProcessTimer::new();
    timer.reset();
    timer
        .run(&CancelToken::new(), "/bin/sh", &shell_args("sleep 0.02"))
        .unwrap();
    assert!(timer.real_time_ns() > 0);

    timer.reset();
    assert_eq!(timer.real_time_ns(), 0);
    assert_eq!(timer.user_time_ns(), 0);
    assert_eq!(timer.kernel_time_ns(), 0);
}

#[test]
fn test_pre_cancelled_token_skips_launch() {
    let token = CancelToken::new();
    token.cancel();

    let mut timer = OsProcessTimer::new();
    timer.reset();
    let err = timer
        .run(&token, "/bin/sh", &shell_args("exit 0"))
        .unwrap_err();
    assert!(matches!(err, BenchError::Cancelled));
}

#[test]
fn test_runner_end_to_end_over_real_processes() {
    let timer = OsProcessTimer::new();
    let mut runner = BenchmarkRunner::new(timer, 1, 3);

    let mut progress_count = 0;
    let result = runner
        .run(
            &CancelToken::new(),
            "sh -c 'exit 0'",
            "/bin/sh",
            &shell_args("exit 0"),
            |_| progress_count += 1,
        )
        .unwrap();

    assert_eq!(progress_count, 3);
    assert_eq!(result.runs, 3);
    assert!(result.min_real_ns <= result.mean_real_ns);
    assert!(result.mean_real_ns <= result.max_real_ns);
    assert!(result.stdev_real_ns.is_some());
    assert!(!result.real_unit.label.is_empty());
}
