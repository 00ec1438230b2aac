//! `wait4`-based process timing.

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use super::ProcessTimer;
use crate::cancel::CancelToken;
use crate::error::BenchError;

/// Poll interval while waiting for the child to exit. Short enough that
/// cancellation feels immediate, long enough not to perturb the child.
const WAIT_POLL: Duration = Duration::from_micros(200);

/// Times one child process via the rusage snapshot reported by `wait4(2)`.
///
/// CPU time covers the child plus any descendants the child itself reaped.
/// Descendants the child never waits on are not accounted, unlike the
/// Windows job-object variant.
#[derive(Debug, Default)]
pub struct RusageTimer {
    real_ns: i64,
    user_ns: i64,
    kernel_ns: i64,
}

impl RusageTimer {
    /// Create a timer with no recorded measurement.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessTimer for RusageTimer {
    fn reset(&mut self) {
        self.real_ns = 0;
        self.user_ns = 0;
        self.kernel_ns = 0;
    }

    fn run(
        &mut self,
        token: &CancelToken,
        program: &str,
        args: &[String],
    ) -> Result<(), BenchError> {
        if token.is_cancelled() {
            return Err(BenchError::Cancelled);
        }

        let started = Instant::now();
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| BenchError::Launch {
                command: program.to_string(),
                source,
            })?;

        let usage = wait_with_usage(&mut child, token)?;
        self.real_ns = started.elapsed().as_nanos() as i64;
        self.user_ns = timeval_to_ns(usage.ru_utime);
        self.kernel_ns = timeval_to_ns(usage.ru_stime);
        Ok(())
    }

    fn real_time_ns(&self) -> i64 {
        self.real_ns
    }

    fn user_time_ns(&self) -> i64 {
        self.user_ns
    }

    fn kernel_time_ns(&self) -> i64 {
        self.kernel_ns
    }
}

/// Reap the child with `wait4`, collecting its rusage.
///
/// Polls with `WNOHANG` so a cancelled token can kill the in-flight child
/// instead of blocking until it exits on its own.
fn wait_with_usage(child: &mut Child, token: &CancelToken) -> Result<libc::rusage, BenchError> {
    let pid = child.id() as libc::pid_t;
    loop {
        let mut status: libc::c_int = 0;
        // SAFETY: rusage is plain old data; wait4 fills it in on success.
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
        let waited = unsafe { libc::wait4(pid, &mut status, libc::WNOHANG, &mut usage) };
        match waited {
            -1 => {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(BenchError::Accounting(err));
            }
            0 => {
                if token.is_cancelled() {
                    let _ = child.kill();
                    // Reap so the kernel can release the pid.
                    unsafe {
                        libc::wait4(pid, &mut status, 0, &mut usage);
                    }
                    return Err(BenchError::Cancelled);
                }
                std::thread::sleep(WAIT_POLL);
            }
            _ => return Ok(usage),
        }
    }
}

fn timeval_to_ns(tv: libc::timeval) -> i64 {
    tv.tv_sec as i64 * 1_000_000_000 + tv.tv_usec as i64 * 1_000
}
