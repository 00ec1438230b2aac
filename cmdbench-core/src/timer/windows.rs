//! Job-object process timing.

use std::mem;
use std::os::windows::io::AsRawHandle;
use std::os::windows::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows_sys::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Thread32First, Thread32Next, TH32CS_SNAPTHREAD, THREADENTRY32,
};
use windows_sys::Win32::System::JobObjects::{
    AssignProcessToJobObject, CreateJobObjectW, JobObjectBasicAccountingInformation,
    QueryInformationJobObject, TerminateJobObject, JOBOBJECT_BASIC_ACCOUNTING_INFORMATION,
};
use windows_sys::Win32::System::Threading::{
    OpenThread, ResumeThread, CREATE_SUSPENDED, THREAD_SUSPEND_RESUME,
};

use super::ProcessTimer;
use crate::cancel::CancelToken;
use crate::error::BenchError;

/// Poll interval while waiting for the child to exit.
const WAIT_POLL: Duration = Duration::from_micros(200);

/// Job accounting reports CPU time in 100 ns ticks.
const HUNDRED_NS_TICKS: i64 = 100;

/// Times one child process through a job object.
///
/// The child is created suspended, attached to a fresh job, then resumed;
/// the job's cumulative basic accounting covers the child and every
/// process it spawns transitively, so a shell wrapping the real command is
/// measured in full. Real time is the wall-clock span from resume to exit.
#[derive(Debug, Default)]
pub struct JobObjectTimer {
    real_ns: i64,
    user_ns: i64,
    kernel_ns: i64,
}

impl JobObjectTimer {
    /// Create a timer with no recorded measurement.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessTimer for JobObjectTimer {
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

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .creation_flags(CREATE_SUSPENDED)
            .spawn()
            .map_err(|source| BenchError::Launch {
                command: program.to_string(),
                source,
            })?;

        // The job is torn down on every exit path below, taking any
        // stray descendants with it.
        let job = match JobHandle::create() {
            Ok(job) => job,
            Err(err) => {
                let _ = child.kill();
                return Err(err);
            }
        };

        // SAFETY: the process handle stays valid while `child` is alive.
        let process = child.as_raw_handle() as HANDLE;
        if unsafe { AssignProcessToJobObject(job.0, process) } == 0 {
            let _ = child.kill();
            return Err(BenchError::Accounting(std::io::Error::last_os_error()));
        }

        let thread = match main_thread_of(child.id()) {
            Ok(thread) => thread,
            Err(err) => {
                let _ = child.kill();
                return Err(err);
            }
        };

        let started = Instant::now();
        // SAFETY: the handle was opened with THREAD_SUSPEND_RESUME.
        unsafe {
            ResumeThread(thread);
            CloseHandle(thread);
        }

        wait_for_exit(&mut child, token)?;
        self.real_ns = started.elapsed().as_nanos() as i64;

        let info = query_accounting(&job)?;
        self.user_ns = info.TotalUserTime * HUNDRED_NS_TICKS;
        self.kernel_ns = info.TotalKernelTime * HUNDRED_NS_TICKS;
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

/// Owned job-object handle. Dropping terminates the job before closing
/// the handle, so no kernel object or descendant process can leak.
struct JobHandle(HANDLE);

impl JobHandle {
    fn create() -> Result<Self, BenchError> {
        // SAFETY: no attributes, unnamed job; a null return is the only
        // failure signal.
        let handle = unsafe { CreateJobObjectW(std::ptr::null(), std::ptr::null()) };
        if handle.is_null() {
            return Err(BenchError::Accounting(std::io::Error::last_os_error()));
        }
        Ok(Self(handle))
    }
}

impl Drop for JobHandle {
    fn drop(&mut self) {
        // SAFETY: the handle is owned and not yet closed.
        unsafe {
            TerminateJobObject(self.0, 0);
            CloseHandle(self.0);
        }
    }
}

/// Poll the child until it exits, killing it if cancellation arrives.
fn wait_for_exit(child: &mut Child, token: &CancelToken) -> Result<(), BenchError> {
    loop {
        match child.try_wait() {
            Ok(Some(_)) => return Ok(()),
            Ok(None) => {
                if token.is_cancelled() {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BenchError::Cancelled);
                }
                std::thread::sleep(WAIT_POLL);
            }
            Err(err) => return Err(BenchError::Accounting(err)),
        }
    }
}

/// Locate the suspended child's main thread via a toolhelp snapshot.
fn main_thread_of(pid: u32) -> Result<HANDLE, BenchError> {
    // SAFETY: the snapshot handle is closed on every path below; the
    // entry struct is plain old data sized before the first query.
    unsafe {
        let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPTHREAD, 0);
        if snapshot == INVALID_HANDLE_VALUE {
            return Err(BenchError::Accounting(std::io::Error::last_os_error()));
        }

        let mut entry: THREADENTRY32 = mem::zeroed();
        entry.dwSize = mem::size_of::<THREADENTRY32>() as u32;

        let mut more = Thread32First(snapshot, &mut entry);
        while more != 0 {
            if entry.th32OwnerProcessID == pid {
                let thread = OpenThread(THREAD_SUSPEND_RESUME, 0, entry.th32ThreadID);
                CloseHandle(snapshot);
                if thread.is_null() {
                    return Err(BenchError::Accounting(std::io::Error::last_os_error()));
                }
                return Ok(thread);
            }
            more = Thread32Next(snapshot, &mut entry);
        }

        CloseHandle(snapshot);
        Err(BenchError::Accounting(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no thread found for suspended child",
        )))
    }
}

/// Query the job's cumulative basic accounting.
fn query_accounting(
    job: &JobHandle,
) -> Result<JOBOBJECT_BASIC_ACCOUNTING_INFORMATION, BenchError> {
    // SAFETY: the buffer matches the requested information class.
    let mut info: JOBOBJECT_BASIC_ACCOUNTING_INFORMATION = unsafe { mem::zeroed() };
    let ok = unsafe {
        QueryInformationJobObject(
            job.0,
            JobObjectBasicAccountingInformation,
            &mut info as *mut _ as *mut core::ffi::c_void,
            mem::size_of::<JOBOBJECT_BASIC_ACCOUNTING_INFORMATION>() as u32,
            std::ptr::null_mut(),
        )
    };
    if ok == 0 {
        return Err(BenchError::Accounting(std::io::Error::last_os_error()));
    }
    Ok(info)
}
