//! Process launcher
//!
//! Runs a rewritten command line as a child process that shares the wrapper's
//! environment, working directory and standard streams, then waits for it.
//! Nothing is buffered or captured; the child writes straight to the
//! inherited handles.
//!
//! The `Launcher` trait is the seam between the wrapper logic and the OS, so
//! the entrypoint can be exercised with a fake launcher in tests.

use thiserror::Error;

/// Exit code used when the wrapper itself fails to run the real tool
///
/// Follows the `env`/`timeout` convention of reserving 125 for failures of the
/// launching program rather than the launched one.
pub const WRAPPER_FAILURE_EXIT_CODE: i32 = 125;

/// Failure of the wrapper to run the real tool
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchError {
    /// The child process could not be created
    #[error("Failed to launch \"{program}\": {message}")]
    Spawn { program: String, message: String },
    /// The child ran but its exit status could not be obtained
    #[error("Could not retrieve exit code for \"{program}\": {message}")]
    Status { program: String, message: String },
}

/// Spawns a command line and waits for the resulting process
pub trait Launcher {
    /// Owned handle to a running child; dropping it releases its OS resources
    type Child;

    fn spawn(&self, command_line: &str) -> Result<Self::Child, LaunchError>;

    /// Block until the child exits and return its exit code
    fn wait(&self, child: Self::Child) -> Result<i32, LaunchError>;
}

/// Launcher backed by the host OS
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

pub use platform::ChildProcess;

impl Launcher for SystemLauncher {
    type Child = ChildProcess;

    fn spawn(&self, command_line: &str) -> Result<ChildProcess, LaunchError> {
        platform::spawn(command_line)
    }

    fn wait(&self, child: ChildProcess) -> Result<i32, LaunchError> {
        platform::wait(child)
    }
}

#[cfg(windows)]
mod platform {
    use std::{io, iter, mem, ptr};

    use tracing::debug;
    use windows_sys::Win32::Foundation::{CloseHandle, HANDLE, WAIT_FAILED};
    use windows_sys::Win32::System::Threading::{
        CreateProcessW, GetExitCodeProcess, WaitForSingleObject, INFINITE, PROCESS_INFORMATION,
        STARTUPINFOW,
    };

    use super::LaunchError;
    use crate::command_line::program_name;
    use crate::error_reporter::describe_io_error;

    /// Process and thread handles of a child, closed on drop
    pub struct ChildProcess {
        program: String,
        process: HANDLE,
        thread: HANDLE,
    }

    impl Drop for ChildProcess {
        fn drop(&mut self) {
            unsafe {
                CloseHandle(self.process);
                CloseHandle(self.thread);
            }
        }
    }

    pub fn spawn(command_line: &str) -> Result<ChildProcess, LaunchError> {
        let program = program_name(command_line);

        // CreateProcessW may write into the command line buffer
        let mut wide: Vec<u16> = command_line.encode_utf16().chain(iter::once(0)).collect();

        let mut startup: STARTUPINFOW = unsafe { mem::zeroed() };
        startup.cb = mem::size_of::<STARTUPINFOW>() as u32;
        let mut info: PROCESS_INFORMATION = unsafe { mem::zeroed() };

        // No application name: the program comes from the first token of the
        // command line. Environment, directory and console are the parent's.
        let created = unsafe {
            CreateProcessW(
                ptr::null(),
                wide.as_mut_ptr(),
                ptr::null(),
                ptr::null(),
                0,
                0,
                ptr::null(),
                ptr::null(),
                &startup,
                &mut info,
            )
        };

        if created == 0 {
            let err = io::Error::last_os_error();
            return Err(LaunchError::Spawn {
                program,
                message: describe_io_error(&err),
            });
        }

        debug!(pid = info.dwProcessId, "Spawned {}", program);

        Ok(ChildProcess {
            program,
            process: info.hProcess,
            thread: info.hThread,
        })
    }

    pub fn wait(child: ChildProcess) -> Result<i32, LaunchError> {
        if unsafe { WaitForSingleObject(child.process, INFINITE) } == WAIT_FAILED {
            return Err(status_error(&child));
        }

        let mut exit_code: u32 = 0;
        if unsafe { GetExitCodeProcess(child.process, &mut exit_code) } == 0 {
            return Err(status_error(&child));
        }

        // Same bits as the DWORD; ExitProcess receives them unchanged
        Ok(exit_code as i32)
    }

    /// Build a status error from the last OS error; read it before anything else
    fn status_error(child: &ChildProcess) -> LaunchError {
        let err = io::Error::last_os_error();
        LaunchError::Status {
            program: child.program.clone(),
            message: describe_io_error(&err),
        }
    }
}

#[cfg(not(windows))]
mod platform {
    use std::process::{Child, Command, ExitStatus};

    use tracing::debug;

    use super::LaunchError;
    use crate::command_line::split_arguments;
    use crate::error_reporter::describe_io_error;

    /// A running child process
    pub struct ChildProcess {
        program: String,
        child: Child,
    }

    pub fn spawn(command_line: &str) -> Result<ChildProcess, LaunchError> {
        let mut args = split_arguments(command_line).into_iter();
        let program = args.next().unwrap_or_default();

        let child = Command::new(&program)
            .args(args)
            .spawn()
            .map_err(|e| LaunchError::Spawn {
                program: program.clone(),
                message: describe_io_error(&e),
            })?;

        debug!(pid = child.id(), "Spawned {}", program);

        Ok(ChildProcess { program, child })
    }

    pub fn wait(mut child: ChildProcess) -> Result<i32, LaunchError> {
        let status = child.child.wait().map_err(|e| LaunchError::Status {
            program: child.program.clone(),
            message: describe_io_error(&e),
        })?;

        exit_code(status).ok_or_else(|| LaunchError::Status {
            program: child.program.clone(),
            message: format!("Process ended without an exit code ({})", status),
        })
    }

    /// Exit code of a finished child; a signal N is reported as 128 + N
    fn exit_code(status: ExitStatus) -> Option<i32> {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            status.code().or_else(|| status.signal().map(|sig| 128 + sig))
        }

        #[cfg(not(unix))]
        {
            status.code()
        }
    }
}
