//! Wrapper entrypoint
//!
//! read command line -> rewrite -> spawn -> wait -> exit with the child's code.
//! Failures of the wrapper itself end the run with a stderr line and
//! `WRAPPER_FAILURE_EXIT_CODE`; a failing real tool is passed through silently.

use std::process;

use tracing::debug;

use crate::command_line;
use crate::launcher::{LaunchError, Launcher, SystemLauncher, WRAPPER_FAILURE_EXIT_CODE};
use crate::logging::{self, LogConfig};
use crate::rewriter::WrapperConfig;

/// Pick a compile-time value, falling back to `default` when it was not set.
///
/// Meant for `option_env!` in `const` wrapper configurations.
pub const fn configured(value: Option<&'static str>, default: &'static str) -> &'static str {
    match value {
        Some(value) => value,
        None => default,
    }
}

/// Rewrite `raw` and run it to completion, returning the real tool's exit code
pub fn execute<L: Launcher>(
    config: &WrapperConfig,
    raw: &str,
    launcher: &L,
) -> Result<i32, LaunchError> {
    let rewritten = config.rewrite(raw);
    debug!("Old: [{}]", raw);
    debug!("New: [{}]", rewritten);

    let child = launcher.spawn(&rewritten)?;
    let exit_code = launcher.wait(child)?;

    debug!(exit_code, "Real tool finished");
    Ok(exit_code)
}

/// Like `execute`, but reports wrapper failures on stderr and maps them to
/// the failure exit code
pub fn run<L: Launcher>(config: &WrapperConfig, raw: &str, launcher: &L) -> i32 {
    match execute(config, raw, launcher) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("{}", e);
            WRAPPER_FAILURE_EXIT_CODE
        }
    }
}

/// Process entry point of a wrapper binary
pub fn main_with(config: &WrapperConfig) -> ! {
    logging::init(&LogConfig::from_env());

    let raw = command_line::current();
    let exit_code = run(config, &raw, &SystemLauncher);

    process::exit(exit_code)
}
