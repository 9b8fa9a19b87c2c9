//! chain-wrapper library
//!
//! Stands in for a compiler or linker: rewrites the invocation to call the
//! renamed real tool with fixed reproducible-build flags, runs it, and exits
//! with its exit code.

pub mod command_line;
pub mod error_reporter;
pub mod launcher;
pub mod logging;
pub mod rewriter;
pub mod wrapper;

// Re-export commonly used items
pub use command_line::{
    first_token_end, join_arguments, program_name, quote_argument, split_arguments,
};
pub use error_reporter::{describe_error_code, describe_io_error};
pub use launcher::{ChildProcess, LaunchError, Launcher, SystemLauncher, WRAPPER_FAILURE_EXIT_CODE};
pub use logging::LogConfig;
pub use rewriter::{Variant, WrapperConfig};
pub use wrapper::{configured, execute, main_with, run};
