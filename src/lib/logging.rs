//! Diagnostic logging
//!
//! The wrapper must be invisible to the build that calls it, so no subscriber
//! is installed unless one of these is set:
//! - `CHAIN_WRAPPER_VERBOSE=1|true`: log at debug level
//! - `CHAIN_WRAPPER_LOG=<directive>`: an `EnvFilter` directive, e.g. `chain_wrapper=trace`
//!
//! Events go to stderr, next to the real tool's own diagnostics.

use std::env;
use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration from environment variables
#[derive(Debug, Clone, Default)]
pub struct LogConfig {
    /// Verbose mode
    pub verbose: bool,
    /// Explicit filter directive, takes precedence over `verbose`
    pub filter: Option<String>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self {
            verbose: env_bool("CHAIN_WRAPPER_VERBOSE"),
            filter: env::var("CHAIN_WRAPPER_LOG").ok().filter(|f| !f.is_empty()),
        }
    }

    /// Filter directive to install, if logging is enabled at all
    pub fn directive(&self) -> Option<String> {
        self.filter
            .clone()
            .or_else(|| self.verbose.then(|| "debug".to_string()))
    }
}

/// Install the stderr subscriber described by `config`
pub fn init(config: &LogConfig) {
    let Some(directive) = config.directive() else {
        return;
    };

    // Another subscriber may already be set (tests); keep it
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_ansi(false)
                .with_writer(io::stderr),
        )
        .try_init();
}

fn env_bool(name: &str) -> bool {
    env::var(name).is_ok_and(|v| v == "1" || v == "true")
}
