//! Access Checker
//!
//! Measures single-connection TCP throughput against one or more servers.
//! Each attempt opens a connection, moves one length-prefixed payload in
//! either direction, and verifies it with a trailing SHA-256 digest. Tests
//! come from a YAML suite file, from command-line flags, or both.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod protocol;
pub mod runner;
pub mod size;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, AttemptError, Result, SizeError};
pub use executor::{ExecutionConfig, TcpExecutor, TestExecutor};
pub use models::{AttemptResult, Operation, SuiteConfig, TestDefinition, ValidatedTest};
pub use output::{OutputCoordinator, OutputFormatter, OutputFormatterFactory};
pub use runner::{SuiteResults, SuiteRunner};
pub use stats::RunSummary;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    /// Suite file looked up when `--config` is not given
    pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
    /// Pause between attempts of the same test and host
    pub const ATTEMPT_PACING: Duration = Duration::from_millis(100);
}
