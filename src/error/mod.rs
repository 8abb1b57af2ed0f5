//! Error handling for the access checker
//!
//! Three layers of failure exist and they never mix:
//! - [`AppError`]: fatal startup problems and per-test validation failures
//! - [`SizeError`]: rejected size specifications
//! - [`AttemptError`]: a single failed attempt, recorded and never fatal

use std::time::Duration;
use thiserror::Error;

/// Custom error types for the access checker
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Explicitly requested configuration file is absent
    #[error("Config file specified but not found: {path}")]
    ConfigNotFound { path: String },

    /// Nothing to run after merging configuration and flags
    #[error("No tests to run. Either provide a config file or specify --host, --op, and --size flags")]
    NoTestsSpecified,

    /// No target after merging configuration and flags
    #[error("No hosts specified. Either provide hosts in config or use --host flag")]
    NoHostsSpecified,

    /// A test definition failed validation
    #[error("Invalid test '{name}': {reason}")]
    InvalidTest { name: String, reason: String },

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (YAML, JSON, etc.)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Test execution errors
    #[error("Test execution error: {0}")]
    TestExecution(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new missing-configuration error
    pub fn config_not_found<S: Into<String>>(path: S) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create a new invalid test error
    pub fn invalid_test<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::InvalidTest {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new test execution error
    pub fn test_execution<S: Into<String>>(message: S) -> Self {
        Self::TestExecution(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::ConfigNotFound { .. } => "CONFIG",
            Self::NoTestsSpecified | Self::NoHostsSpecified => "CONFIG",
            Self::InvalidTest { .. } => "VALIDATION",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::TestExecution(_) => "TEST",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::ConfigNotFound { .. }
            | Self::NoTestsSpecified
            | Self::NoHostsSpecified
            | Self::InvalidTest { .. }
            | Self::Parse(_) => 1,
            Self::Io(_) => 5,
            Self::TestExecution(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Short hint printed under fatal errors
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Check the --config path, or omit it to use flags only")
            }
            Self::NoTestsSpecified | Self::NoHostsSpecified => {
                Some("Add 'hosts' and 'tests' to config.yaml, or pass --host, --op and --size")
            }
            Self::Parse(_) | Self::Config(_) => {
                Some("Check the YAML syntax and the field names: hosts, tests, name, operation, repeat, size, timeout")
            }
            Self::TestExecution(_) => Some("Some attempts failed; see the summary above"),
            _ => None,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Io(_) | Self::TestExecution(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
                _ => format!("[{}] {}", category.red().bold(), message.red()),
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::parse(format!("YAML parse error: {}", error))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// A size specification that cannot be used on the wire
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("invalid number in size '{input}'")]
    Malformed { input: String },

    #[error("size of {bytes} bytes exceeds maximum of {max} bytes")]
    TooLarge { bytes: u64, max: u32 },
}

/// Why a single attempt failed
#[derive(Error, Debug)]
pub enum AttemptError {
    #[error("failed to connect to {host}: {source}")]
    ConnectFailed {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error {stage}: {source}")]
    Transport {
        stage: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected response size: expected {expected}, got {actual}")]
    SizeMismatch { expected: u32, actual: u32 },

    #[error("hash validation failed")]
    HashMismatch { elapsed: Duration },

    #[error("server validation failed (result code {code})")]
    ServerRejected { code: u8, elapsed: Duration },

    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("random source failed: {0}")]
    RandomSource(String),
}

impl AttemptError {
    /// Attach the failing stage to an I/O error
    pub fn transport(stage: &'static str, source: std::io::Error) -> Self {
        Self::Transport { stage, source }
    }

    /// Stable label used in summaries and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectFailed { .. } => "ConnectFailed",
            Self::Transport { .. } => "TransportError",
            Self::SizeMismatch { .. } => "SizeMismatch",
            Self::HashMismatch { .. } => "HashMismatch",
            Self::ServerRejected { .. } => "ServerRejected",
            Self::UnknownOperation(_) => "UnknownOperation",
            Self::Timeout(_) => "Timeout",
            Self::RandomSource(_) => "RandomSource",
        }
    }

    /// Duration of a round trip that completed but was judged invalid
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            Self::HashMismatch { elapsed } | Self::ServerRejected { elapsed, .. } => Some(*elapsed),
            _ => None,
        }
    }
}
