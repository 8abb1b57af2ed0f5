//! Command-line interface module

use crate::logging::{LogFormat, LogLevel};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Long options also accepted with a single leading dash
const SINGLE_DASH_LONG: [&str; 4] = ["config", "host", "op", "size"];

/// Access Checker - measure TCP throughput against one or more servers
#[derive(Parser, Debug, Clone)]
#[command(name = "access-checker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML configuration file [default: config.yaml]
    #[arg(short, long, env = "ACCESS_CHECKER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Server address for a single ad-hoc test
    #[arg(short = 'H', long, value_name = "ADDR:PORT")]
    pub host: Option<String>,

    /// Operation for the ad-hoc test: download or upload
    #[arg(short, long, value_name = "OPERATION")]
    pub op: Option<String>,

    /// Payload size for the ad-hoc test (e.g. 1KB, 512KB, 1MB, 16MB)
    #[arg(short, long, value_name = "SIZE")]
    pub size: Option<String>,

    /// Attempts per host for the ad-hoc test
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub repeat: i64,

    /// Exchange timeout for the ad-hoc test (e.g. 500ms, 10s, 2m)
    #[arg(short, long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// List every attempt in the summary
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Console)]
    pub log_format: LogFormat,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero status if any attempt failed
    #[arg(long)]
    pub fail_on_error: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.quiet && self.debug {
            return Err("Cannot specify both --quiet and --debug".to_string());
        }

        Ok(())
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.color {
            true
        } else if self.no_color || self.json {
            false
        } else {
            supports_color()
        }
    }

    /// Minimum level for diagnostics
    pub fn log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else if self.quiet {
            LogLevel::Warn
        } else {
            LogLevel::Info
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        match &self.config {
            Some(path) => summary.push_str(&format!("  Config file: {}\n", path.display())),
            None => summary.push_str(&format!("  Config file: {} (default)\n", crate::defaults::DEFAULT_CONFIG_PATH)),
        }
        if let Some(ref host) = self.host {
            summary.push_str(&format!("  Ad-hoc host: {}\n", host));
        }
        if let Some(ref op) = self.op {
            summary.push_str(&format!("  Ad-hoc operation: {}\n", op));
        }
        if let Some(ref size) = self.size {
            summary.push_str(&format!("  Ad-hoc size: {}\n", size));
        }
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Log level: {}\n", self.log_level().as_str()));

        summary
    }
}

/// Rewrite `-config`, `-host`, `-op` and `-size` (also `-size=1KB`) to
/// their double-dash spelling so clap does not read them as clustered short
/// flags. Anything after `--` passes through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut options_ended = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if options_ended {
                return arg;
            }
            if arg == "--" {
                options_ended = true;
                return arg;
            }
            match arg.to_str().and_then(single_dash_long) {
                Some(rewritten) => OsString::from(rewritten),
                None => arg,
            }
        })
        .collect()
}

fn single_dash_long(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    SINGLE_DASH_LONG.contains(&name).then(|| format!("-{}", arg))
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
