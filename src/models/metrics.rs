//! Per-attempt result data model

use crate::error::AttemptError;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of one (test, host, attempt) combination
#[derive(Debug)]
pub struct AttemptResult {
    pub test_name: String,
    pub host: String,
    /// 1-based attempt index
    pub attempt: u32,
    pub success: bool,
    /// Exchange time; zero unless a round trip completed
    pub duration: Duration,
    /// Payload bytes moved; zero on failure
    pub bytes: u64,
    pub error: Option<AttemptError>,
    pub timestamp: DateTime<Utc>,
}

impl AttemptResult {
    /// Create a successful attempt
    pub fn success(test_name: &str, host: &str, attempt: u32, duration: Duration, bytes: u64) -> Self {
        Self {
            test_name: test_name.to_string(),
            host: host.to_string(),
            attempt,
            success: true,
            duration,
            bytes,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a failed attempt, keeping the duration of a completed but
    /// invalid round trip
    pub fn failure(test_name: &str, host: &str, attempt: u32, error: AttemptError) -> Self {
        Self {
            test_name: test_name.to_string(),
            host: host.to_string(),
            attempt,
            success: false,
            duration: error.elapsed().unwrap_or_default(),
            bytes: 0,
            error: Some(error),
            timestamp: Utc::now(),
        }
    }

    pub fn error_kind(&self) -> Option<&'static str> {
        self.error.as_ref().map(AttemptError::kind)
    }

    /// Throughput in MiB/s for a successful attempt with a measurable duration
    pub fn throughput_mib_s(&self) -> Option<f64> {
        let secs = self.duration.as_secs_f64();
        if self.success && secs > 0.0 {
            Some(crate::size::to_mib(self.bytes) / secs)
        } else {
            None
        }
    }
}
