//! Machine-readable report

use crate::{
    error::Result,
    models::AttemptResult,
    runner::{SkippedTest, SuiteResults},
    stats::RunSummary,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One attempt as it appears in JSON output
#[derive(Debug, Serialize)]
pub struct AttemptRecord<'a> {
    pub test: &'a str,
    pub host: &'a str,
    pub attempt: u32,
    pub success: bool,
    pub duration_ms: f64,
    pub bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<'a> From<&'a AttemptResult> for AttemptRecord<'a> {
    fn from(result: &'a AttemptResult) -> Self {
        Self {
            test: &result.test_name,
            host: &result.host,
            attempt: result.attempt,
            success: result.success,
            duration_ms: result.duration.as_secs_f64() * 1000.0,
            bytes: result.bytes,
            error_kind: result.error_kind(),
            error: result.error.as_ref().map(ToString::to_string),
            timestamp: result.timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    skipped: &'a [SkippedTest],
    total_duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    attempts: Option<Vec<AttemptRecord<'a>>>,
}

/// Render the run as pretty-printed JSON; attempts are included in verbose mode
pub fn render_json(suite: &SuiteResults, summary: &RunSummary, verbose: bool) -> Result<String> {
    let report = JsonReport {
        summary,
        skipped: &suite.skipped,
        total_duration_ms: suite.total_duration.as_millis() as u64,
        attempts: verbose.then(|| suite.results.iter().map(AttemptRecord::from).collect()),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
