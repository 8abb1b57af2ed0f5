//! Output formatting and display system
//!
//! This module renders a finished run as plain text, colored text or JSON.
//! Text output always carries the overall summary; the per (test, host)
//! table, failure kinds and skipped tests appear when they have content,
//! and verbose mode adds one row per attempt.

mod colored;
mod formatter;
mod json;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{Alignment, Column, FormattingOptions, OutputFormatter, PlainFormatter, RowData, TableFormat};
pub use json::{render_json, AttemptRecord};

use crate::{error::Result, runner::SuiteResults, stats::RunSummary};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: true,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
}

impl OutputCoordinator {
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self { formatter }
    }

    /// Render the complete text report
    pub fn display_results(&self, suite: &SuiteResults, summary: &RunSummary) -> Result<String> {
        let mut sections = vec![
            self.formatter.format_header("Test Summary")?,
            self.formatter.format_summary(summary)?,
        ];

        if !summary.breakdown.is_empty() {
            sections.push(self.formatter.format_breakdown(&summary.breakdown)?);
        }
        if !summary.failure_kinds.is_empty() {
            sections.push(self.formatter.format_failure_kinds(&summary.failure_kinds)?);
        }
        if !suite.skipped.is_empty() {
            sections.push(self.formatter.format_skipped(&suite.skipped)?);
        }
        if self.formatter.options().verbose_mode && !suite.results.is_empty() {
            sections.push(self.formatter.format_attempts(&suite.results)?);
        }

        Ok(sections.join("\n\n"))
    }
}
