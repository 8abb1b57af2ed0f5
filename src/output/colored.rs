//! Colored formatter implementation with terminal color support
//!
//! Wraps the plain formatter and highlights outcomes with ANSI colors.

use super::formatter::{FormattingOptions, OutputFormatter, PlainFormatter};
use crate::{
    error::Result,
    models::AttemptResult,
    runner::SkippedTest,
    stats::{PairSummary, RunSummary},
};
use colored::*;
use std::collections::BTreeMap;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme: ColorScheme::default(),
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    /// Color for a success rate percentage
    fn rate_color(&self, rate: f64) -> Color {
        if rate >= 100.0 {
            self.color_scheme.success
        } else if rate > 0.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        }
    }

    /// Colorize one line of plain output by its leading label
    fn colorize_summary_line(&self, line: &str, summary: &RunSummary) -> String {
        if line.starts_with("Successful:") {
            self.colorize(line, self.rate_color(summary.success_rate)).to_string()
        } else if line.starts_with("Failed:") && summary.failures > 0 {
            self.colorize(line, self.color_scheme.error).to_string()
        } else if line.starts_with("Average") || line.starts_with("Total data") {
            self.colorize(line, self.color_scheme.info).to_string()
        } else {
            line.to_string()
        }
    }
}

impl OutputFormatter for ColoredFormatter {
    fn options(&self) -> &FormattingOptions {
        &self.options
    }

    fn format_header(&self, title: &str) -> Result<String> {
        let plain = self.plain_formatter.format_header(title)?;
        let header = self.colorize(&plain, self.color_scheme.header);
        Ok(if self.options.enable_color { header.bold() } else { header }.to_string())
    }

    fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        let plain = self.plain_formatter.format_summary(summary)?;
        Ok(plain
            .lines()
            .map(|line| self.colorize_summary_line(line, summary))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn format_breakdown(&self, pairs: &[PairSummary]) -> Result<String> {
        self.plain_formatter.format_breakdown(pairs)
    }

    fn format_failure_kinds(&self, kinds: &BTreeMap<String, usize>) -> Result<String> {
        let plain = self.plain_formatter.format_failure_kinds(kinds)?;
        Ok(self.colorize(&plain, self.color_scheme.error).to_string())
    }

    fn format_attempts(&self, results: &[AttemptResult]) -> Result<String> {
        self.plain_formatter.format_attempts(results)
    }

    fn format_skipped(&self, skipped: &[SkippedTest]) -> Result<String> {
        let plain = self.plain_formatter.format_skipped(skipped)?;
        Ok(self.colorize(&plain, self.color_scheme.warning).to_string())
    }
}
