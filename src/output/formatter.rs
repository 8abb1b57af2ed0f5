//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::AttemptResult,
    runner::SkippedTest,
    size::format_bytes,
    stats::{PairSummary, RunSummary},
};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Options this formatter was built with
    fn options(&self) -> &FormattingOptions;

    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the overall totals and averages
    fn format_summary(&self, summary: &RunSummary) -> Result<String>;

    /// Format the per (test, host) table
    fn format_breakdown(&self, pairs: &[PairSummary]) -> Result<String>;

    /// Format failure counts by kind
    fn format_failure_kinds(&self, kinds: &BTreeMap<String, usize>) -> Result<String>;

    /// Format every attempt, one row each
    fn format_attempts(&self, results: &[AttemptResult]) -> Result<String>;

    /// Format tests dropped by validation
    fn format_skipped(&self, skipped: &[SkippedTest]) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// List individual attempts
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone)]
pub enum Alignment {
    Left,
    Right,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

fn fmt_err(e: std::fmt::Error) -> AppError {
    AppError::io(format!("Failed to format output: {}", e))
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given format and data
    pub(crate) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
            output.push('\n');
        }

        let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
        output.push_str(&self.create_row(&headers, &widths, format));
        output.push('\n');

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
            output.push('\n');
        }

        for row in rows {
            output.push_str(&self.create_row(row, &widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&widths));
        }

        output.trim_end().to_string()
    }

    /// Calculate column widths from headers and content, within each column's bounds
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        format
            .columns
            .iter()
            .enumerate()
            .map(|(idx, column)| {
                let content = rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                content
                    .max(column.header.len())
                    .max(column.min_width)
                    .min(column.max_width)
            })
            .collect()
    }

    /// Create a table row
    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| &c.alignment)
                .unwrap_or(&Alignment::Left);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&self.align_text(cell, width, alignment));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    /// Create horizontal border for table
    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }

    /// Align text within specified width
    fn align_text(&self, text: &str, width: usize, alignment: &Alignment) -> String {
        let len = text.chars().count();
        if len >= width {
            return text.chars().take(width).collect();
        }

        let padding = " ".repeat(width - len);
        match alignment {
            Alignment::Left => format!("{}{}", text, padding),
            Alignment::Right => format!("{}{}", padding, text),
        }
    }

    /// Format duration in human-readable format
    pub(crate) fn format_duration(&self, duration: Duration) -> String {
        let ms = duration.as_secs_f64() * 1000.0;
        if ms < 1.0 {
            format!("{:.2}μs", ms * 1000.0)
        } else if ms < 1000.0 {
            format!("{:.1}ms", ms)
        } else if ms < 60000.0 {
            format!("{:.2}s", ms / 1000.0)
        } else {
            let minutes = (ms / 60000.0) as u32;
            let seconds = (ms % 60000.0) / 1000.0;
            format!("{}m{:.1}s", minutes, seconds)
        }
    }

    fn format_throughput(&self, throughput: Option<f64>) -> String {
        throughput
            .map(|t| format!("{:.2} MB/s", t))
            .unwrap_or_else(|| "N/A".to_string())
    }

    fn breakdown_rows(&self, pairs: &[PairSummary]) -> Vec<RowData> {
        pairs
            .iter()
            .map(|pair| {
                vec![
                    pair.test_name.clone(),
                    pair.host.clone(),
                    format!("{}/{}", pair.successes, pair.attempts),
                    pair.avg_duration
                        .map(|d| self.format_duration(d))
                        .unwrap_or_else(|| "N/A".to_string()),
                    self.format_throughput(pair.avg_throughput_mib_s),
                ]
            })
            .collect()
    }

    fn attempt_rows(&self, results: &[AttemptResult]) -> Vec<RowData> {
        results
            .iter()
            .map(|result| {
                let outcome = match &result.error {
                    None => "OK".to_string(),
                    Some(error) => format!("{}: {}", error.kind(), error),
                };
                vec![
                    result.test_name.clone(),
                    result.host.clone(),
                    result.attempt.to_string(),
                    self.format_duration(result.duration),
                    format_bytes(result.bytes),
                    outcome,
                ]
            })
            .collect()
    }

    fn breakdown_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Test", Alignment::Left, 8, 40),
                Column::new("Host", Alignment::Left, 8, 40),
                Column::new("OK/Total", Alignment::Right, 8, 12),
                Column::new("Avg Duration", Alignment::Right, 12, 14),
                Column::new("Avg Throughput", Alignment::Right, 14, 18),
            ],
            show_borders: self.options.table_borders,
        }
    }

    fn attempts_format(&self) -> TableFormat {
        TableFormat {
            columns: vec![
                Column::new("Test", Alignment::Left, 8, 40),
                Column::new("Host", Alignment::Left, 8, 40),
                Column::new("#", Alignment::Right, 3, 6),
                Column::new("Duration", Alignment::Right, 8, 12),
                Column::new("Bytes", Alignment::Right, 8, 12),
                Column::new("Outcome", Alignment::Left, 7, 80),
            ],
            show_borders: self.options.table_borders,
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn options(&self) -> &FormattingOptions {
        &self.options
    }

    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(fmt_err)?;
        writeln!(output, "  {}  ", title).map_err(fmt_err)?;
        write!(output, "{}", border).map_err(fmt_err)?;

        Ok(output)
    }

    fn format_summary(&self, summary: &RunSummary) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Total tests: {}", summary.total).map_err(fmt_err)?;
        writeln!(output, "Successful: {} ({:.1}%)", summary.successes, summary.success_rate).map_err(fmt_err)?;
        write!(output, "Failed: {} ({:.1}%)", summary.failures, summary.failure_rate).map_err(fmt_err)?;

        if let Some(avg) = summary.avg_duration {
            write!(output, "\nAverage duration: {}", self.format_duration(avg)).map_err(fmt_err)?;
            write!(
                output,
                "\nAverage throughput: {}",
                self.format_throughput(summary.avg_throughput_mib_s)
            )
            .map_err(fmt_err)?;
            write!(output, "\nTotal data transferred: {:.2} MB", summary.total_mib()).map_err(fmt_err)?;
        }

        Ok(output)
    }

    fn format_breakdown(&self, pairs: &[PairSummary]) -> Result<String> {
        if pairs.is_empty() {
            return Ok("No test results available.".to_string());
        }
        Ok(self.create_table(&self.breakdown_format(), &self.breakdown_rows(pairs)))
    }

    fn format_failure_kinds(&self, kinds: &BTreeMap<String, usize>) -> Result<String> {
        let mut output = String::from("Failures by kind:");
        for (kind, count) in kinds {
            write!(output, "\n  {}: {}", kind, count).map_err(fmt_err)?;
        }
        Ok(output)
    }

    fn format_attempts(&self, results: &[AttemptResult]) -> Result<String> {
        Ok(self.create_table(&self.attempts_format(), &self.attempt_rows(results)))
    }

    fn format_skipped(&self, skipped: &[SkippedTest]) -> Result<String> {
        let mut output = String::from("Skipped tests:");
        for test in skipped {
            write!(output, "\n  '{}': {}", test.name, test.reason).map_err(fmt_err)?;
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AttemptError;

    fn formatter() -> PlainFormatter {
        PlainFormatter::new(FormattingOptions {
            enable_color: false,
            ..Default::default()
        })
    }

    fn results() -> Vec<AttemptResult> {
        vec![
            AttemptResult::success("down", "h:1", 1, Duration::from_millis(500), 1024 * 1024),
            AttemptResult::failure("down", "h:1", 2, AttemptError::Timeout(Duration::from_secs(10))),
        ]
    }

    #[test]
    fn test_header() {
        let header = formatter().format_header("Test Summary").unwrap();
        assert_eq!(header, "================\n  Test Summary  \n================");
    }

    #[test]
    fn test_summary_with_successes() {
        let summary = RunSummary::from_results(&results());
        let text = formatter().format_summary(&summary).unwrap();

        assert!(text.contains("Total tests: 2"));
        assert!(text.contains("Successful: 1 (50.0%)"));
        assert!(text.contains("Failed: 1 (50.0%)"));
        assert!(text.contains("Average duration: 500.0ms"));
        assert!(text.contains("Average throughput: 2.00 MB/s"));
        assert!(text.contains("Total data transferred: 1.00 MB"));
    }

    #[test]
    fn test_summary_without_successes() {
        let summary = RunSummary::from_results(&results()[1..]);
        let text = formatter().format_summary(&summary).unwrap();

        assert!(text.contains("Successful: 0 (0.0%)"));
        assert!(!text.contains("Average"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_breakdown_table() {
        let summary = RunSummary::from_results(&results());
        let table = formatter().format_breakdown(&summary.breakdown).unwrap();

        assert!(table.starts_with('+'));
        assert!(table.contains("| Test"));
        assert!(table.contains("1/2"));
        assert!(table.contains("2.00 MB/s"));
        assert_eq!(formatter().format_breakdown(&[]).unwrap(), "No test results available.");
    }

    #[test]
    fn test_attempts_table() {
        let table = formatter().format_attempts(&results()).unwrap();
        assert!(table.contains("OK"));
        assert!(table.contains("Timeout: timed out after 10s"));
    }

    #[test]
    fn test_failure_kinds_and_skipped() {
        let summary = RunSummary::from_results(&results());
        let kinds = formatter().format_failure_kinds(&summary.failure_kinds).unwrap();
        assert_eq!(kinds, "Failures by kind:\n  Timeout: 1");

        let skipped = formatter()
            .format_skipped(&[SkippedTest {
                name: "bad".to_string(),
                reason: "size is required".to_string(),
            }])
            .unwrap();
        assert_eq!(skipped, "Skipped tests:\n  'bad': size is required");
    }

    #[test]
    fn test_align_and_truncate() {
        let f = formatter();
        assert_eq!(f.align_text("ab", 4, &Alignment::Right), "  ab");
        assert_eq!(f.align_text("ab", 4, &Alignment::Left), "ab  ");
        assert_eq!(f.align_text("abcdef", 3, &Alignment::Left), "abc");
    }

    #[test]
    fn test_format_duration() {
        let f = formatter();
        assert_eq!(f.format_duration(Duration::from_micros(500)), "500.00μs");
        assert_eq!(f.format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(f.format_duration(Duration::from_secs(90)), "1m30.0s");
    }
}
