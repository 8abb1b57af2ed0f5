//! Data models and structures for the access checker

pub mod config;
pub mod metrics;

// Re-export main model types
pub use config::{Operation, SuiteConfig, TestDefinition, ValidatedTest};
pub use metrics::AttemptResult;
