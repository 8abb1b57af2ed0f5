//! Configuration management module

pub mod loader;
pub mod parser;
pub mod validation;

// Re-export main functionality
pub use loader::{load_suite_config, parse_suite_config};
pub use parser::{
    display_plan_summary, load_plan, resolve_plan, AdHocTest, ConfigParser, ConfigSource, TestPlan,
};
pub use validation::{check_hosts, parse_timeout, validate_test, ValidationLevel, ValidationWarning};

// Re-export from models for convenience
pub use crate::models::{SuiteConfig, TestDefinition};
