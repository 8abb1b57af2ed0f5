//! Test plan resolution from the configuration file and command-line flags

use crate::{
    cli::Cli,
    config::loader::load_suite_config,
    defaults,
    error::{AppError, Result},
    models::TestDefinition,
};
use std::path::{Path, PathBuf};

/// Where the configuration file is expected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    /// Given by the user rather than assumed; a missing explicit file is fatal
    pub explicit: bool,
}

impl ConfigSource {
    /// The default path, silently skipped when absent
    pub fn default_path() -> Self {
        Self {
            path: PathBuf::from(defaults::DEFAULT_CONFIG_PATH),
            explicit: false,
        }
    }

    pub fn explicit<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            explicit: true,
        }
    }
}

/// Single test described entirely by flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdHocTest {
    pub host: Option<String>,
    pub operation: Option<String>,
    pub size: Option<String>,
    pub repeat: i64,
    pub timeout: Option<String>,
}

impl Default for AdHocTest {
    fn default() -> Self {
        Self {
            host: None,
            operation: None,
            size: None,
            repeat: 1,
            timeout: None,
        }
    }
}

impl AdHocTest {
    /// The host and synthesized definition, when host, operation and size
    /// are all given
    pub fn definition(&self) -> Option<(String, TestDefinition)> {
        let present = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());

        let host = present(&self.host)?;
        let operation = present(&self.operation)?;
        let size = present(&self.size)?;

        let mut test = TestDefinition::new(
            format!("default test {} {}", operation, size),
            operation,
            self.repeat,
            size,
        );
        test.timeout = self.timeout.clone();
        Some((host, test))
    }
}

/// The merged work list for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestPlan {
    pub hosts: Vec<String>,
    pub tests: Vec<TestDefinition>,
    /// Configuration file that seeded the plan, if any
    pub loaded_from: Option<PathBuf>,
    /// Name of the test synthesized from flags, if any
    pub ad_hoc_test: Option<String>,
}

/// Merge the configuration file and the flag-defined test into one plan.
///
/// Fails before any network activity when an explicit configuration file is
/// missing or unreadable, or when the merged plan has no tests or no hosts.
pub fn resolve_plan(source: &ConfigSource, ad_hoc: &AdHocTest) -> Result<TestPlan> {
    let mut plan = TestPlan::default();

    if config_exists(&source.path) {
        let config = load_suite_config(&source.path)?;
        plan.hosts = config.hosts;
        plan.tests = config.tests;
        plan.loaded_from = Some(source.path.clone());
    } else if source.explicit {
        return Err(AppError::config_not_found(source.path.display().to_string()));
    }

    if let Some((host, test)) = ad_hoc.definition() {
        plan.ad_hoc_test = Some(test.name.clone());
        plan.tests.push(test);
        if !plan.hosts.contains(&host) {
            plan.hosts.push(host);
        }
    }

    if plan.tests.is_empty() {
        return Err(AppError::NoTestsSpecified);
    }
    if plan.hosts.is_empty() {
        return Err(AppError::NoHostsSpecified);
    }

    Ok(plan)
}

fn config_exists(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

/// Configuration parser that turns command-line arguments into a plan
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    pub fn source(&self) -> ConfigSource {
        match &self.cli.config {
            Some(path) => ConfigSource::explicit(path.clone()),
            None => ConfigSource::default_path(),
        }
    }

    pub fn ad_hoc(&self) -> AdHocTest {
        AdHocTest {
            host: self.cli.host.clone(),
            operation: self.cli.op.clone(),
            size: self.cli.size.clone(),
            repeat: self.cli.repeat,
            timeout: self.cli.timeout.clone(),
        }
    }

    /// Parse and build the complete plan
    pub fn parse(&self) -> Result<TestPlan> {
        resolve_plan(&self.source(), &self.ad_hoc())
    }
}

/// Convenience function to load the complete plan from CLI arguments
pub fn load_plan(cli: Cli) -> Result<TestPlan> {
    ConfigParser::new(cli).parse()
}

/// Display plan summary for debug purposes
pub fn display_plan_summary(plan: &TestPlan) -> String {
    let mut summary = Vec::new();

    match &plan.loaded_from {
        Some(path) => summary.push(format!("Config: {}", path.display())),
        None => summary.push("Config: (none)".to_string()),
    }
    summary.push(format!("Hosts: {}", plan.hosts.join(", ")));
    summary.push(format!("Tests: {}", plan.tests.len()));
    for test in &plan.tests {
        summary.push(format!(
            "  - {} ({} {} x{})",
            test.name, test.operation, test.size, test.repeat
        ));
    }

    summary.join("\n")
}
