//! Test suite orchestration
//!
//! Validates every test of a resolved plan, then drives the executor over
//! each (test, host) pair in plan order, collecting every attempt result.

use crate::{
    config::{check_hosts, validate_test, TestPlan, ValidationLevel},
    error::AppError,
    executor::TestExecutor,
    logging::Logger,
    models::AttemptResult,
};
use serde::Serialize;
use std::time::{Duration, Instant};

/// A test left out of the run, with the validation failure that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedTest {
    pub name: String,
    pub reason: String,
}

/// Everything a finished run produced
#[derive(Debug, Default)]
pub struct SuiteResults {
    /// Attempt results in execution order
    pub results: Vec<AttemptResult>,
    pub skipped: Vec<SkippedTest>,
    pub total_duration: Duration,
}

/// Runs a test plan sequentially through one executor
pub struct SuiteRunner {
    plan: TestPlan,
    executor: Box<dyn TestExecutor>,
    logger: Logger,
}

impl SuiteRunner {
    pub fn new(plan: TestPlan, executor: Box<dyn TestExecutor>, logger: Logger) -> Self {
        Self { plan, executor, logger }
    }

    /// Run every valid test against every host.
    ///
    /// Invalid tests are skipped with a warning and never reach the network.
    /// Attempt failures are recorded, never fatal.
    pub async fn run(&self) -> SuiteResults {
        let started = Instant::now();
        let mut outcome = SuiteResults::default();

        self.logger
            .info(&format!(
                "Starting test suite: {} test(s) on {} host(s)",
                self.plan.tests.len(),
                self.plan.hosts.len()
            ))
            .field("hosts", &self.plan.hosts)
            .log()
            .await;

        for warning in check_hosts(&self.plan.hosts) {
            let entry = match warning.level {
                ValidationLevel::Warning => self.logger.warn(&warning.message),
                ValidationLevel::Info => self.logger.debug(&warning.message),
            };
            entry.log().await;
        }

        for definition in &self.plan.tests {
            let test = match validate_test(definition) {
                Ok(test) => test,
                Err(error) => {
                    let reason = match &error {
                        AppError::InvalidTest { reason, .. } => reason.clone(),
                        other => other.to_string(),
                    };
                    self.logger
                        .warn(&format!("Skipping invalid test '{}': {}", definition.name, reason))
                        .error_info(&error)
                        .log()
                        .await;
                    outcome.skipped.push(SkippedTest {
                        name: definition.name.clone(),
                        reason,
                    });
                    continue;
                }
            };

            for host in &self.plan.hosts {
                let results = self.executor.execute(&test, host).await;
                outcome.results.extend(results);
            }
        }

        outcome.total_duration = started.elapsed();

        self.logger
            .debug("Test suite finished")
            .field("attempts", outcome.results.len())
            .field("skipped", outcome.skipped.len())
            .field("duration_ms", outcome.total_duration.as_millis() as u64)
            .log()
            .await;

        outcome
    }
}
