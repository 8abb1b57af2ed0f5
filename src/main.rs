//! Access Checker - Main CLI Application
//!
//! Runs a suite of download and upload throughput tests against TCP servers
//! speaking the length-prefixed, SHA-256 verified exchange protocol.

use access_checker::{
    cli::{normalize_args, Cli},
    config::{display_plan_summary, load_plan},
    error::{AppError, Result},
    executor::{ExecutionConfig, TcpExecutor},
    logging::Logger,
    output::{render_json, OutputCoordinator, OutputFormatterFactory},
    runner::SuiteRunner,
    stats::RunSummary,
    PKG_NAME, VERSION,
};
use clap::Parser;
use std::error::Error;
use std::process;

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let use_color = cli.use_colors();
    match run_application(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e.format_for_console(use_color));

            if let Some(source) = e.source() {
                eprintln!("Caused by: {}", source);
            }
            if let Some(hint) = e.suggestion() {
                eprintln!();
                eprintln!("Hint: {}", hint);
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic; returns the process exit code of a completed run
async fn run_application(cli: Cli) -> Result<i32> {
    let logger = Logger::console("MAIN", cli.log_level(), cli.log_format, cli.use_colors());
    logger.start_session().await;

    logger
        .debug(&format!("{} v{}", PKG_NAME, VERSION))
        .field("build_time", option_env!("BUILD_TIME"))
        .field("git_commit", option_env!("GIT_COMMIT"))
        .log()
        .await;
    logger.debug(&cli.get_config_summary()).log().await;

    let plan = load_plan(cli.clone())?;

    match &plan.loaded_from {
        Some(path) => {
            logger
                .info(&format!(
                    "Loaded config from {}: {} tests, {} hosts",
                    path.display(),
                    plan.tests.len(),
                    plan.hosts.len()
                ))
                .log()
                .await;
        }
        None => logger.debug("No configuration file found, using flags only").log().await,
    }
    if let Some(name) = &plan.ad_hoc_test {
        logger.info(&format!("Added test from flags: {}", name)).log().await;
    }
    logger.debug(&display_plan_summary(&plan)).log().await;

    let executor = TcpExecutor::new(ExecutionConfig::default(), logger.child("EXECUTOR"));
    let runner = SuiteRunner::new(plan, Box::new(executor), logger.child("RUNNER"));
    let suite = runner.run().await;
    let summary = RunSummary::from_results(&suite.results);

    let output = if cli.json {
        render_json(&suite, &summary, cli.verbose)?
    } else {
        let formatter = OutputFormatterFactory::create_formatter(cli.use_colors(), cli.verbose);
        OutputCoordinator::new(formatter).display_results(&suite, &summary)?
    };
    println!("{}", output);

    if cli.fail_on_error && summary.has_failures() {
        let error = AppError::test_execution(format!(
            "{} of {} attempts failed",
            summary.failures, summary.total
        ));
        logger.error(&error.to_string()).error_info(&error).log().await;
        return Ok(error.exit_code());
    }

    Ok(0)
}
