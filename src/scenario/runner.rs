//! Scenario execution
//!
//! Each scenario is a single linear sequence: build the configuration,
//! invoke the planning tool, assert on the report, tear down. For success
//! scenarios the destroy step is scheduled before planning starts and runs
//! exactly once on every exit path: plan failure, assertion failure, or a
//! clean pass. Failure scenarios never plan anything, so nothing is torn
//! down.

use std::path::Path;

use colored::Colorize;
use tracing::warn;

use crate::common::{Error, Result};
use crate::tf::{PlanProvider, PlanReport, RetryPolicy};

use super::config::{Expectation, Scenario};

/// Result of one scenario run
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub passed: bool,
    pub error: Option<String>,
}

impl ScenarioOutcome {
    fn passed(name: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            error: None,
        }
    }

    fn failed(name: &str, error: &Error) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            error: Some(error.to_string()),
        }
    }
}

/// Warns if a planned scenario is abandoned before its teardown ran.
///
/// Destroy is asynchronous, so it cannot run from Drop; the guard only
/// surfaces the leak when the scenario future is dropped mid-flight.
struct TeardownGuard<'a> {
    scenario: &'a str,
    armed: bool,
}

impl<'a> TeardownGuard<'a> {
    fn armed(scenario: &'a str) -> Self {
        Self {
            scenario,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TeardownGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(
                scenario = self.scenario,
                "scenario abandoned before teardown; planned resources may be left behind"
            );
        }
    }
}

/// Load a scenario from a YAML file and run it
pub async fn run_scenario_file<P: PlanProvider>(
    provider: &P,
    path: &Path,
    retry: RetryPolicy,
    verbose: bool,
) -> Result<ScenarioOutcome> {
    let scenario = Scenario::load(path)?;
    run_scenario(provider, &scenario, retry, verbose).await
}

/// Run one scenario against a plan provider
pub async fn run_scenario<P: PlanProvider>(
    provider: &P,
    scenario: &Scenario,
    retry: RetryPolicy,
    verbose: bool,
) -> Result<ScenarioOutcome> {
    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    scenario.validate()?;

    let opts = scenario.to_options(retry);
    if verbose {
        println!("  Module: {}", opts.module_dir().display().to_string().dimmed());
        for arg in opts.vars.to_args().chunks(2) {
            if let [_, pair] = arg {
                println!("  Var: {}", pair.dimmed());
            }
        }
    }

    let outcome = if scenario.expect.failure {
        run_failure_scenario(provider, scenario, &opts).await?
    } else {
        run_success_scenario(provider, scenario, &opts).await?
    };

    if outcome.passed {
        println!("\n{} {}\n", "✓".green().bold(), "Scenario Passed".green().bold());
    } else {
        println!(
            "\n{} {}: {}\n",
            "✗".red().bold(),
            "Scenario Failed".red().bold(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    Ok(outcome)
}

/// Plan, assert on the report, and always tear down once
///
/// Teardown is scheduled before the plan is attempted, so it runs on the
/// plan-failure path too, like a destroy deferred ahead of the plan call.
async fn run_success_scenario<P: PlanProvider>(
    provider: &P,
    scenario: &Scenario,
    opts: &crate::tf::ModuleOptions,
) -> Result<ScenarioOutcome> {
    println!("\n{}", "Planning...".cyan());

    let mut guard = TeardownGuard::armed(&scenario.name);
    let planned = provider.init_and_plan(opts).await;

    let assertion = match &planned {
        Ok(report) => {
            println!("  {} plan computed", "✓".green());
            check_expectations(report, &scenario.expect)
        }
        Err(_) => {
            println!("  {} plan failed", "✗".red());
            Ok(())
        }
    };

    println!("\n{}", "Teardown:".cyan());
    let teardown = provider.destroy(opts).await;
    guard.disarm();
    match &teardown {
        Ok(()) => println!("  {} destroy completed", "✓".green()),
        Err(e) => println!("  {} destroy failed: {}", "✗".red(), e),
    }

    // Verdict precedence: plan error, then assertion, then teardown.
    if let Err(e) = &planned {
        return Ok(ScenarioOutcome::failed(&scenario.name, e));
    }
    if let Err(e) = assertion {
        return Ok(ScenarioOutcome::failed(&scenario.name, &e));
    }
    if let Err(e) = teardown {
        return Ok(ScenarioOutcome::failed(&scenario.name, &e));
    }
    Ok(ScenarioOutcome::passed(&scenario.name))
}

/// Expect the tool invocation itself to fail
async fn run_failure_scenario<P: PlanProvider>(
    provider: &P,
    scenario: &Scenario,
    opts: &crate::tf::ModuleOptions,
) -> Result<ScenarioOutcome> {
    println!("\n{}", "Planning (expecting failure)...".cyan());

    match provider.init_and_plan(opts).await {
        Err(e) if e.is_tool_failure() => {
            let first_line = e.to_string().lines().next().unwrap_or_default().to_string();
            println!("  {} tool rejected the configuration ({})", "✓".green(), first_line.dimmed());
            Ok(ScenarioOutcome::passed(&scenario.name))
        }
        // Harness-side problems (missing binary, bad config) are not the
        // failure the scenario is asserting; propagate them.
        Err(e) => Err(e),
        Ok(_) => {
            println!("  {} plan unexpectedly succeeded", "✗".red());
            Ok(ScenarioOutcome::failed(&scenario.name, &Error::UnexpectedSuccess))
        }
    }
}

/// Check presence and absence expectations against a report
fn check_expectations(report: &PlanReport, expect: &Expectation) -> Result<()> {
    println!("\n{}", "Assertions:".cyan());

    let expected: Vec<&str> = expect.resources.iter().map(String::as_str).collect();
    let forbidden: Vec<&str> = expect.absent.iter().map(String::as_str).collect();
    let missing = report.missing_of(&expected);
    let present = report.present_of(&forbidden);

    for id in &expected {
        if missing.contains(id) {
            println!("  {} {} (missing)", "✗".red(), id);
        } else {
            println!("  {} {}", "✓".green(), id.dimmed());
        }
    }

    for id in &forbidden {
        if present.contains(id) {
            println!("  {} {} (must be absent)", "✗".red(), id);
        } else {
            println!("  {} {} absent", "✓".green(), id.dimmed());
        }
    }

    let mut failures: Vec<String> = missing
        .iter()
        .map(|id| format!("expected resource '{id}' not in plan"))
        .collect();
    failures.extend(
        present
            .iter()
            .map(|id| format!("forbidden resource '{id}' present in plan")),
    );

    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Assertion(failures.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_expectations_presence() {
        let report = PlanReport::new(
            "kubernetes_namespace.microservice will be created\n\
             aws_db_instance.microservice will be created\n",
        );
        let expect = Expectation {
            failure: false,
            resources: vec![
                "kubernetes_namespace.microservice".to_string(),
                "aws_db_instance.microservice".to_string(),
            ],
            absent: vec!["aws_rds_cluster.microservice".to_string()],
        };

        assert!(check_expectations(&report, &expect).is_ok());
    }

    #[test]
    fn test_check_expectations_reports_both_kinds() {
        let report = PlanReport::new("aws_rds_cluster.microservice will be created");
        let expect = Expectation {
            failure: false,
            resources: vec!["aws_lb.microservice".to_string()],
            absent: vec!["aws_rds_cluster.microservice".to_string()],
        };

        let err = check_expectations(&report, &expect).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("aws_lb.microservice"));
        assert!(message.contains("aws_rds_cluster.microservice"));
    }
}
