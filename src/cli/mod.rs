//! CLI command handling
//!
//! Dispatches CLI commands to the terraform wrapper and formats output.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tokio::task::JoinSet;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::scenario::{self, ScenarioOutcome};
use crate::tf::{ModuleOptions, PlanProvider, RetryPolicy, TerraformCli, VarMap, VarValue};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    let config = Config::load()?;

    match command {
        Commands::Run {
            scenarios,
            sequential,
            verbose,
            no_retry,
        } => {
            let tf = TerraformCli::discover(&config)?;
            let retry = if no_retry {
                RetryPolicy::none()
            } else {
                RetryPolicy::transient(
                    config.retry.max_attempts,
                    Duration::from_secs(config.retry.backoff_secs),
                )
            };
            run_scenarios(Arc::new(tf), scenarios, retry, sequential, verbose).await
        }

        Commands::Plan { module_dir, vars } => {
            let tf = TerraformCli::discover(&config)?;
            let opts = ModuleOptions::new(module_dir).vars(parse_var_args(&vars)?);

            let report = tf.init_and_plan(&opts).await?;
            println!("{}", report.as_str());

            Ok(())
        }

        Commands::Destroy { module_dir, vars } => {
            let tf = TerraformCli::discover(&config)?;
            let opts = ModuleOptions::new(&module_dir).vars(parse_var_args(&vars)?);

            tf.destroy(&opts).await?;
            println!("Destroyed resources for {}", module_dir.display());

            Ok(())
        }

        Commands::Doctor => {
            let tf = TerraformCli::discover(&config)?;
            println!("terraform binary: {}", tf.binary().display());

            let version = tf.check_version().await?;
            println!(
                "{} terraform {} (minimum {})",
                "✓".green(),
                version,
                crate::tf::terraform::MIN_SUPPORTED_VERSION
            );

            Ok(())
        }
    }
}

/// Run scenario files, concurrently unless asked otherwise
///
/// A harness error in one scenario (unreadable file, missing required
/// variable) must not abort the others: aborting a sibling between its plan
/// and teardown steps would leak planned resources. The run is always
/// drained to completion; the first error is reported after the summary.
pub async fn run_scenarios<P>(
    provider: Arc<P>,
    paths: Vec<PathBuf>,
    retry: RetryPolicy,
    sequential: bool,
    verbose: bool,
) -> Result<()>
where
    P: PlanProvider + 'static,
{
    let total = paths.len();
    let mut outcomes: Vec<ScenarioOutcome> = Vec::with_capacity(total);
    let mut first_error: Option<Error> = None;

    if sequential {
        for path in &paths {
            match scenario::run_scenario_file(provider.as_ref(), path, retry.clone(), verbose)
                .await
            {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    outcomes.push(errored_outcome(path, &e));
                    first_error.get_or_insert(e);
                }
            }
        }
    } else {
        let mut set = JoinSet::new();
        for path in paths {
            let provider = Arc::clone(&provider);
            let retry = retry.clone();
            set.spawn(async move {
                let result =
                    scenario::run_scenario_file(provider.as_ref(), &path, retry, verbose).await;
                (path, result)
            });
        }
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(outcome))) => outcomes.push(outcome),
                Ok((path, Err(e))) => {
                    outcomes.push(errored_outcome(&path, &e));
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    first_error
                        .get_or_insert(Error::Config(format!("scenario task panicked: {e}")));
                }
            }
        }
    }

    print_summary(&outcomes);

    if let Some(e) = first_error {
        return Err(e);
    }
    let failed = outcomes.iter().filter(|o| !o.passed).count();
    if failed > 0 {
        Err(Error::ScenariosFailed { failed, total })
    } else {
        Ok(())
    }
}

/// Summary entry for a scenario file that never produced an outcome
fn errored_outcome(path: &std::path::Path, error: &Error) -> ScenarioOutcome {
    ScenarioOutcome {
        name: path.display().to_string(),
        passed: false,
        error: Some(error.to_string()),
    }
}

fn print_summary(outcomes: &[ScenarioOutcome]) {
    println!("{}", "Summary:".blue().bold());
    for outcome in outcomes {
        if outcome.passed {
            println!("  {} {}", "✓".green(), outcome.name);
        } else {
            println!(
                "  {} {}: {}",
                "✗".red(),
                outcome.name,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

/// Parse repeated `--var name=value` arguments
fn parse_var_args(pairs: &[String]) -> Result<VarMap> {
    let mut vars = VarMap::new();
    for pair in pairs {
        let (name, raw) = pair
            .split_once('=')
            .ok_or_else(|| Error::InvalidVar(pair.clone()))?;
        if name.is_empty() {
            return Err(Error::InvalidVar(pair.clone()));
        }
        vars.set(name, VarValue::parse_cli(raw)?);
    }
    Ok(vars)
}
