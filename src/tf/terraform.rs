//! Terraform CLI wrapper
//!
//! Spawns the real `terraform` binary as a subprocess with the module
//! directory as working directory, captures stdout and stderr, and applies
//! the per-invocation timeout and retry policy. Nothing here interprets the
//! plan beyond exit-code success.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

use crate::common::config::{Config, Timeouts};
use crate::common::{Error, Result};

use super::options::ModuleOptions;
use super::provider::{PlanProvider, PlanReport};
use super::retry::RetryPolicy;

/// Minimum terraform version the harness is tested against
pub const MIN_SUPPORTED_VERSION: &str = "1.0.0";

/// Real plan provider backed by the terraform binary
#[derive(Debug, Clone)]
pub struct TerraformCli {
    binary: PathBuf,
    timeouts: Timeouts,
}

impl TerraformCli {
    /// Locate the terraform binary from config or PATH
    pub fn discover(config: &Config) -> Result<Self> {
        let binary = match &config.terraform.binary {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::terraform_not_found(&[path
                        .display()
                        .to_string()]));
                }
                path.clone()
            }
            None => which::which("terraform")
                .map_err(|_| Error::terraform_not_found(&["PATH"]))?,
        };

        Ok(Self {
            binary,
            timeouts: config.timeouts.clone(),
        })
    }

    /// Use an explicit binary path (integration tests point this at a stub)
    pub fn with_binary(binary: impl Into<PathBuf>, timeouts: Timeouts) -> Self {
        Self {
            binary: binary.into(),
            timeouts,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Query the binary's version (`terraform version`)
    pub async fn version(&self) -> Result<semver::Version> {
        let output = self
            .run_once(Path::new("."), &["version".to_string()], self.timeouts.version_secs)
            .await?;

        // First line looks like "Terraform v1.7.5"
        let line = output.lines().next().unwrap_or_default();
        let raw = line
            .rsplit(' ')
            .next()
            .unwrap_or_default()
            .trim_start_matches('v');

        semver::Version::parse(raw).map_err(|e| {
            Error::Config(format!("could not parse terraform version from '{line}': {e}"))
        })
    }

    /// Error unless the binary meets [`MIN_SUPPORTED_VERSION`]
    pub async fn check_version(&self) -> Result<semver::Version> {
        let found = self.version().await?;
        let minimum = semver::Version::parse(MIN_SUPPORTED_VERSION)
            .expect("minimum version constant must parse");
        if found < minimum {
            return Err(Error::UnsupportedVersion {
                found: found.to_string(),
                minimum: minimum.to_string(),
            });
        }
        Ok(found)
    }

    fn command_label(&self, args: &[String]) -> String {
        format!("terraform {}", args.first().map(String::as_str).unwrap_or(""))
            .trim_end()
            .to_string()
    }

    /// Run one invocation, no retries
    async fn run_once(
        &self,
        dir: &Path,
        args: &[String],
        timeout_secs: u64,
    ) -> Result<String> {
        let label = self.command_label(args);
        debug!(command = %label, dir = %dir.display(), "invoking terraform");

        let invocation = Command::new(&self.binary)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output();

        let output = timeout(Duration::from_secs(timeout_secs), invocation)
            .await
            .map_err(|_| Error::Timeout {
                command: label.clone(),
                secs: timeout_secs,
            })??;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }

        if output.status.success() {
            Ok(combined)
        } else {
            Err(Error::tool_failed(&label, output.status.code(), &combined))
        }
    }

    /// Run an invocation under the options' retry policy
    async fn run(
        &self,
        opts: &ModuleOptions,
        args: &[String],
        timeout_secs: u64,
    ) -> Result<String> {
        let policy: &RetryPolicy = &opts.retry;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            match self.run_once(opts.module_dir(), args, timeout_secs).await {
                Ok(output) => return Ok(output),
                Err(Error::ToolFailed {
                    command, output, ..
                }) if attempt < policy.max_attempts && policy.is_retryable(&output) => {
                    warn!(
                        command = %command,
                        attempt,
                        max_attempts = policy.max_attempts,
                        "transient terraform failure, retrying"
                    );
                    sleep(policy.backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn base_args(&self, subcommand: &str, opts: &ModuleOptions) -> Vec<String> {
        let mut args = vec![subcommand.to_string(), "-input=false".to_string()];
        if opts.no_color {
            args.push("-no-color".to_string());
        }
        args
    }
}

#[async_trait]
impl PlanProvider for TerraformCli {
    async fn init(&self, opts: &ModuleOptions) -> Result<()> {
        let args = self.base_args("init", opts);
        self.run(opts, &args, self.timeouts.init_secs).await?;
        Ok(())
    }

    async fn plan(&self, opts: &ModuleOptions) -> Result<PlanReport> {
        let mut args = self.base_args("plan", opts);
        args.push("-lock=false".to_string());
        args.extend(opts.vars.to_args());
        let output = self.run(opts, &args, self.timeouts.plan_secs).await?;
        Ok(PlanReport::new(output))
    }

    async fn destroy(&self, opts: &ModuleOptions) -> Result<()> {
        let mut args = self.base_args("destroy", opts);
        args.push("-auto-approve".to_string());
        args.extend(opts.vars.to_args());
        self.run(opts, &args, self.timeouts.destroy_secs).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_args_include_vars() {
        let cli = TerraformCli::with_binary("/usr/bin/terraform", Timeouts::default());
        let opts = ModuleOptions::new("modules/platform")
            .var("service_name", "test-service")
            .var("use_aurora", true);

        let mut args = cli.base_args("plan", &opts);
        args.push("-lock=false".to_string());
        args.extend(opts.vars.to_args());

        assert_eq!(
            args,
            vec![
                "plan",
                "-input=false",
                "-no-color",
                "-lock=false",
                "-var",
                "service_name=test-service",
                "-var",
                "use_aurora=true",
            ]
        );
    }

    #[test]
    fn test_command_label() {
        let cli = TerraformCli::with_binary("/usr/bin/terraform", Timeouts::default());
        assert_eq!(
            cli.command_label(&["plan".to_string(), "-input=false".to_string()]),
            "terraform plan"
        );
    }
}
