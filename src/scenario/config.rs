//! Scenario file types
//!
//! Defines the data structures for deserializing YAML scenarios.
//!
//! ```yaml
//! name: rds-default
//! description: default database path provisions a single RDS instance
//! module_dir: ../terraform/modules/microservice-platform
//! requires: [service_name, environment, vpc_id]
//! vars:
//!   service_name: test-service
//!   environment: dev
//! expect:
//!   resources:
//!     - aws_db_instance.microservice
//!   absent:
//!     - aws_rds_cluster.microservice
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};
use crate::tf::{ModuleOptions, RetryPolicy, VarMap};

/// A complete scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct Scenario {
    /// Name of the scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Directory of the module under test, relative to the scenario file
    pub module_dir: PathBuf,
    /// Variable names that must be present before the tool is invoked
    #[serde(default)]
    pub requires: Vec<String>,
    /// Module input variables
    #[serde(default)]
    pub vars: VarMap,
    /// What the plan result must look like
    #[serde(default)]
    pub expect: Expectation,
}

/// Expected outcome of a scenario
#[derive(Deserialize, Debug, Default)]
pub struct Expectation {
    /// The tool invocation itself is expected to fail
    #[serde(default)]
    pub failure: bool,
    /// Resource identifiers that must appear in the plan report
    #[serde(default)]
    pub resources: Vec<String>,
    /// Resource identifiers that must NOT appear in the plan report
    #[serde(default)]
    pub absent: Vec<String>,
}

impl Scenario {
    /// Load a scenario from a YAML file
    ///
    /// A relative `module_dir` is resolved against the scenario file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;

        let mut scenario: Scenario = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse scenario: {e}")))?;

        if scenario.module_dir.is_relative() {
            let scenario_dir = path.parent().unwrap_or(Path::new("."));
            scenario.module_dir = scenario_dir.join(&scenario.module_dir);
        }

        Ok(scenario)
    }

    /// Check the mandatory-variable list
    ///
    /// Failure scenarios are exempt: deliberately omitting a variable is a
    /// legitimate way to provoke the expected tool error.
    pub fn validate(&self) -> Result<()> {
        if self.expect.failure {
            return Ok(());
        }
        for name in &self.requires {
            if !self.vars.contains(name) {
                return Err(Error::MissingVariable { name: name.clone() });
            }
        }
        Ok(())
    }

    /// Build the invocation options for this scenario
    pub fn to_options(&self, retry: RetryPolicy) -> ModuleOptions {
        ModuleOptions::new(&self.module_dir)
            .vars(self.vars.clone())
            .retry(retry)
    }
}
