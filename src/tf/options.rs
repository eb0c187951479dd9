//! Per-invocation module options
//!
//! One `ModuleOptions` value describes a single module invocation: where the
//! module lives and which variables it receives. Built once per scenario and
//! not mutated afterwards.

use std::path::{Path, PathBuf};

use super::retry::RetryPolicy;
use super::vars::{VarMap, VarValue};

/// Options for one terraform module invocation
#[derive(Debug, Clone)]
pub struct ModuleOptions {
    /// Directory containing the module's root configuration
    pub module_dir: PathBuf,
    /// Input variables
    pub vars: VarMap,
    /// Pass `-no-color` to terraform
    pub no_color: bool,
    /// Retry policy for transient failures
    pub retry: RetryPolicy,
}

impl ModuleOptions {
    pub fn new(module_dir: impl Into<PathBuf>) -> Self {
        Self {
            module_dir: module_dir.into(),
            vars: VarMap::new(),
            no_color: true,
            retry: RetryPolicy::none(),
        }
    }

    /// Set one input variable
    pub fn var(mut self, name: impl Into<String>, value: impl Into<VarValue>) -> Self {
        self.vars.set(name, value);
        self
    }

    /// Replace the whole variable map
    pub fn vars(mut self, vars: VarMap) -> Self {
        self.vars = vars;
        self
    }

    pub fn no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }
}
