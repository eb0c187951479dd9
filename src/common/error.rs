//! Error types for the harness
//!
//! Two error families matter to callers: tool invocation failures
//! (terraform exited non-zero, expected for negative scenarios) and
//! assertion failures (an identifier missing from the plan report).
//! Everything else is plumbing.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Tool Errors ===
    #[error("terraform binary not found. Searched: {searched}")]
    TerraformNotFound { searched: String },

    #[error("'{command}' failed:\n{output}")]
    ToolFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },

    #[error("'{command}' timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("unsupported terraform version {found} (minimum {minimum})")]
    UnsupportedVersion { found: String, minimum: String },

    // === Scenario Errors ===
    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("plan succeeded but the scenario expected it to fail")]
    UnexpectedSuccess,

    #[error("scenario requires variable '{name}' but it was not set")]
    MissingVariable { name: String },

    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    // === Configuration Errors ===
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("invalid variable '{0}': expected name=value")]
    InvalidVar(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a terraform-not-found error with search locations
    pub fn terraform_not_found<S: AsRef<str>>(paths: &[S]) -> Self {
        Self::TerraformNotFound {
            searched: paths
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create a tool-failed error from a finished subprocess
    pub fn tool_failed(command: &str, code: Option<i32>, output: &str) -> Self {
        Self::ToolFailed {
            command: command.to_string(),
            code,
            output: output.to_string(),
        }
    }

    /// True for errors produced by the external tool exiting non-zero.
    ///
    /// Failure scenarios accept exactly these; an assertion or config
    /// error must never satisfy an expected-failure check.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::ToolFailed { .. })
    }
}
