//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Terraform binary settings
    #[serde(default)]
    pub terraform: TerraformConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Retry settings for transient tool errors
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Terraform binary configuration
#[derive(Debug, Deserialize, Default)]
pub struct TerraformConfig {
    /// Explicit path to the terraform binary
    ///
    /// Falls back to searching PATH when unset
    pub binary: Option<PathBuf>,
}

/// Timeout settings in seconds
#[derive(Debug, Clone, Deserialize)]
pub struct Timeouts {
    /// Timeout for `terraform init`
    #[serde(default = "default_init")]
    pub init_secs: u64,

    /// Timeout for `terraform plan`
    #[serde(default = "default_plan")]
    pub plan_secs: u64,

    /// Timeout for `terraform destroy`
    #[serde(default = "default_destroy")]
    pub destroy_secs: u64,

    /// Timeout for `terraform version`
    #[serde(default = "default_version")]
    pub version_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            init_secs: default_init(),
            plan_secs: default_plan(),
            destroy_secs: default_destroy(),
            version_secs: default_version(),
        }
    }
}

fn default_init() -> u64 {
    300
}
fn default_plan() -> u64 {
    600
}
fn default_destroy() -> u64 {
    900
}
fn default_version() -> u64 {
    10
}

/// Retry settings for transient tool errors
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum attempts per terraform invocation
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Seconds to sleep between attempts
    #[serde(default = "default_backoff")]
    pub backoff_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_backoff() -> u64 {
    5
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| {
                    super::Error::FileRead {
                        path: path.display().to_string(),
                        error: e.to_string(),
                    }
                })?;
                return toml::from_str(&content)
                    .map_err(|e| super::Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.terraform.binary.is_none());
        assert_eq!(config.timeouts.plan_secs, 600);
        assert_eq!(config.retry.max_attempts, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [terraform]
            binary = "/opt/terraform/bin/terraform"

            [timeouts]
            plan_secs = 120
            "#,
        )
        .unwrap();

        assert_eq!(
            config.terraform.binary.as_deref(),
            Some(std::path::Path::new("/opt/terraform/bin/terraform"))
        );
        assert_eq!(config.timeouts.plan_secs, 120);
        assert_eq!(config.timeouts.init_secs, 300);
        assert_eq!(config.retry.backoff_secs, 5);
    }
}
