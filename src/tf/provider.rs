//! Plan provider abstraction
//!
//! The scenario runner talks to terraform only through [`PlanProvider`], so
//! tests can substitute a fake returning canned reports and assertion logic
//! stays decoupled from the real tool.

use async_trait::async_trait;

use crate::common::Result;

use super::options::ModuleOptions;

/// Captured textual plan report
///
/// Consumed only via substring containment. The raw text is whatever the
/// tool printed; no structural parsing happens here.
#[derive(Debug, Clone)]
pub struct PlanReport {
    raw: String,
}

impl PlanReport {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the report mentions the given resource identifier
    pub fn contains_resource(&self, identifier: &str) -> bool {
        self.raw.contains(identifier)
    }

    /// Identifiers from `expected` that the report does not mention
    pub fn missing_of<'a>(&self, expected: &[&'a str]) -> Vec<&'a str> {
        expected
            .iter()
            .copied()
            .filter(|id| !self.contains_resource(id))
            .collect()
    }

    /// Identifiers from `forbidden` that the report does mention
    pub fn present_of<'a>(&self, forbidden: &[&'a str]) -> Vec<&'a str> {
        forbidden
            .iter()
            .copied()
            .filter(|id| self.contains_resource(id))
            .collect()
    }
}

/// External planning tool boundary
///
/// Implementations must be safe to share across concurrently running
/// scenarios; the runner never serializes access.
#[async_trait]
pub trait PlanProvider: Send + Sync {
    /// Prepare the module directory (`terraform init`)
    async fn init(&self, opts: &ModuleOptions) -> Result<()>;

    /// Compute a dry-run plan for the configuration
    async fn plan(&self, opts: &ModuleOptions) -> Result<PlanReport>;

    /// Tear down anything the configuration provisioned
    async fn destroy(&self, opts: &ModuleOptions) -> Result<()>;

    /// Init followed by plan; the usual entry point for a scenario
    async fn init_and_plan(&self, opts: &ModuleOptions) -> Result<PlanReport> {
        self.init(opts).await?;
        self.plan(opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_containment() {
        let report = PlanReport::new(
            "  # kubernetes_namespace.microservice will be created\n\
               # aws_lb.microservice will be created\n",
        );

        assert!(report.contains_resource("kubernetes_namespace.microservice"));
        assert!(!report.contains_resource("aws_rds_cluster.microservice"));
    }

    #[test]
    fn test_missing_and_present() {
        let report = PlanReport::new("aws_db_instance.microservice will be created");

        assert_eq!(
            report.missing_of(&["aws_db_instance.microservice", "aws_lb.microservice"]),
            vec!["aws_lb.microservice"]
        );
        assert_eq!(
            report.present_of(&["aws_db_instance.microservice", "aws_lb.microservice"]),
            vec!["aws_db_instance.microservice"]
        );
    }
}
