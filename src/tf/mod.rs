//! Terraform subprocess layer
//!
//! Everything that touches the external tool: variable rendering, invocation
//! options, the provider trait, the real CLI wrapper, and retry policy.

pub mod options;
pub mod provider;
pub mod retry;
pub mod terraform;
pub mod vars;

pub use options::ModuleOptions;
pub use provider::{PlanProvider, PlanReport};
pub use retry::RetryPolicy;
pub use terraform::TerraformCli;
pub use vars::{VarMap, VarValue};
