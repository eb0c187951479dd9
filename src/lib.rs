//! tfcheck - a scenario harness for Terraform modules
//!
//! Builds a variable configuration, invokes the external `terraform` CLI,
//! and asserts on the textual plan report. Correctness of provisioning is
//! delegated entirely to terraform; this crate's contract is input
//! construction, cleanup on every path, and pass/fail interpretation.

pub mod cli;
pub mod commands;
pub mod common;
pub mod scenario;
pub mod tf;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use tf::{ModuleOptions, PlanProvider, PlanReport, VarMap, VarValue};
