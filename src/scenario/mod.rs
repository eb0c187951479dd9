//! Scenario Runner
//!
//! Reads YAML scenario files and executes them against a [`PlanProvider`],
//! so assertions work identically against the real terraform binary and the
//! canned fakes the tests use.
//!
//! [`PlanProvider`]: crate::tf::PlanProvider

mod config;
mod runner;

pub use config::{Expectation, Scenario};
pub use runner::{run_scenario, run_scenario_file, ScenarioOutcome};
