//! CLI command definitions
//!
//! Defines the clap commands for the harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run one or more scenario files
    Run {
        /// YAML scenario files to run
        #[arg(required = true)]
        scenarios: Vec<PathBuf>,

        /// Run scenarios one at a time instead of concurrently
        #[arg(long)]
        sequential: bool,

        /// Print module directory and variables for each scenario
        #[arg(long, short)]
        verbose: bool,

        /// Do not retry transient terraform errors
        #[arg(long)]
        no_retry: bool,
    },

    /// Compute and print a plan for a module
    Plan {
        /// Directory containing the module's root configuration
        module_dir: PathBuf,

        /// Input variable as name=value; repeatable.
        /// Values parse as bool, ["a","b"] list, or plain string.
        #[arg(long = "var")]
        vars: Vec<String>,
    },

    /// Destroy resources previously created for a module
    Destroy {
        /// Directory containing the module's root configuration
        module_dir: PathBuf,

        /// Input variable as name=value; repeatable
        #[arg(long = "var")]
        vars: Vec<String>,
    },

    /// Check that a usable terraform binary is installed
    Doctor,
}
