//! tfcheck - a scenario harness for Terraform modules
//!
//! Runs plan/assert/destroy scenarios against a Terraform module through a
//! simple command-line interface.

use clap::Parser;
use tfcheck::{cli, commands::Commands, common::logging};

#[derive(Parser)]
#[command(name = "tfcheck", about = "Terraform module scenario harness")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
