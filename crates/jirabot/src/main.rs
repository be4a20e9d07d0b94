mod bootstrap_helpers;
mod startup;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use jirabot_cli::Cli;

use crate::bootstrap_helpers::init_tracing;
use crate::startup::run_bot;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    run_bot(cli).await
}
