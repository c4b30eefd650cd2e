pub mod demo;
pub mod restore;

use clap::Subcommand;
use serde::Serialize;

use drover_core::config::{OutputFormat, ProgressConfig};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Restore a database, showing progress while it runs
    Restore(restore::RestoreArgs),
    /// Drive a progress renderer through a fixed number of steps
    Demo(demo::DemoArgs),
}

/// The operation was cancelled before it completed.
#[derive(thiserror::Error, Debug)]
#[error("Operation cancelled")]
pub struct Cancelled;

pub async fn run(cmd: Command, config: &ProgressConfig) -> anyhow::Result<()> {
    match cmd {
        Command::Restore(args) => restore::run(args, config).await,
        Command::Demo(args) => demo::run(args, config).await,
    }
}

/// Write the final command result to stdout in the configured format.
pub fn print_result<T: Serialize>(config: &ProgressConfig, result: &T, text: &str) -> anyhow::Result<()> {
    match config.format {
        OutputFormat::Json => println!("{}", serde_json::to_string(result)?),
        OutputFormat::Text => println!("{text}"),
    }
    Ok(())
}
