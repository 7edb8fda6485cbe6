//! Binary crate for the `weather-panel` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration and the interactive prompt loop
//! - A terminal implementation of the panel's view binding

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod terminal;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    cmd.init_logging();
    cmd.run().await
}
