mod app;
mod checker;
mod cli;
mod config;
mod error;
mod installer;
mod output;
mod prober;
mod report;
mod targets;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn init_logging(verbose: bool) {
    let default = if verbose { "proxychecker=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    // Targets are probed one after another, a single thread is enough.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let exit = runtime.block_on(app::run(&cli));
    Ok(exit.code())
}
