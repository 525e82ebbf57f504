#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;

use std::process;

use anyhow::Context;

use crate::config::{Cli, create_services};

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "submittal_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "submittal_cli::config";
pub const TRACING_TARGET_COMMAND: &str = "submittal_cli::command";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    let kind = error
        .downcast_ref::<submittal_core::Error>()
        .map(submittal_core::Error::kind_str)
        .unwrap_or("other");

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            kind,
            error = %format!("{error:#}"),
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let services = create_services(&cli)?;

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        command = cli.command.name(),
        "Running command"
    );

    command::execute(&cli.command, &services)
        .await
        .with_context(|| format!("{} failed", cli.command.name()))
}
