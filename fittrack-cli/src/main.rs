//src/main.rs
mod cli;
mod commands;
mod output;
mod shell;

use anyhow::{Context, Result};
use std::io::stdout;
use tracing_subscriber::EnvFilter;

use fittrack_lib::AppService;

/// Logs go to stderr so table and CSV output on stdout stay clean.
fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    tracing::debug!("Logging initialized (verbose: {verbose})");
}

fn main() -> Result<()> {
    let cli_args = cli::parse_args();
    setup_logging(cli_args.verbose);

    if let cli::Commands::GenerateCompletion { shell } = cli_args.command {
        let mut cmd = cli::build_cli_command();
        let bin_name = cmd.get_name().to_string();

        eprintln!("Generating completion script for {shell}...");
        clap_complete::generate(shell, &mut cmd, bin_name, &mut stdout());
        return Ok(());
    }

    let mut service =
        AppService::initialize().context("Failed to initialize application service")?;

    match cli_args.command {
        cli::Commands::Shell => shell::run(&mut service, cli_args.export_csv),
        command => commands::run(&mut service, command, cli_args.export_csv),
    }
}
