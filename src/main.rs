//! `mw` - control local media players, or run the musicwand daemon.
//!
//! Every subcommand except `daemon` is a short-lived client that prints its
//! output and exits. Failures print a single line on stderr and exit with
//! status 1.

use std::{error::Error, process};

use clap::Parser;
use musicwand::{
    cli::{Cli, CliService, Commands, formatting::format_error},
    config::Config,
    services::aggregator,
    tracing_config,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let result = if matches!(cli.command, Commands::Daemon) {
        run_daemon(&cli).await
    } else {
        tracing_config::init_cli_mode(cli.verbose)?;
        run_cli_command(cli).await
    };

    if let Err(e) = result {
        fail(&e.to_string());
    }

    Ok(())
}

/// Runs the aggregator until the bus connection drops.
///
/// The log file guard lives for the whole run so buffered lines are
/// flushed before the process exits.
async fn run_daemon(cli: &Cli) -> musicwand::Result<()> {
    let _guard = match tracing_config::init_with_file() {
        Ok(guard) => guard,
        Err(e) => fail(&format!("Failed to initialize logging: {e}")),
    };
    info!("Starting musicwand daemon");

    let config = Config::load(cli.config.as_deref())?;
    aggregator::run(&config.daemon)
        .await
        .inspect_err(|e| error!("Daemon failed: {e}"))?;

    Ok(())
}

/// Executes a client command through the CliService.
async fn run_cli_command(cli: Cli) -> musicwand::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let service = CliService::connect(config, cli.config, cli.player).await?;
    let output = service.execute(cli.command).await?;

    if !output.trim().is_empty() {
        println!("{output}");
    }

    Ok(())
}

fn fail(message: &str) -> ! {
    eprintln!("{}", format_error(message));
    process::exit(1);
}
