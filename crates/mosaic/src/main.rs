mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mosaic_core::Coordinator;

use crate::cli::{Cli, Command, WatchArgs};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Commands that don't need a configured service
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global).await,
        Command::Discover(args) => commands::discover::handle(args, &cli.global).await,

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "mosaic", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the service through a coordinator
        cmd => {
            let mut coordinator_config = config::build_coordinator_config(&cli.global)?;
            if let Command::Watch(WatchArgs {
                interval: Some(interval),
            }) = &cmd
            {
                coordinator_config.poll_interval = *interval;
            }
            let coordinator = Coordinator::new(coordinator_config)?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &coordinator, &cli.global).await;
            coordinator.shutdown().await;
            result
        }
    }
}
