//! `roadnet` - road network inspection and dynamic environment tools

use clap::Parser;

use roadnet::cli::args::Cli;
use roadnet::cli::commands;
use roadnet::error::ExitCode;
use roadnet::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    // A first Ctrl+C lets the running command stop on its own; a second
    // one, or SIGTERM after it, exits immediately.
    tokio::spawn(async {
        let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            tracing::warn!("failed to register SIGTERM handler");
            return;
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }
    });

    match commands::dispatch(cli).await {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            if let roadnet::error::RoadnetError::Config(
                roadnet::error::ConfigError::ValidationError { errors, .. },
            ) = &e
            {
                for issue in errors {
                    eprintln!("  {issue}");
                }
            }
            std::process::exit(e.exit_code());
        }
    }
}
