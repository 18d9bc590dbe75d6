use std::io;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use compound::api::{Cli, Command, CommandError, run_http_server, run_schedule_command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { port } => {
            run_http_server(port).await.context("HTTP server error")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Schedule(args) => {
            let mut stdout = io::stdout().lock();
            match run_schedule_command(&args, &mut stdout) {
                Ok(()) => Ok(ExitCode::SUCCESS),
                Err(CommandError::Input(err)) => {
                    eprintln!("Invalid input: {err}");
                    Ok(ExitCode::from(2))
                }
                Err(err) => Err(err.into()),
            }
        }
    }
}
