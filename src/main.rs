//! unfurl - cached link previews for static site builds.

mod cli;
mod commands;
mod error;
mod logging;

use crate::cli::{Cli, Command};
use crate::commands::Services;
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use std::process::ExitCode;
use unfurl_config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    logging::init(&cli)?;
    let mut out = std::io::stdout().lock();

    // Hashing needs neither configuration nor a cache directory.
    if let Command::Fingerprint { urls } = &cli.command {
        commands::fingerprint(urls, &mut out)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let services = Services::from_config(&config, cli.read_only)?;
    commands::execute(cli.command, &services, &mut out).await
}
