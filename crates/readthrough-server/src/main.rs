//! # Readthrough
//!
//! Entry point: resolves configuration, installs logging, invokes one
//! handler, and prints its JSON result to stdout. Failures print an
//! `ErrorResponse` and exit non-zero.

use clap::Parser;
use readthrough_core::telemetry::{init_logging, LoggingConfig};
use readthrough_core::{ErrorResponse, ReadThroughError};
use std::process::ExitCode;
use tracing::{error, info};

mod app;
mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match app::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            if let Err(log_err) = init_logging(&LoggingConfig::default()) {
                eprintln!("{}", log_err);
            }
            return fail(&e);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
    }

    info!("Starting {} {}", config.app.name, config.app.version);
    info!("Environment: {}", config.app.environment);

    match app::invoke(cli.command, cli.event, &config).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn fail(err: &ReadThroughError) -> ExitCode {
    error!("Invocation failed: {}", err);

    let response = ErrorResponse::from(err);
    match serde_json::to_string_pretty(&response) {
        Ok(body) => println!("{}", body),
        Err(_) => println!("{}", err),
    }

    ExitCode::FAILURE
}
