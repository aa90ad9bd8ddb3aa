//! Bootstrap: resolves configuration once and wires the chosen handler.

use crate::cli::{Cli, Command};
use readthrough_config::{AppConfig, ConfigLoader};
use readthrough_core::{EmployeeList, ReadThroughError, ReadThroughResult};
use readthrough_service::{
    create_store, EmployeesHandler, Handler, InvocationEvent, ReadThroughFetcher, SelfTestHandler,
};
use tracing::info;

/// Loads and validates configuration from the CLI's config directory.
pub fn load_config(cli: &Cli) -> ReadThroughResult<AppConfig> {
    ConfigLoader::new(&cli.config_dir).load()
}

/// Builds the requested handler and invokes it once.
///
/// Returns the handler output as pretty-printed JSON.
pub async fn invoke(command: Command, event: InvocationEvent, config: &AppConfig) -> ReadThroughResult<String> {
    info!(
        "Invoking {:?} (cache: {}, failure policy: {})",
        command, config.cache.address, config.cache.failure_policy
    );

    match command {
        Command::SelfTest => {
            let handler = SelfTestHandler::new(create_store(&config.cache)?);
            run_handler(&handler, event).await
        }
        Command::Employees => {
            let fetcher = ReadThroughFetcher::<EmployeeList>::from_config(&config.cache, &config.origin)?;
            let handler = EmployeesHandler::new(fetcher, config.cache.failure_policy);
            run_handler(&handler, event).await
        }
    }
}

async fn run_handler<H: Handler>(handler: &H, event: InvocationEvent) -> ReadThroughResult<String> {
    let output = handler.handle(event).await?;
    serde_json::to_string_pretty(&output).map_err(|e| ReadThroughError::Serialization(e.to_string()))
}
