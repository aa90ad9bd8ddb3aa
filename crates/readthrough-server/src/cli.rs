//! Command-line interface.

use clap::{Parser, Subcommand};
use readthrough_service::InvocationEvent;

/// Invokes a read-through cache handler once and prints its JSON result.
#[derive(Debug, Parser)]
#[command(name = "readthrough", version, about)]
pub struct Cli {
    /// Directory holding `default.toml` and its overrides.
    #[arg(long, env = "READTHROUGH_CONFIG_DIR", default_value = "./config")]
    pub config_dir: String,

    /// Event passed to the handler, as JSON.
    #[arg(long, default_value = "{}", value_parser = parse_event)]
    pub event: InvocationEvent,

    #[command(subcommand)]
    pub command: Command,
}

/// Which handler to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Write `key` = `value` to the cache and read it back.
    SelfTest,
    /// Serve the employee directory through the cache.
    Employees,
}

fn parse_event(raw: &str) -> Result<InvocationEvent, String> {
    serde_json::from_str(raw).map_err(|e| format!("event is not valid JSON: {}", e))
}
