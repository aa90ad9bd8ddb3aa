//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File, Map};
use readthrough_core::{ReadThroughError, ReadThroughResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Legacy environment variable carrying the cache store address.
pub const LEGACY_CACHE_ADDRESS_VAR: &str = "memcachedUrl";

/// Prefix for structured environment overrides, e.g. `READTHROUGH__CACHE__ADDRESS`.
pub const ENV_PREFIX: &str = "READTHROUGH";

/// Selects which `{environment}.toml` overlay is applied.
pub const ENVIRONMENT_VAR: &str = "READTHROUGH_ENVIRONMENT";

/// Resolves [`AppConfig`] once from a config directory and the environment.
///
/// Sources, later ones winning:
/// 1. `{dir}/default.toml`
/// 2. `{dir}/{environment}.toml`
/// 3. `{dir}/local.toml`
/// 4. `READTHROUGH__*` environment variables
/// 5. The legacy `memcachedUrl` variable, overriding `cache.address`
pub struct ConfigLoader {
    config_dir: PathBuf,
    env: Option<Map<String, String>>,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment (plus `.env`).
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            env: None,
        }
    }

    /// Replaces the process environment with `vars`. `.env` is not read.
    #[must_use]
    pub fn with_env(mut self, vars: Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> ReadThroughResult<AppConfig> {
        let vars = match &self.env {
            Some(vars) => vars.clone(),
            None => {
                if let Err(e) = dotenvy::dotenv() {
                    debug!("No .env file loaded: {}", e);
                }
                std::env::vars().collect()
            }
        };

        let environment = vars
            .get(ENVIRONMENT_VAR)
            .cloned()
            .unwrap_or_else(|| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();
        for name in ["default", environment.as_str(), "local"] {
            let path = self.config_dir.join(format!("{}.toml", name));
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path.display());
                builder = builder.add_source(File::from(path).required(false));
            }
        }

        let legacy_address = vars
            .get(LEGACY_CACHE_ADDRESS_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars)),
        );

        let mut app_config: AppConfig = builder
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(config_error)?;

        if let Some(address) = legacy_address {
            debug!("Cache address taken from {}", LEGACY_CACHE_ADDRESS_VAR);
            app_config.cache.address = address;
        }

        ConfigValidator::validate(&app_config).map_err(|errors| {
            ReadThroughError::Configuration(
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;

        Ok(app_config)
    }
}

fn config_error(err: ConfigError) -> ReadThroughError {
    ReadThroughError::Configuration(err.to_string())
}
