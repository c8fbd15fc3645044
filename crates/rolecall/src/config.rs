//! Application configuration.
//!
//! Configuration is layered, later sources overriding earlier ones:
//! 1. Bundled defaults (`rolecall.toml` shipped with the crate)
//! 2. `~/.config/rolecall/rolecall.toml`
//! 3. `./rolecall.toml`
//! 4. `ROLECALL__SECTION__KEY` environment variables
//!
//! Secrets (`DISCORD_TOKEN`, `DATABASE_URL`) are never read from these files.

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use rolecall_engine::EngineSettings;
use rolecall_error::{ConfigError, RolecallError, RolecallResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../rolecall.toml");

/// Prefix for environment overrides.
const ENV_PREFIX: &str = "ROLECALL";

/// Engine behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Deny members new reactions in channels hosting a full menu
    pub restrict_reactions: bool,
    /// Seconds between retries of menus whose guild could not be reached
    pub retry_interval_secs: u64,
    /// Embed color for full menus without one
    pub default_color: u32,
}

impl EngineConfig {
    /// Engine settings for these values.
    pub fn settings(&self) -> EngineSettings {
        EngineSettings::default()
            .with_restrict_reactions(self.restrict_reactions)
            .with_default_color(self.default_color)
    }

    /// Retry period; never shorter than one second.
    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs.max(1))
    }
}

/// Database pool settings. The URL comes from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Maximum pooled connections
    pub pool_size: u32,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset
    pub filter: String,
}

/// Complete Rolecall configuration.
///
/// # Example
///
/// ```no_run
/// use rolecall::RolecallConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RolecallConfig::load()?;
/// println!("retrying every {:?}", config.engine.retry_interval());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RolecallConfig {
    /// Engine behavior
    pub engine: EngineConfig,
    /// Database pool
    pub database: DatabaseConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl RolecallConfig {
    /// The bundled defaults alone.
    pub fn bundled() -> RolecallResult<Self> {
        Self::build(Self::defaults())
    }

    /// Bundled defaults overridden by a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> RolecallResult<Self> {
        debug!("Loading configuration from file");
        Self::build(Self::defaults().add_source(File::from(path.as_ref())))
    }

    /// Load every configuration layer.
    ///
    /// User config files are optional and silently skipped when absent.
    #[instrument]
    pub fn load() -> RolecallResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled defaults");

        let mut builder = Self::defaults();

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/rolecall/rolecall.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("rolecall").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        Self::build(builder)
    }

    fn defaults() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> RolecallResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                RolecallError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                RolecallError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> RolecallResult<()> {
        if self.engine.default_color > 0xFF_FFFF {
            return Err(ConfigError::new(format!(
                "engine.default_color {:#X} is not a 24-bit RGB color",
                self.engine.default_color
            ))
            .into());
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::new("database.pool_size must be at least 1").into());
        }
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> RolecallResult<String> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::new(format!("Failed to serialize configuration: {}", e)).into()
        })
    }
}
