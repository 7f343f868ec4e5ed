//! Configuration infrastructure
//!
//! Layered configuration for the extractor and its logging:
//! 1. Built-in defaults (the neo-data-provider markup contract)
//! 2. Optional TOML file
//! 3. `NEO_PAGE_DATA__*` environment variables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::parsing::{ParsingConfig, ParsingError};

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "NEO_PAGE_DATA";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {source}")]
    Validation {
        #[from]
        source: ParsingError,
    },

    #[error("No user configuration directory on this platform")]
    NoConfigDir,
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Markup contract and title patterns
    pub parsing: ParsingConfig,

    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parsing.validate()?;
        Ok(())
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Log to stderr (stdout carries the extraction result)
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file; defaults to the platform data directory
    pub log_dir: Option<PathBuf>,

    pub log_file_name: String,

    /// Number of rotated log files to keep
    pub max_files: usize,

    /// Module-specific log level filters (e.g., "html5ever": "warn")
    pub module_filters: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            log_file_name: "neo-page-data.log".to_string(),
            max_files: 5,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

/// Locates and loads the layered configuration
#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub config_path: PathBuf,
}

impl ConfigManager {
    /// Get the application configuration directory
    pub fn get_config_dir() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("neo-page-data");
        Ok(config_dir)
    }

    /// Get the application data directory (default log location)
    pub fn get_app_data_dir() -> Result<PathBuf, ConfigError> {
        let data_dir = dirs::data_local_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("neo-page-data");
        Ok(data_dir)
    }

    /// Manager for the default `config.toml` in the user config directory
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self::with_path(Self::get_config_dir()?.join("config.toml")))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Load defaults, then the file if it exists, then the environment.
    ///
    /// The parsing section is validated before it is returned.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        if self.config_path.exists() {
            info!("Loading configuration from {:?}", self.config_path);
        } else {
            debug!(
                "No configuration file at {:?}; using defaults",
                self.config_path
            );
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(self.config_path.as_path())
                    .format(config::FileFormat::Toml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
