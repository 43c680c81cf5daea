//! Application configuration.
//!
//! Aggregates the client and table settings into a single Settings
//! struct that can be loaded from YAML files or environment variables.

mod client;
mod table;

pub use client::{resolve_local_address, ClientSettings, KNOWN_REGIONS};
pub use table::{TableSpec, DEFAULT_PROVISIONED_THROUGHPUT, DEFAULT_TABLE_NAME};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "DYNSOURCE_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "DYNSOURCE";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "DYNSOURCE_LOG";

use serde::Deserialize;

/// Errors raised while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting {0}")]
    MissingCredential(&'static str),

    #[error("unknown region identifier: {0}")]
    UnknownRegion(String),

    #[error("configuration error: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Storage client settings.
    pub client: ClientSettings,
    /// Configuration table descriptor.
    pub table: TableSpec,
}

impl Settings {
    /// Load settings from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `config.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, SettingsError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = settings.try_deserialize()?;
        Ok(settings)
    }

    /// Create settings for testing.
    pub fn for_test() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.table.name, DEFAULT_TABLE_NAME);
        assert!(settings.client.endpoint.is_none());
        assert!(!settings.table.recreate);
    }

    #[test]
    fn test_settings_for_test() {
        let settings = Settings::for_test();
        assert_eq!(settings.table.read_capacity, DEFAULT_PROVISIONED_THROUGHPUT);
    }
}
