//! Dashboard configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `HEALTHPIE_`-prefixed environment variables. Command-line flags are
//! applied on top by the binary.
//!
//! ```toml
//! refresh_interval = "10s"
//!
//! [[rules]]
//! category = "warning"
//! matcher = { any_state = ["down", "stale", "incomplete"] }
//!
//! [[rules]]
//! category = "clean"
//! matcher = { only_states = ["active", "clean"] }
//! ```
//!
//! Leaving `rules` out keeps the built-in classification.

use std::path::Path;
use std::time::Duration;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::classify::{default_rules, CategoryClassifier, CategoryRule};

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "HEALTHPIE";

/// Refresh interval used when none is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the schema.
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// The settings were read but make no sense.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one dashboard session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// How often the dashboard fetches a fresh snapshot.
    #[serde(deserialize_with = "crate::duration::deserialize")]
    pub refresh_interval: Duration,
    /// Ordered PG classification rules.
    pub rules: Vec<CategoryRule>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            rules: default_rules(),
        }
    }
}

impl DashboardConfig {
    /// Load defaults, then the optional file, then the environment.
    ///
    /// The file is read as TOML whatever its extension.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Self::from_settings(settings)
    }

    /// Parse settings from TOML text, without consulting the environment.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let config: DashboardConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "refresh_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the classifier described by the rule table.
    pub fn classifier(&self) -> CategoryClassifier {
        CategoryClassifier::new(self.rules.clone())
    }
}
