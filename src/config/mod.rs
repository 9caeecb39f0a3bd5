//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. API secrets can be kept out of
//! the file and supplied through `CROSSBOOK_<VENUE>_API_KEY` and
//! `CROSSBOOK_<VENUE>_API_SECRET` environment variables instead.

mod logging;
mod venue;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

pub use logging::LoggingConfig;
pub use venue::{VenueConfig, API_KEY, API_SECRET, BASE_URL, PAIRS_ENABLED};

const ENV_PREFIX: &str = "CROSSBOOK";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Venue sections keyed by venue name.
    #[serde(default)]
    pub exchanges: BTreeMap<String, VenueConfig>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let mut config = Self::parse(&content)?;

        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parse TOML without touching the environment or validating.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content).map_err(ConfigError::Parse)?)
    }

    /// Overwrite credentials with values found through `lookup`.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for (name, venue) in &mut self.exchanges {
            let prefix = format!("{ENV_PREFIX}_{}", name.to_ascii_uppercase());
            for key in [API_KEY, API_SECRET] {
                let var = format!("{prefix}_{}", key.to_ascii_uppercase());
                if let Some(value) = lookup(&var) {
                    venue.set(key, value);
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, venue) in &self.exchanges {
            venue.validate().map_err(|e| match e {
                ConfigError::InvalidValue { field, reason } => ConfigError::InvalidValue {
                    field: format!("exchanges.{name}.{field}"),
                    reason,
                },
                other => other,
            })?;
        }
        Ok(())
    }

    /// Section for `name`, matched case-insensitively.
    pub fn venue(&self, name: &str) -> std::result::Result<&VenueConfig, ConfigError> {
        self.exchanges
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, venue)| venue)
            .ok_or_else(|| ConfigError::MissingVenue {
                venue: name.to_string(),
            })
    }

    /// Configured venue names.
    pub fn venue_names(&self) -> impl Iterator<Item = &str> {
        self.exchanges.keys().map(String::as_str)
    }

    pub fn init_logging(&self) {
        self.logging.init();
    }
}
