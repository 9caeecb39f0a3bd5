//! Per-venue configuration section.
//!
//! Each `[exchanges.<name>]` table is a flat string-to-string map so that
//! every venue can carry its own keys next to the common ones.

use std::collections::BTreeMap;

use serde::Deserialize;
use url::Url;

use crate::domain::{Credentials, CurrencyPair};
use crate::error::ConfigError;

/// Key holding the delimiter-separated list of enabled pairs.
pub const PAIRS_ENABLED: &str = "pairs_enabled";
/// Key holding the API key.
pub const API_KEY: &str = "api_key";
/// Key holding the API secret.
pub const API_SECRET: &str = "api_secret";
/// Optional key overriding the venue's REST endpoint.
pub const BASE_URL: &str = "base_url";

/// Settings for one venue.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct VenueConfig {
    values: BTreeMap<String, String>,
}

impl VenueConfig {
    /// Build a section from key/value pairs.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Set or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Enabled pairs; an absent key means none.
    pub fn pairs_enabled(&self) -> Result<Vec<CurrencyPair>, ConfigError> {
        let raw = self.get(PAIRS_ENABLED).unwrap_or_default();
        CurrencyPair::parse_list(raw).map_err(|e| ConfigError::InvalidValue {
            field: PAIRS_ENABLED.to_string(),
            reason: e.to_string(),
        })
    }

    /// API credentials; absent keys become empty strings.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(
            self.get(API_KEY).unwrap_or_default(),
            self.get(API_SECRET).unwrap_or_default(),
        )
    }

    /// Endpoint override, if configured.
    pub fn base_url(&self) -> Result<Option<Url>, ConfigError> {
        self.get(BASE_URL)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
                    field: BASE_URL.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// Check every value this crate interprets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pairs_enabled()?;
        self.base_url()?;
        Ok(())
    }
}
