//! Venue-wide settings and account credentials.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::order::TAKER_FEE;
use super::precision::VOLUME_PRECISION;
use super::{CurrencyPair, Fraction, Volume};

/// API key and secret for one venue account.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    api_key: String,
    #[serde(default, skip_serializing)]
    api_secret: String,
}

impl Credentials {
    /// Create credentials from a key/secret pair.
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Get the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API secret.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }

    /// Returns true when both key and secret are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = if self.api_secret.is_empty() { "" } else { "***" };
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &secret)
            .finish()
    }
}

/// Trading rules for a single pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSettings {
    /// The pair these rules apply to.
    pub pair: CurrencyPair,
    /// Fractional digits accepted on base volumes.
    pub base_precision: u32,
    /// Fractional digits accepted on quote volumes.
    pub quote_precision: u32,
    /// Smallest base volume the venue accepts.
    pub min_volume: Volume,
}

impl PairSettings {
    /// Rules with default precision and no minimum volume.
    #[must_use]
    pub fn new(pair: CurrencyPair) -> Self {
        Self {
            pair,
            base_precision: VOLUME_PRECISION,
            quote_precision: VOLUME_PRECISION,
            min_volume: Volume::ZERO,
        }
    }
}

/// Venue-wide parameters plus the credentials used to act on the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeSettings {
    /// Taker fee charged by the venue.
    pub taker_fee: Fraction,
    /// Default fractional digits for volumes.
    pub volume_precision: u32,
    /// Per-pair rules published by the venue.
    pub pairs: Vec<PairSettings>,
    #[serde(default)]
    credentials: Credentials,
}

impl Default for ExchangeSettings {
    fn default() -> Self {
        Self {
            taker_fee: TAKER_FEE,
            volume_precision: VOLUME_PRECISION,
            pairs: Vec::new(),
            credentials: Credentials::default(),
        }
    }
}

impl ExchangeSettings {
    /// Settings with the given fee and pair rules and no credentials.
    #[must_use]
    pub fn new(taker_fee: Fraction, pairs: Vec<PairSettings>) -> Self {
        Self {
            taker_fee,
            pairs,
            ..Self::default()
        }
    }

    /// Standard fee and precision with the given pair rules.
    #[must_use]
    pub fn with_pairs(pairs: Vec<PairSettings>) -> Self {
        Self::new(TAKER_FEE, pairs)
    }

    /// Replace the account credentials.
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    /// Builder-style variant of [`set_credentials`](Self::set_credentials).
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Get the account credentials.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns true when complete credentials are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_complete()
    }

    /// Rules for `pair`, if the venue published any.
    #[must_use]
    pub fn pair(&self, pair: &CurrencyPair) -> Option<&PairSettings> {
        self.pairs.iter().find(|p| &p.pair == pair)
    }
}
