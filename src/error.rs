use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::CurrencyPair;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("no configuration section for venue '{venue}'")]
    MissingVenue { venue: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Venue and capability errors with structured variants.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("unknown venue '{0}'")]
    UnknownVenue(String),

    #[error("pair {pair} is not enabled on {exchange}")]
    PairNotEnabled { exchange: String, pair: CurrencyPair },

    #[error("pair {pair} not found on {exchange}")]
    PairNotFound { exchange: String, pair: CurrencyPair },

    #[error("order has no hit to route it to a pair")]
    UnroutableOrder,

    #[error("missing API credentials for {0}")]
    MissingCredentials(String),

    #[error("insufficient {currency} balance: required {required}, available {available}")]
    InsufficientBalance {
        currency: String,
        required: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("venue API error {code}: {msg}")]
    Api { code: i64, msg: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
