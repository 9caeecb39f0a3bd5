//! Domain validation errors.
//!
//! These errors are returned when a caller breaks the contract of a domain
//! type: a non-positive price, a negative volume, or an order side outside
//! the two defined values.
//!
//! # Examples
//!
//! ```
//! use crossbook::domain::error::DomainError;
//! use crossbook::domain::Order;
//! use rust_decimal_macros::dec;
//!
//! let result = Order::new_bid(dec!(0), dec!(1));
//! assert!(matches!(result, Err(DomainError::NonPositivePrice { .. })));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::order::OrderSide;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Orders must be priced above zero.
    #[error("price must be positive, got {price}")]
    NonPositivePrice {
        /// The rejected price.
        price: Decimal,
    },

    /// Volumes can never be negative.
    #[error("volume must not be negative, got {volume}")]
    NegativeVolume {
        /// The rejected volume.
        volume: Decimal,
    },

    /// A quote volume cannot be converted without a price.
    #[error("cannot derive base volume from quote volume at zero price")]
    ZeroPrice,

    /// Raw side value outside the Bid/Ask domain.
    #[error("invalid order side: {0}")]
    InvalidSide(String),

    /// A side-specific operation was called on the wrong side.
    #[error("order side mismatch: expected {expected}, got {actual}")]
    SideMismatch {
        /// The side the operation requires.
        expected: OrderSide,
        /// The side the order actually has.
        actual: OrderSide,
    },

    /// Fill progress is a fraction.
    #[error("progress must be within [0, 1], got {progress}")]
    ProgressOutOfRange {
        /// The rejected progress value.
        progress: Decimal,
    },

    /// Arithmetic left the representable decimal range.
    #[error("arithmetic overflow while deriving {field}")]
    Overflow {
        /// The field being derived.
        field: &'static str,
    },

    /// A currency or currency pair could not be parsed.
    #[error("invalid currency pair '{0}'")]
    InvalidPair(String),
}
