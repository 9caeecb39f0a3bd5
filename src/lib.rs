//! Crossbook - a venue-agnostic order model and exchange access layer.
//!
//! Orders are resolved once from a side, a price and one authoritative
//! volume; every derived quantity (counter-volume, taker fee, net in/out
//! flows) is truncated to 8 decimal places so that what the model promises
//! never exceeds what a venue will settle.
//!
//! # Modules
//!
//! - [`domain`] - Venue-agnostic types: orders, order books, settings, portfolios
//! - [`exchange`] - The [`Exchange`](exchange::Exchange) capability set, its
//!   providers and the factory that builds them
//! - [`config`] - TOML configuration with per-venue sections
//! - [`error`] - Error types for the crate
//! - [`cli`] - Command-line surface of the `crossbook` binary
//!
//! # Example
//!
//! ```
//! use crossbook::domain::Order;
//! use rust_decimal_macros::dec;
//!
//! let bid = Order::new_bid(dec!(0.05), dec!(2)).unwrap();
//! assert_eq!(bid.quote_volume_in(), dec!(0.1));
//! assert_eq!(bid.base_volume_out(), dec!(1.998));
//!
//! let ask = bid.matching_counter_order();
//! assert_eq!(ask.base_volume_in(), dec!(2));
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod exchange;
