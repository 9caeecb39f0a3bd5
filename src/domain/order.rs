//! The order value model.
//!
//! An [`Order`] is built from a side, a price and one authoritative volume.
//! Everything else (counter-volume, fee, and the four net in/out volumes)
//! is derived and kept consistent by the two volume-update operations.
//!
//! | Side | base in | quote in | base out | quote out |
//! |------|---------|----------|----------|-----------|
//! | Bid  | 0 | trunc8(quote) | trunc8(base - base × fee) | 0 |
//! | Ask  | trunc8(base) | 0 | 0 | trunc8(quote - quote × fee) |
//!
//! "In" is what leaves the account to enter the venue, "out" is what the
//! venue pays back net of the taker fee.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::orderbook::Hit;
use super::precision::trunc8;
use super::{Fraction, Price, Volume};

/// Taker fee applied to every order: 0.10%.
pub const TAKER_FEE: Fraction = Decimal::from_parts(1, 0, 0, false, 3);

/// Order side.
///
/// Raw side codes follow the venue-neutral numbering `0 = Bid`, `1 = Ask`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawSide")]
pub enum OrderSide {
    /// Buy the base currency, paying with the quote currency.
    Bid,
    /// Sell the base currency, receiving the quote currency.
    Ask,
}

impl OrderSide {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Bid => Self::Ask,
            Self::Ask => Self::Bid,
        }
    }

    /// Numeric side code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Bid => 0,
            Self::Ask => 1,
        }
    }

    /// Lower-case side name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bid => "bid",
            Self::Ask => "ask",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for OrderSide {
    type Error = DomainError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Bid),
            1 => Ok(Self::Ask),
            other => Err(DomainError::InvalidSide(other.to_string())),
        }
    }
}

impl FromStr for OrderSide {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bid" | "buy" => Ok(Self::Bid),
            "ask" | "sell" => Ok(Self::Ask),
            _ => Err(DomainError::InvalidSide(s.to_string())),
        }
    }
}

/// Side as it may appear in external input: a code or a name.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSide {
    Code(i64),
    Name(String),
}

impl TryFrom<RawSide> for OrderSide {
    type Error = DomainError;

    fn try_from(raw: RawSide) -> Result<Self, Self::Error> {
        match raw {
            RawSide::Code(code) => u8::try_from(code)
                .map_err(|_| DomainError::InvalidSide(code.to_string()))
                .and_then(Self::try_from),
            RawSide::Name(name) => name.parse(),
        }
    }
}

/// A fully resolved order on one side of a pair.
///
/// Fields are read through accessors; the only mutations are
/// [`set_base_volume`](Self::set_base_volume),
/// [`set_quote_volume`](Self::set_quote_volume) and
/// [`record_progress`](Self::record_progress), each of which leaves the
/// order untouched when it fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct Order {
    side: OrderSide,
    price: Price,
    inverse_price: Price,
    base_volume: Volume,
    quote_volume: Volume,
    taker_fee: Fraction,
    fee: Volume,
    base_volume_in: Volume,
    base_volume_out: Volume,
    quote_volume_in: Volume,
    quote_volume_out: Volume,
    #[serde(skip_serializing_if = "Option::is_none")]
    hit: Option<Hit>,
    progress: Fraction,
}

/// Net flows of an order, all truncated.
#[derive(Debug, Clone, Copy, Default)]
struct Flows {
    base_in: Volume,
    base_out: Volume,
    quote_in: Volume,
    quote_out: Volume,
}

impl Flows {
    fn derive(side: OrderSide, base: Volume, quote: Volume, taker_fee: Fraction) -> Self {
        match side {
            OrderSide::Bid => Self {
                quote_in: trunc8(quote),
                base_out: trunc8(base - base * taker_fee),
                ..Self::default()
            },
            OrderSide::Ask => Self {
                base_in: trunc8(base),
                quote_out: trunc8(quote - quote * taker_fee),
                ..Self::default()
            },
        }
    }
}

impl Order {
    /// Create a Bid buying `base_volume` at `price`.
    pub fn new_bid(price: Price, base_volume: Volume) -> Result<Self, DomainError> {
        Self::new(OrderSide::Bid, price, base_volume)
    }

    /// Create an Ask selling `base_volume` at `price`.
    pub fn new_ask(price: Price, base_volume: Volume) -> Result<Self, DomainError> {
        Self::new(OrderSide::Ask, price, base_volume)
    }

    /// Create an order on `side`.
    ///
    /// Fails with [`DomainError::NonPositivePrice`] when `price <= 0` and
    /// [`DomainError::NegativeVolume`] when `base_volume < 0`.
    pub fn new(side: OrderSide, price: Price, base_volume: Volume) -> Result<Self, DomainError> {
        if price <= Decimal::ZERO {
            return Err(DomainError::NonPositivePrice { price });
        }
        let inverse_price = Decimal::ONE
            .checked_div(price)
            .ok_or(DomainError::Overflow { field: "inverse_price" })?;

        let mut order = Self {
            side,
            price,
            inverse_price,
            base_volume: Decimal::ZERO,
            quote_volume: Decimal::ZERO,
            taker_fee: TAKER_FEE,
            fee: Decimal::ZERO,
            base_volume_in: Decimal::ZERO,
            base_volume_out: Decimal::ZERO,
            quote_volume_in: Decimal::ZERO,
            quote_volume_out: Decimal::ZERO,
            hit: None,
            progress: Decimal::ZERO,
        };
        order.set_base_volume(base_volume)?;
        Ok(order)
    }

    /// Create the order that takes the level described by `hit`.
    pub fn for_hit(hit: Hit) -> Result<Self, DomainError> {
        Ok(Self::new(hit.side, hit.price, hit.volume)?.with_hit(hit))
    }

    /// Attach the orderbook event that triggered this order.
    #[must_use]
    pub fn with_hit(mut self, hit: Hit) -> Self {
        self.hit = Some(hit);
        self
    }

    /// Set the base volume and re-derive every dependent field.
    pub fn set_base_volume(&mut self, base_volume: Volume) -> Result<(), DomainError> {
        if base_volume < Decimal::ZERO {
            return Err(DomainError::NegativeVolume { volume: base_volume });
        }
        let quote_volume = self
            .price
            .checked_mul(base_volume)
            .ok_or(DomainError::Overflow { field: "quote_volume" })?;
        self.apply(base_volume, quote_volume);
        Ok(())
    }

    /// Set the quote volume and re-derive every dependent field.
    pub fn set_quote_volume(&mut self, quote_volume: Volume) -> Result<(), DomainError> {
        if quote_volume < Decimal::ZERO {
            return Err(DomainError::NegativeVolume { volume: quote_volume });
        }
        if self.price.is_zero() {
            return Err(DomainError::ZeroPrice);
        }
        let base_volume = quote_volume
            .checked_div(self.price)
            .ok_or(DomainError::Overflow { field: "base_volume" })?;
        self.apply(base_volume, quote_volume);
        Ok(())
    }

    fn apply(&mut self, base_volume: Volume, quote_volume: Volume) {
        self.base_volume = base_volume;
        self.quote_volume = quote_volume;
        self.fee = base_volume * self.taker_fee;
        self.refresh_flows();
    }

    fn refresh_flows(&mut self) {
        let flows = Flows::derive(self.side, self.base_volume, self.quote_volume, self.taker_fee);
        self.base_volume_in = flows.base_in;
        self.base_volume_out = flows.base_out;
        self.quote_volume_in = flows.quote_in;
        self.quote_volume_out = flows.quote_out;
    }

    /// The order that crosses the spread against this one.
    ///
    /// Same price and volumes on the opposite side, with the in/out volumes
    /// re-derived for the new side. Hit and progress are carried over.
    #[must_use]
    pub fn matching_counter_order(&self) -> Self {
        let mut counter = self.clone();
        counter.side = self.side.opposite();
        counter.refresh_flows();
        counter
    }

    /// The Ask matching this Bid.
    pub fn matching_ask(&self) -> Result<Self, DomainError> {
        self.matching_from(OrderSide::Bid)
    }

    /// The Bid matching this Ask.
    pub fn matching_bid(&self) -> Result<Self, DomainError> {
        self.matching_from(OrderSide::Ask)
    }

    fn matching_from(&self, expected: OrderSide) -> Result<Self, DomainError> {
        if self.side != expected {
            return Err(DomainError::SideMismatch {
                expected,
                actual: self.side,
            });
        }
        Ok(self.matching_counter_order())
    }

    /// Record fill progress, a fraction in `[0, 1]`.
    pub fn record_progress(&mut self, progress: Fraction) -> Result<(), DomainError> {
        if progress < Decimal::ZERO || progress > Decimal::ONE {
            return Err(DomainError::ProgressOutOfRange { progress });
        }
        self.progress = progress;
        Ok(())
    }

    /// Get the side.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Get the price (quote per base).
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Get the inverse price (base per quote).
    #[must_use]
    pub const fn inverse_price(&self) -> Price {
        self.inverse_price
    }

    /// Get the base volume.
    #[must_use]
    pub const fn base_volume(&self) -> Volume {
        self.base_volume
    }

    /// Get the quote volume.
    #[must_use]
    pub const fn quote_volume(&self) -> Volume {
        self.quote_volume
    }

    /// Get the taker fee fraction.
    #[must_use]
    pub const fn taker_fee(&self) -> Fraction {
        self.taker_fee
    }

    /// Get the fee, in base currency.
    #[must_use]
    pub const fn fee(&self) -> Volume {
        self.fee
    }

    /// Base currency leaving the account (Ask only).
    #[must_use]
    pub const fn base_volume_in(&self) -> Volume {
        self.base_volume_in
    }

    /// Base currency received net of fee (Bid only).
    #[must_use]
    pub const fn base_volume_out(&self) -> Volume {
        self.base_volume_out
    }

    /// Quote currency leaving the account (Bid only).
    #[must_use]
    pub const fn quote_volume_in(&self) -> Volume {
        self.quote_volume_in
    }

    /// Quote currency received net of fee (Ask only).
    #[must_use]
    pub const fn quote_volume_out(&self) -> Volume {
        self.quote_volume_out
    }

    /// Get the triggering orderbook event, if any.
    #[must_use]
    pub fn hit(&self) -> Option<&Hit> {
        self.hit.as_ref()
    }

    /// Get the fill progress.
    #[must_use]
    pub const fn progress(&self) -> Fraction {
        self.progress
    }

    /// Returns true once the order is completely filled.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.progress == Decimal::ONE
    }
}

/// External form of an order: only the authoritative inputs are read back.
#[derive(Deserialize)]
struct OrderRecord {
    side: OrderSide,
    price: Price,
    base_volume: Volume,
    #[serde(default)]
    hit: Option<Hit>,
    #[serde(default)]
    progress: Fraction,
}

impl TryFrom<OrderRecord> for Order {
    type Error = DomainError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let mut order = Self::new(record.side, record.price, record.base_volume)?;
        order.hit = record.hit;
        order.record_progress(record.progress)?;
        Ok(order)
    }
}
