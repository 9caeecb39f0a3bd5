//! Order book snapshots and the hits derived from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CurrencyPair, OrderSide, Price, Volume};

/// A single price level in the order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    price: Price,
    volume: Volume,
}

impl PriceLevel {
    /// Create a new price level.
    #[must_use]
    pub const fn new(price: Price, volume: Volume) -> Self {
        Self { price, volume }
    }

    /// Get the price.
    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Get the base volume resting at this price.
    #[must_use]
    pub const fn volume(&self) -> Volume {
        self.volume
    }
}

/// Bid/ask snapshot for one pair on one venue.
///
/// Bids are kept best (highest) first and asks best (lowest) first,
/// whatever order the venue returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orderbook {
    pair: CurrencyPair,
    bids: Vec<PriceLevel>,
    asks: Vec<PriceLevel>,
    observed_at: DateTime<Utc>,
}

impl Orderbook {
    /// Create an empty book for a pair.
    #[must_use]
    pub fn new(pair: CurrencyPair) -> Self {
        Self::with_levels(pair, Vec::new(), Vec::new())
    }

    /// Create a book from raw levels, sorting each side best first.
    #[must_use]
    pub fn with_levels(pair: CurrencyPair, mut bids: Vec<PriceLevel>, mut asks: Vec<PriceLevel>) -> Self {
        bids.sort_by(|a, b| b.price.cmp(&a.price));
        asks.sort_by(|a, b| a.price.cmp(&b.price));
        Self {
            pair,
            bids,
            asks,
            observed_at: Utc::now(),
        }
    }

    /// Get the pair this book quotes.
    #[must_use]
    pub fn pair(&self) -> &CurrencyPair {
        &self.pair
    }

    /// Bid levels, best first.
    #[must_use]
    pub fn bids(&self) -> &[PriceLevel] {
        &self.bids
    }

    /// Ask levels, best first.
    #[must_use]
    pub fn asks(&self) -> &[PriceLevel] {
        &self.asks
    }

    /// When the snapshot was taken.
    #[must_use]
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// Get the best (highest) bid.
    #[must_use]
    pub fn best_bid(&self) -> Option<&PriceLevel> {
        self.bids.first()
    }

    /// Get the best (lowest) ask.
    #[must_use]
    pub fn best_ask(&self) -> Option<&PriceLevel> {
        self.asks.first()
    }

    /// Best ask minus best bid, when both sides are present.
    #[must_use]
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// The level an order of `side` would cross against, as a [`Hit`].
    ///
    /// A Bid crosses the best ask; an Ask crosses the best bid.
    #[must_use]
    pub fn hit(&self, exchange: &str, side: OrderSide) -> Option<Hit> {
        let level = match side {
            OrderSide::Bid => self.best_ask()?,
            OrderSide::Ask => self.best_bid()?,
        };
        Some(Hit {
            exchange: exchange.to_string(),
            pair: self.pair.clone(),
            side,
            price: level.price,
            volume: level.volume,
            observed_at: self.observed_at,
        })
    }
}

/// The orderbook event that triggered an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Venue the level was observed on.
    pub exchange: String,
    /// Pair the level belongs to.
    pub pair: CurrencyPair,
    /// Side of the order that would take the level.
    pub side: OrderSide,
    /// Level price.
    pub price: Price,
    /// Base volume available at the level.
    pub volume: Volume,
    /// When the underlying snapshot was taken.
    pub observed_at: DateTime<Utc>,
}
