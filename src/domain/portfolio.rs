//! Account positions and the shared portfolio state.
//!
//! Venues report a [`Portfolio`] snapshot; the factory folds it into the
//! process-wide [`PortfolioManager`], which is shared through an `Arc`
//! rather than living in a global.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Currency, Volume};

/// Holding of one currency on one venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    exchange: String,
    currency: Currency,
    amount: Volume,
    updated_at: DateTime<Utc>,
}

impl Position {
    /// Create a position stamped with the current time.
    pub fn new(exchange: impl Into<String>, currency: impl Into<Currency>, amount: Volume) -> Self {
        Self {
            exchange: exchange.into(),
            currency: currency.into(),
            amount,
            updated_at: Utc::now(),
        }
    }

    /// Get the venue name.
    #[must_use]
    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    /// Get the currency.
    #[must_use]
    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    /// Get the amount held.
    #[must_use]
    pub fn amount(&self) -> Volume {
        self.amount
    }

    /// When the amount was last changed.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn key(&self) -> PositionKey {
        (self.exchange.clone(), self.currency.clone())
    }
}

/// Account positions reported by one venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portfolio {
    positions: Vec<Position>,
}

impl Portfolio {
    /// Create a portfolio from positions.
    #[must_use]
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Get the positions.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// Consume the portfolio, returning its positions.
    #[must_use]
    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }

    /// Amount held in `currency`, zero when absent.
    #[must_use]
    pub fn balance(&self, currency: &Currency) -> Volume {
        self.positions
            .iter()
            .filter(|p| &p.currency == currency)
            .map(|p| p.amount)
            .sum()
    }
}

type PositionKey = (String, Currency);

/// Positions keyed by venue and currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortfolioState {
    positions: BTreeMap<PositionKey, Position>,
    covered: BTreeSet<String>,
}

impl PortfolioState {
    /// Build a state from a position list.
    ///
    /// Repeated (venue, currency) entries are summed.
    pub fn from_positions(positions: impl IntoIterator<Item = Position>) -> Self {
        let mut state = Self::default();
        for position in positions {
            state.add(position);
        }
        state
    }

    /// Build the full account state of `exchange`.
    ///
    /// The venue is covered even when `positions` is empty, so a
    /// replacing update clears whatever it held before.
    pub fn for_exchange(
        exchange: impl Into<String>,
        positions: impl IntoIterator<Item = Position>,
    ) -> Self {
        let mut state = Self::from_positions(positions);
        state.covered.insert(exchange.into());
        state
    }

    fn add(&mut self, position: Position) {
        match self.positions.get_mut(&position.key()) {
            Some(existing) => {
                existing.amount += position.amount;
                existing.updated_at = position.updated_at;
            }
            None => {
                self.positions.insert(position.key(), position);
            }
        }
    }

    /// Venues this state speaks for: every venue holding a position plus
    /// those it was built for.
    #[must_use]
    pub fn exchanges(&self) -> BTreeSet<&str> {
        self.positions
            .keys()
            .map(|(exchange, _)| exchange.as_str())
            .chain(self.covered.iter().map(String::as_str))
            .collect()
    }

    /// Iterate positions ordered by venue then currency.
    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    /// Look up one position.
    #[must_use]
    pub fn position(&self, exchange: &str, currency: &Currency) -> Option<&Position> {
        self.positions.get(&(exchange.to_string(), currency.clone()))
    }

    /// Sum of `currency` across every venue.
    #[must_use]
    pub fn total(&self, currency: &Currency) -> Volume {
        self.positions
            .values()
            .filter(|p| &p.currency == currency)
            .map(|p| p.amount)
            .sum()
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if there are no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Thread-safe portfolio state shared by every venue.
///
/// Writes are serialized by the inner lock, so venues can be built
/// concurrently against one manager.
#[derive(Debug, Default)]
pub struct PortfolioManager {
    state: RwLock<PortfolioState>,
}

impl PortfolioManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `state` into the managed portfolio.
    ///
    /// With `incremental == false` every venue `state` speaks for has its
    /// previous positions replaced wholesale, including venues that now
    /// report nothing; other venues are left alone. With `incremental == true` amounts are added to the
    /// existing positions and positions that reach zero are dropped.
    pub fn update_with_new_state(&self, state: PortfolioState, incremental: bool) {
        let mut current = self.state.write();

        if incremental {
            for position in state.positions.into_values() {
                current.add(position);
            }
            current.positions.retain(|_, p| !p.amount.is_zero());
        } else {
            let replaced: BTreeSet<String> =
                state.exchanges().into_iter().map(str::to_string).collect();
            current
                .positions
                .retain(|(exchange, _), _| !replaced.contains(exchange));
            current.positions.extend(state.positions);
        }

        debug!(
            positions = current.len(),
            incremental, "Portfolio state updated"
        );
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PortfolioState {
        self.state.read().clone()
    }

    /// Amount of `currency` held on `exchange`, zero when absent.
    #[must_use]
    pub fn balance(&self, exchange: &str, currency: &Currency) -> Volume {
        self.state
            .read()
            .position(exchange, currency)
            .map_or(Decimal::ZERO, Position::amount)
    }

    /// Sum of `currency` across every venue.
    #[must_use]
    pub fn total(&self, currency: &Currency) -> Volume {
        self.state.read().total(currency)
    }
}
