//! In-memory simulated venue.
//!
//! Balances and books live behind a lock shared by every bound capability.
//! Posting an order settles it immediately at the order's price: the "in"
//! volume is debited and the net "out" volume credited.

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

use super::provider::{OrderbookFn, PortfolioFn, PostOrderFn, SettingsFn, VenueProvider};
use crate::config::VenueConfig;
use crate::domain::{
    Currency, CurrencyPair, ExchangeSettings, Order, OrderDispatched, OrderSide, Orderbook,
    PairSettings, Portfolio, Position, PriceLevel, Volume,
};
use crate::error::{ConfigError, ExchangeError, Result};

/// Config key holding starting balances, e.g. `"BTC:2,ETH:10"`.
pub const BALANCES: &str = "balances";
/// Prefix of config keys holding seeded books, e.g. `book_ETH_BTC`.
pub const BOOK_PREFIX: &str = "book_";

#[derive(Debug, Default)]
struct PaperState {
    balances: BTreeMap<Currency, Volume>,
    books: HashMap<CurrencyPair, Orderbook>,
}

/// Simulated venue provider.
#[derive(Debug, Clone)]
pub struct PaperVenue {
    name: String,
    state: Arc<RwLock<PaperState>>,
}

impl PaperVenue {
    /// Create an empty venue.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(RwLock::new(PaperState::default())),
        }
    }

    /// Credit a starting balance.
    #[must_use]
    pub fn with_balance(self, currency: impl Into<Currency>, amount: Volume) -> Self {
        *self.state.write().balances.entry(currency.into()).or_default() += amount;
        self
    }

    /// Seed the book for its pair.
    #[must_use]
    pub fn with_orderbook(self, book: Orderbook) -> Self {
        self.state.write().books.insert(book.pair().clone(), book);
        self
    }

    /// Build a venue from its config section.
    ///
    /// Reads `balances` (`CUR:amount` entries) and every `book_<PAIR>` key,
    /// whose value is `bids | asks` with `price@volume` levels, e.g.
    /// `"0.050@3,0.049@1 | 0.051@2"`.
    pub fn from_config(name: impl Into<String>, config: &VenueConfig) -> Result<Self> {
        let mut venue = Self::new(name);

        if let Some(raw) = config.get(BALANCES) {
            for (currency, amount) in parse_balances(raw)? {
                venue = venue.with_balance(currency, amount);
            }
        }

        for pair in config.pairs_enabled()? {
            let key = format!("{BOOK_PREFIX}{pair}");
            if let Some(raw) = config.get(&key) {
                venue = venue.with_orderbook(parse_book(&key, pair, raw)?);
            }
        }

        Ok(venue)
    }

    /// Current balance of `currency`.
    #[must_use]
    pub fn balance(&self, currency: &Currency) -> Volume {
        self.state
            .read()
            .balances
            .get(currency)
            .copied()
            .unwrap_or_default()
    }

    fn settle(&self, order: &Order) -> Result<OrderDispatched> {
        let hit = order.hit().ok_or(ExchangeError::UnroutableOrder)?;
        let (base, quote) = (hit.pair.base(), hit.pair.quote());
        let (spent, spent_amount, received, received_amount) = match order.side() {
            OrderSide::Bid => (quote, order.quote_volume_in(), base, order.base_volume_out()),
            OrderSide::Ask => (base, order.base_volume_in(), quote, order.quote_volume_out()),
        };

        let mut state = self.state.write();
        let available = state.balances.get(spent).copied().unwrap_or_default();
        if available < spent_amount {
            return Err(ExchangeError::InsufficientBalance {
                currency: spent.to_string(),
                required: spent_amount,
                available,
            }
            .into());
        }

        *state.balances.entry(spent.clone()).or_default() -= spent_amount;
        *state.balances.entry(received.clone()).or_default() += received_amount;
        drop(state);

        info!(
            venue = %self.name,
            pair = %hit.pair,
            side = %order.side(),
            spent = %spent_amount,
            received = %received_amount,
            "Paper order settled"
        );

        Ok(OrderDispatched {
            exchange: self.name.clone(),
            order_id: Uuid::new_v4().to_string(),
            side: order.side(),
            accepted_volume: order.base_volume(),
            executed_volume: order.base_volume(),
            dispatched_at: Utc::now(),
        })
    }
}

impl VenueProvider for PaperVenue {
    fn settings_provider(&self) -> SettingsFn {
        let state = Arc::clone(&self.state);
        Arc::new(move || -> BoxFuture<'static, Result<ExchangeSettings>> {
            let mut pairs: Vec<PairSettings> = state
                .read()
                .books
                .keys()
                .cloned()
                .map(PairSettings::new)
                .collect();
            pairs.sort_by(|a, b| a.pair.cmp(&b.pair));
            let settings = ExchangeSettings::with_pairs(pairs);
            async move { Ok(settings) }.boxed()
        })
    }

    fn orderbook_provider(&self) -> OrderbookFn {
        let venue = self.clone();
        Arc::new(move |pair: CurrencyPair| -> BoxFuture<'static, Result<Orderbook>> {
            let book = venue.state.read().books.get(&pair).cloned();
            let result = book.ok_or_else(|| {
                ExchangeError::PairNotFound {
                    exchange: venue.name.clone(),
                    pair,
                }
                .into()
            });
            async move { result }.boxed()
        })
    }

    fn portfolio_provider(&self) -> PortfolioFn {
        let venue = self.clone();
        Arc::new(move |_settings: ExchangeSettings| -> BoxFuture<'static, Result<Portfolio>> {
            let positions = venue
                .state
                .read()
                .balances
                .iter()
                .filter(|(_, amount)| !amount.is_zero())
                .map(|(currency, amount)| {
                    Position::new(venue.name.clone(), currency.clone(), *amount)
                })
                .collect();
            async move { Ok(Portfolio::new(positions)) }.boxed()
        })
    }

    fn order_poster(&self) -> PostOrderFn {
        let venue = self.clone();
        Arc::new(
            move |order: Order, _settings: ExchangeSettings| -> BoxFuture<'static, Result<OrderDispatched>> {
                let result = venue.settle(&order);
                async move { result }.boxed()
            },
        )
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn parse_decimal(field: &str, raw: &str) -> std::result::Result<Decimal, ConfigError> {
    Decimal::from_str(raw.trim()).map_err(|e| invalid(field, format!("'{}': {e}", raw.trim())))
}

fn parse_balances(raw: &str) -> std::result::Result<Vec<(Currency, Volume)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (currency, amount) = entry
                .split_once(':')
                .ok_or_else(|| invalid(BALANCES, format!("expected CUR:amount, got '{entry}'")))?;
            let amount = parse_decimal(BALANCES, amount)?;
            if amount < Decimal::ZERO {
                return Err(invalid(BALANCES, format!("negative balance for {currency}")));
            }
            Ok((Currency::new(currency), amount))
        })
        .collect()
}

fn parse_levels(field: &str, raw: &str) -> std::result::Result<Vec<PriceLevel>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .map(|level| {
            let (price, volume) = level
                .split_once('@')
                .ok_or_else(|| invalid(field, format!("expected price@volume, got '{level}'")))?;
            Ok(PriceLevel::new(
                parse_decimal(field, price)?,
                parse_decimal(field, volume)?,
            ))
        })
        .collect()
}

fn parse_book(
    field: &str,
    pair: CurrencyPair,
    raw: &str,
) -> std::result::Result<Orderbook, ConfigError> {
    let (bids, asks) = raw.split_once('|').unwrap_or((raw, ""));
    Ok(Orderbook::with_levels(
        pair,
        parse_levels(field, bids)?,
        parse_levels(field, asks)?,
    ))
}
