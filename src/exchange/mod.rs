//! Exchange abstraction layer.
//!
//! An [`Exchange`] is a venue seen through four bound capabilities:
//! settings, orderbook, portfolio and order posting. The capabilities are
//! resolved once from a [`VenueProvider`] when the exchange is assembled, so
//! callers never branch on which venue they are talking to.
//!
//! ## Adding a New Venue
//!
//! 1. Create a module under `exchange/<name>/`
//! 2. Implement [`VenueProvider`] (all four capabilities are required)
//! 3. Add a [`Venue`] variant and its provider construction in the factory

mod factory;
mod provider;

pub mod binance;
pub mod paper;

pub use factory::{ExchangeFactory, Venue};
pub use provider::{OrderbookFn, PortfolioFn, PostOrderFn, SettingsFn, VenueProvider};

use std::fmt;

use tracing::debug;

use crate::domain::{
    Credentials, CurrencyPair, ExchangeSettings, Order, OrderDispatched, Orderbook, Portfolio,
};
use crate::error::{ExchangeError, Result};

/// The four bound operations of one venue.
#[derive(Clone)]
pub struct Capabilities {
    get_settings: SettingsFn,
    get_orderbook: OrderbookFn,
    get_portfolio: PortfolioFn,
    post_order: PostOrderFn,
}

impl Capabilities {
    /// Invoke each binding method of `provider` exactly once.
    pub fn bind(provider: &dyn VenueProvider) -> Self {
        Self {
            get_settings: provider.settings_provider(),
            get_orderbook: provider.orderbook_provider(),
            get_portfolio: provider.portfolio_provider(),
            post_order: provider.order_poster(),
        }
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Capabilities { .. }")
    }
}

/// A venue with its capabilities bound.
///
/// Built by [`ExchangeFactory`]; after construction it is only read, and can
/// be shared between tasks behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Exchange {
    name: String,
    pairs_enabled: Vec<CurrencyPair>,
    settings: ExchangeSettings,
    capabilities: Capabilities,
}

impl Exchange {
    /// Create an exchange with default settings.
    pub fn new(
        name: impl Into<String>,
        pairs_enabled: Vec<CurrencyPair>,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            name: name.into(),
            pairs_enabled,
            settings: ExchangeSettings::default(),
            capabilities,
        }
    }

    /// Replace the settings with the venue's current ones, keeping credentials.
    pub async fn load_settings(&mut self) -> Result<()> {
        let credentials = self.settings.credentials().clone();
        let settings = (self.capabilities.get_settings)().await?;
        self.settings = settings.with_credentials(credentials);
        debug!(
            venue = %self.name,
            taker_fee = %self.settings.taker_fee,
            pairs = self.settings.pairs.len(),
            "Settings loaded"
        );
        Ok(())
    }

    /// Set the credentials used for account operations.
    pub fn apply_credentials(&mut self, credentials: Credentials) {
        self.settings.set_credentials(credentials);
    }

    /// Get the venue name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the pairs enabled for trading.
    #[must_use]
    pub fn pairs_enabled(&self) -> &[CurrencyPair] {
        &self.pairs_enabled
    }

    /// Get the loaded settings.
    #[must_use]
    pub fn settings(&self) -> &ExchangeSettings {
        &self.settings
    }

    /// Returns true if `pair` is enabled on this venue.
    #[must_use]
    pub fn is_pair_enabled(&self, pair: &CurrencyPair) -> bool {
        self.pairs_enabled.contains(pair)
    }

    /// Fail with [`ExchangeError::PairNotEnabled`] unless `pair` is enabled.
    pub fn ensure_pair_enabled(&self, pair: &CurrencyPair) -> Result<()> {
        if self.is_pair_enabled(pair) {
            Ok(())
        } else {
            Err(ExchangeError::PairNotEnabled {
                exchange: self.name.clone(),
                pair: pair.clone(),
            }
            .into())
        }
    }

    /// Fetch venue-wide settings without storing them.
    pub async fn get_settings(&self) -> Result<ExchangeSettings> {
        (self.capabilities.get_settings)().await
    }

    /// Fetch the current book for an enabled pair.
    pub async fn get_orderbook(&self, pair: &CurrencyPair) -> Result<Orderbook> {
        self.ensure_pair_enabled(pair)?;
        (self.capabilities.get_orderbook)(pair.clone()).await
    }

    /// Fetch the account positions.
    pub async fn get_portfolio(&self) -> Result<Portfolio> {
        (self.capabilities.get_portfolio)(self.settings.clone()).await
    }

    /// Submit an order.
    ///
    /// The order is routed through its hit, which must name an enabled pair.
    pub async fn post_order(&self, order: &Order) -> Result<OrderDispatched> {
        let hit = order.hit().ok_or(ExchangeError::UnroutableOrder)?;
        self.ensure_pair_enabled(&hit.pair)?;
        debug!(
            venue = %self.name,
            pair = %hit.pair,
            side = %order.side(),
            price = %order.price(),
            volume = %order.base_volume(),
            "Posting order"
        );
        (self.capabilities.post_order)(order.clone(), self.settings.clone()).await
    }
}
