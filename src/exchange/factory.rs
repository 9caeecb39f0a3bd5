//! Exchange factory.
//!
//! Resolves a venue name to its provider, binds the capabilities and brings
//! the new [`Exchange`] up to date: settings loaded, credentials applied and
//! the account portfolio forwarded to the shared [`PortfolioManager`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, warn};

use super::binance::BinanceVenue;
use super::paper::PaperVenue;
use super::{Capabilities, Exchange, VenueProvider};
use crate::config::{Config, VenueConfig};
use crate::domain::{PortfolioManager, PortfolioState};
use crate::error::{ExchangeError, Result};

/// Venues this build knows how to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Venue {
    /// Binance spot REST API.
    Binance,
    /// In-memory simulated venue.
    Paper,
}

impl Venue {
    /// Every supported venue.
    pub const ALL: [Self; 2] = [Self::Binance, Self::Paper];

    /// Canonical lower-case name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Paper => "paper",
        }
    }

    /// Construct the venue's provider from its config section.
    pub fn provider(self, config: &VenueConfig) -> Result<Box<dyn VenueProvider>> {
        match self {
            Self::Binance => Ok(Box::new(BinanceVenue::from_config(config)?)),
            Self::Paper => Ok(Box::new(PaperVenue::from_config(self.name(), config)?)),
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Venue {
    type Err = ExchangeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|venue| venue.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExchangeError::UnknownVenue(s.to_string()))
    }
}

/// Builds [`Exchange`] values from configuration.
pub struct ExchangeFactory {
    config: Config,
    portfolio: Arc<PortfolioManager>,
}

impl ExchangeFactory {
    /// Create a factory forwarding portfolios to `portfolio`.
    pub fn new(config: Config, portfolio: Arc<PortfolioManager>) -> Self {
        Self { config, portfolio }
    }

    /// Build the exchange configured under `name`.
    ///
    /// Fails with [`ExchangeError::UnknownVenue`] when `name` is not a
    /// supported venue, whether or not the config has a section for it.
    pub async fn build_exchange(&self, name: &str) -> Result<Exchange> {
        let venue: Venue = name.parse()?;
        let section = self.config.venue(venue.name())?;
        let provider = venue.provider(section)?;
        self.assemble(venue.name(), section, provider.as_ref()).await
    }

    /// Build an exchange around a caller-supplied provider.
    ///
    /// The config section for `name` supplies pairs and credentials; the
    /// name itself does not have to be a known venue.
    pub async fn build_with_provider(
        &self,
        name: &str,
        provider: &dyn VenueProvider,
    ) -> Result<Exchange> {
        let section = self.config.venue(name)?;
        self.assemble(name, section, provider).await
    }

    /// Build every configured venue concurrently.
    ///
    /// Results are returned per configured name, in config order.
    pub async fn build_all(&self) -> Vec<(String, Result<Exchange>)> {
        let names: Vec<String> = self.config.venue_names().map(str::to_string).collect();
        let results = join_all(names.iter().map(|name| self.build_exchange(name))).await;
        names.into_iter().zip(results).collect()
    }

    async fn assemble(
        &self,
        name: &str,
        section: &VenueConfig,
        provider: &dyn VenueProvider,
    ) -> Result<Exchange> {
        let pairs = section.pairs_enabled()?;
        let mut exchange = Exchange::new(name, pairs, Capabilities::bind(provider));

        exchange.load_settings().await?;
        exchange.apply_credentials(section.credentials());

        match exchange.get_portfolio().await {
            Ok(portfolio) => {
                let state = PortfolioState::for_exchange(name, portfolio.into_positions());
                self.portfolio.update_with_new_state(state, false);
            }
            Err(e) => warn!(venue = %name, error = %e, "Portfolio unavailable"),
        }

        info!(
            venue = %name,
            pairs = exchange.pairs_enabled().len(),
            authenticated = exchange.settings().is_authenticated(),
            "Exchange ready"
        );
        Ok(exchange)
    }
}
