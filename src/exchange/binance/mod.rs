//! Binance spot venue.
//!
//! Settings and books come from public endpoints. The portfolio and order
//! posting are signed with the account credentials carried in the
//! [`ExchangeSettings`] handed to each call, and fail with
//! [`ExchangeError::MissingCredentials`] before any request when those are
//! incomplete.

mod auth;
mod client;
mod responses;

use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};
use url::Url;

pub use auth::sign_query;
pub use client::{BinanceClient, NewOrder};
pub use responses::{
    Account, ApiErrorResponse, Balance, Depth, ExchangeInfo, OrderAck, SymbolFilter, SymbolInfo,
};

use super::provider::{OrderbookFn, PortfolioFn, PostOrderFn, SettingsFn, VenueProvider};
use crate::config::VenueConfig;
use crate::domain::precision::truncate;
use crate::domain::{
    CurrencyPair, ExchangeSettings, Order, OrderDispatched, OrderSide, Orderbook, Portfolio,
    TAKER_FEE,
};
use crate::error::{ExchangeError, Result};

/// Production REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
/// Levels requested per side of the book.
pub const DEPTH_LIMIT: u16 = 20;

const NAME: &str = "binance";

/// Binance venue provider.
#[derive(Debug, Clone)]
pub struct BinanceVenue {
    client: Arc<BinanceClient>,
}

impl BinanceVenue {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: Arc::new(BinanceClient::new(base_url)),
        }
    }

    /// Build from a config section, honouring a `base_url` override.
    pub fn from_config(config: &VenueConfig) -> Result<Self> {
        let base_url = match config.base_url()? {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        Ok(Self::new(base_url))
    }

    #[must_use]
    pub fn client(&self) -> &BinanceClient {
        &self.client
    }
}

fn require_credentials(settings: &ExchangeSettings) -> Result<()> {
    if settings.is_authenticated() {
        Ok(())
    } else {
        Err(ExchangeError::MissingCredentials(NAME.to_string()).into())
    }
}

/// Wire parameters for `order`, with the quantity cut to the pair's lot
/// precision.
fn new_order(order: &Order, pair: &CurrencyPair, settings: &ExchangeSettings) -> Result<NewOrder> {
    let rules = settings.pair(pair);
    let precision = rules.map_or(settings.volume_precision, |rules| rules.base_precision);
    let quantity = truncate(order.base_volume(), precision);

    let min_volume = rules.map(|rules| rules.min_volume).unwrap_or_default();
    if quantity.is_zero() || quantity < min_volume {
        return Err(ExchangeError::OrderRejected(format!(
            "quantity {quantity} below minimum {min_volume} for {pair}"
        ))
        .into());
    }

    Ok(NewOrder {
        symbol: pair.symbol(),
        side: match order.side() {
            OrderSide::Bid => "BUY",
            OrderSide::Ask => "SELL",
        },
        quantity: quantity.normalize().to_string(),
        price: order.price().normalize().to_string(),
    })
}

impl VenueProvider for BinanceVenue {
    fn settings_provider(&self) -> SettingsFn {
        let client = Arc::clone(&self.client);
        Arc::new(move || -> BoxFuture<'static, Result<ExchangeSettings>> {
            let client = Arc::clone(&client);
            async move { Ok(client.exchange_info().await?.into_settings(TAKER_FEE)) }.boxed()
        })
    }

    fn orderbook_provider(&self) -> OrderbookFn {
        let client = Arc::clone(&self.client);
        Arc::new(move |pair: CurrencyPair| -> BoxFuture<'static, Result<Orderbook>> {
            let client = Arc::clone(&client);
            async move {
                let depth = client.depth(&pair.symbol(), DEPTH_LIMIT).await?;
                Ok(depth.into_orderbook(pair))
            }
            .boxed()
        })
    }

    fn portfolio_provider(&self) -> PortfolioFn {
        let client = Arc::clone(&self.client);
        Arc::new(move |settings: ExchangeSettings| -> BoxFuture<'static, Result<Portfolio>> {
            let client = Arc::clone(&client);
            async move {
                require_credentials(&settings)?;
                let account = client.account(settings.credentials()).await?;
                Ok(account.into_portfolio(NAME))
            }
            .boxed()
        })
    }

    fn order_poster(&self) -> PostOrderFn {
        let client = Arc::clone(&self.client);
        Arc::new(
            move |order: Order, settings: ExchangeSettings| -> BoxFuture<'static, Result<OrderDispatched>> {
                let client = Arc::clone(&client);
                async move {
                    require_credentials(&settings)?;
                    let pair = &order.hit().ok_or(ExchangeError::UnroutableOrder)?.pair;
                    let request = new_order(&order, pair, &settings)?;
                    let ack = client.new_order(&request, settings.credentials()).await?;
                    Ok(ack.into_dispatched(NAME, order.side()))
                }
                .boxed()
            },
        )
    }
}
