//! The capability contract every venue implements.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::domain::{CurrencyPair, ExchangeSettings, Order, OrderDispatched, Orderbook, Portfolio};
use crate::error::Result;

/// Fetches venue-wide settings.
pub type SettingsFn = Arc<dyn Fn() -> BoxFuture<'static, Result<ExchangeSettings>> + Send + Sync>;

/// Fetches the current book for a pair.
pub type OrderbookFn =
    Arc<dyn Fn(CurrencyPair) -> BoxFuture<'static, Result<Orderbook>> + Send + Sync>;

/// Fetches account positions using the resolved settings.
pub type PortfolioFn =
    Arc<dyn Fn(ExchangeSettings) -> BoxFuture<'static, Result<Portfolio>> + Send + Sync>;

/// Submits an order using the resolved settings.
pub type PostOrderFn = Arc<
    dyn Fn(Order, ExchangeSettings) -> BoxFuture<'static, Result<OrderDispatched>> + Send + Sync,
>;

/// A venue's capability set.
///
/// Each method is a binding step: it is called once, when an
/// [`Exchange`](super::Exchange) is assembled, and returns a callable that
/// owns whatever provider state it needs (HTTP client, simulated book...).
/// The provider itself is not kept afterwards. Returned callables must be
/// safe to invoke concurrently.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use futures_util::future::{BoxFuture, FutureExt};
/// use crossbook::domain::{CurrencyPair, ExchangeSettings, Order, OrderDispatched, Orderbook, Portfolio};
/// use crossbook::error::{ExchangeError, Result};
/// use crossbook::exchange::{OrderbookFn, PortfolioFn, PostOrderFn, SettingsFn, VenueProvider};
///
/// struct Closed;
///
/// impl VenueProvider for Closed {
///     fn settings_provider(&self) -> SettingsFn {
///         Arc::new(|| -> BoxFuture<'static, Result<ExchangeSettings>> {
///             async { Ok(ExchangeSettings::default()) }.boxed()
///         })
///     }
///
///     fn orderbook_provider(&self) -> OrderbookFn {
///         Arc::new(|pair: CurrencyPair| -> BoxFuture<'static, Result<Orderbook>> {
///             async move { Ok(Orderbook::new(pair)) }.boxed()
///         })
///     }
///
///     fn portfolio_provider(&self) -> PortfolioFn {
///         Arc::new(|_: ExchangeSettings| -> BoxFuture<'static, Result<Portfolio>> {
///             async { Ok(Portfolio::default()) }.boxed()
///         })
///     }
///
///     fn order_poster(&self) -> PostOrderFn {
///         Arc::new(|_: Order, _: ExchangeSettings| -> BoxFuture<'static, Result<OrderDispatched>> {
///             async { Err(ExchangeError::OrderRejected("market closed".into()).into()) }.boxed()
///         })
///     }
/// }
/// ```
pub trait VenueProvider: Send + Sync {
    /// Bind the settings capability.
    fn settings_provider(&self) -> SettingsFn;

    /// Bind the orderbook capability.
    fn orderbook_provider(&self) -> OrderbookFn;

    /// Bind the portfolio capability.
    fn portfolio_provider(&self) -> PortfolioFn;

    /// Bind the order-posting capability.
    fn order_poster(&self) -> PostOrderFn;
}
