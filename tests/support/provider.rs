//! A venue provider that records how it is bound and called.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use crossbook::domain::{
    CurrencyPair, ExchangeSettings, Order, OrderDispatched, Orderbook, PairSettings, Portfolio,
    Position,
};
use crossbook::error::{ExchangeError, Result};
use crossbook::exchange::{OrderbookFn, PortfolioFn, PostOrderFn, SettingsFn, VenueProvider};
use futures_util::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use rust_decimal::Decimal;

/// Counts per capability: how often it was bound and how often invoked.
#[derive(Debug, Default)]
pub struct Counter {
    pub bound: AtomicUsize,
    pub called: AtomicUsize,
}

impl Counter {
    pub fn bound(&self) -> usize {
        self.bound.load(Ordering::SeqCst)
    }

    pub fn called(&self) -> usize {
        self.called.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub settings: Counter,
    pub orderbook: Counter,
    pub portfolio: Counter,
    pub post_order: Counter,
    /// Settings handed to the portfolio capability.
    pub portfolio_settings: Mutex<Vec<ExchangeSettings>>,
    pub posted: Mutex<Vec<Order>>,
}

/// Scripted provider; clone the `recorder` handle before binding to inspect it.
#[derive(Debug, Clone)]
pub struct RecordingProvider {
    pub name: String,
    pub recorder: Arc<Recorder>,
    pub pairs: Vec<CurrencyPair>,
    pub positions: Vec<(String, Decimal)>,
    pub fail_settings: bool,
    pub fail_portfolio: bool,
}

impl RecordingProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            recorder: Arc::new(Recorder::default()),
            pairs: vec![super::eth_btc()],
            positions: Vec::new(),
            fail_settings: false,
            fail_portfolio: false,
        }
    }

    pub fn with_position(mut self, currency: &str, amount: Decimal) -> Self {
        self.positions.push((currency.to_string(), amount));
        self
    }

    pub fn failing_settings(mut self) -> Self {
        self.fail_settings = true;
        self
    }

    pub fn failing_portfolio(mut self) -> Self {
        self.fail_portfolio = true;
        self
    }
}

impl VenueProvider for RecordingProvider {
    fn settings_provider(&self) -> SettingsFn {
        self.recorder.settings.bound.fetch_add(1, Ordering::SeqCst);
        let recorder = Arc::clone(&self.recorder);
        let pairs = self.pairs.clone();
        let fail = self.fail_settings;
        Arc::new(move || -> BoxFuture<'static, Result<ExchangeSettings>> {
            recorder.settings.called.fetch_add(1, Ordering::SeqCst);
            let result = if fail {
                Err(ExchangeError::Api { code: 503, msg: "maintenance".into() }.into())
            } else {
                Ok(ExchangeSettings::with_pairs(
                    pairs.iter().cloned().map(PairSettings::new).collect(),
                ))
            };
            async move { result }.boxed()
        })
    }

    fn orderbook_provider(&self) -> OrderbookFn {
        self.recorder.orderbook.bound.fetch_add(1, Ordering::SeqCst);
        let recorder = Arc::clone(&self.recorder);
        Arc::new(move |pair: CurrencyPair| -> BoxFuture<'static, Result<Orderbook>> {
            recorder.orderbook.called.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::task::yield_now().await;
                let mut book = super::eth_btc_book();
                if pair != *book.pair() {
                    book = Orderbook::new(pair);
                }
                Ok(book)
            }
            .boxed()
        })
    }

    fn portfolio_provider(&self) -> PortfolioFn {
        self.recorder.portfolio.bound.fetch_add(1, Ordering::SeqCst);
        let recorder = Arc::clone(&self.recorder);
        let name = self.name.clone();
        let positions = self.positions.clone();
        let fail = self.fail_portfolio;
        Arc::new(move |settings: ExchangeSettings| -> BoxFuture<'static, Result<Portfolio>> {
            recorder.portfolio.called.fetch_add(1, Ordering::SeqCst);
            recorder.portfolio_settings.lock().push(settings);
            let result = if fail {
                Err(ExchangeError::AuthFailed("bad key".into()).into())
            } else {
                Ok(Portfolio::new(
                    positions
                        .iter()
                        .map(|(currency, amount)| Position::new(name.as_str(), currency.as_str(), *amount))
                        .collect(),
                ))
            };
            async move { result }.boxed()
        })
    }

    fn order_poster(&self) -> PostOrderFn {
        self.recorder.post_order.bound.fetch_add(1, Ordering::SeqCst);
        let recorder = Arc::clone(&self.recorder);
        let name = self.name.clone();
        Arc::new(
            move |order: Order, _settings: ExchangeSettings| -> BoxFuture<'static, Result<OrderDispatched>> {
                let id = recorder.post_order.called.fetch_add(1, Ordering::SeqCst) + 1;
                let dispatched = OrderDispatched {
                    exchange: name.clone(),
                    order_id: id.to_string(),
                    side: order.side(),
                    accepted_volume: order.base_volume(),
                    executed_volume: order.base_volume(),
                    dispatched_at: Utc::now(),
                };
                recorder.posted.lock().push(order);
                async move { Ok(dispatched) }.boxed()
            },
        )
    }
}
