//! Binance REST payloads and their conversion into domain types.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{
    CurrencyPair, ExchangeSettings, Fraction, OrderDispatched, OrderSide, Orderbook, PairSettings,
    Portfolio, Position, PriceLevel,
};
use crate::error::ExchangeError;

/// `GET /api/v3/exchangeInfo`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolInfo {
    pub symbol: String,
    pub status: String,
    pub base_asset: String,
    pub quote_asset: String,
    pub base_asset_precision: u32,
    pub quote_asset_precision: u32,
    #[serde(default)]
    pub filters: Vec<SymbolFilter>,
}

/// Trading filters; only the lot size matters here.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "LOT_SIZE", rename_all = "camelCase")]
    LotSize {
        min_qty: Decimal,
        max_qty: Decimal,
        step_size: Decimal,
    },
    #[serde(other)]
    Other,
}

impl SymbolInfo {
    fn lot_size(&self) -> Option<(Decimal, Decimal)> {
        self.filters.iter().find_map(|filter| match filter {
            SymbolFilter::LotSize {
                min_qty, step_size, ..
            } => Some((*min_qty, *step_size)),
            SymbolFilter::Other => None,
        })
    }

    fn pair_settings(&self) -> PairSettings {
        let mut settings =
            PairSettings::new(CurrencyPair::new(self.base_asset.as_str(), self.quote_asset.as_str()));
        settings.base_precision = self.base_asset_precision;
        settings.quote_precision = self.quote_asset_precision;

        if let Some((min_qty, step_size)) = self.lot_size() {
            settings.min_volume = min_qty;
            if !step_size.is_zero() {
                settings.base_precision = step_size.normalize().scale();
            }
        }
        settings
    }
}

impl ExchangeInfo {
    /// Venue settings covering every symbol currently trading.
    pub fn into_settings(self, taker_fee: Fraction) -> ExchangeSettings {
        let pairs = self
            .symbols
            .iter()
            .filter(|symbol| symbol.status == "TRADING")
            .map(SymbolInfo::pair_settings)
            .collect();

        ExchangeSettings::new(taker_fee, pairs)
    }
}

/// `GET /api/v3/depth`. Levels arrive as `[price, quantity]` string pairs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Depth {
    pub last_update_id: u64,
    pub bids: Vec<(Decimal, Decimal)>,
    pub asks: Vec<(Decimal, Decimal)>,
}

impl Depth {
    pub fn into_orderbook(self, pair: CurrencyPair) -> Orderbook {
        let levels = |raw: Vec<(Decimal, Decimal)>| {
            raw.into_iter()
                .map(|(price, volume)| PriceLevel::new(price, volume))
                .collect()
        };
        Orderbook::with_levels(pair, levels(self.bids), levels(self.asks))
    }
}

/// `GET /api/v3/account`.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub balances: Vec<Balance>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

impl Account {
    /// Positions holding the free (tradeable) amount of each asset.
    pub fn into_portfolio(self, exchange: &str) -> Portfolio {
        Portfolio::new(
            self.balances
                .into_iter()
                .filter(|balance| !balance.free.is_zero())
                .map(|balance| Position::new(exchange, balance.asset, balance.free))
                .collect(),
        )
    }
}

/// `POST /api/v3/order` with `newOrderRespType=RESULT`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub symbol: String,
    pub order_id: i64,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    pub status: String,
    pub transact_time: i64,
}

impl OrderAck {
    pub fn into_dispatched(self, exchange: &str, side: OrderSide) -> OrderDispatched {
        OrderDispatched {
            exchange: exchange.to_string(),
            order_id: self.order_id.to_string(),
            side,
            accepted_volume: self.orig_qty,
            executed_volume: self.executed_qty,
            dispatched_at: Utc
                .timestamp_millis_opt(self.transact_time)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub code: i64,
    pub msg: String,
}

impl From<ApiErrorResponse> for ExchangeError {
    fn from(body: ApiErrorResponse) -> Self {
        match body.code {
            -1022 | -2014 | -2015 => Self::AuthFailed(body.msg),
            -2010 => Self::OrderRejected(body.msg),
            code => Self::Api { code, msg: body.msg },
        }
    }
}
