#![allow(dead_code)]

pub mod http;
pub mod provider;

use chrono::Utc;
use crossbook::domain::{CurrencyPair, Hit, Order, OrderSide, Orderbook, PriceLevel};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub fn eth_btc() -> CurrencyPair {
    CurrencyPair::new("ETH", "BTC")
}

pub fn ltc_btc() -> CurrencyPair {
    CurrencyPair::new("LTC", "BTC")
}

/// Two-level ETH_BTC book with a 0.001 spread.
pub fn eth_btc_book() -> Orderbook {
    Orderbook::with_levels(
        eth_btc(),
        vec![
            PriceLevel::new(dec!(0.050), dec!(3)),
            PriceLevel::new(dec!(0.049), dec!(5)),
        ],
        vec![
            PriceLevel::new(dec!(0.051), dec!(2)),
            PriceLevel::new(dec!(0.052), dec!(4)),
        ],
    )
}

pub fn hit(exchange: &str, pair: CurrencyPair, side: OrderSide, price: Decimal, volume: Decimal) -> Hit {
    Hit {
        exchange: exchange.to_string(),
        pair,
        side,
        price,
        volume,
        observed_at: Utc::now(),
    }
}

/// Order routed to `pair` through a synthetic hit.
pub fn routed_order(exchange: &str, pair: CurrencyPair, side: OrderSide, price: Decimal, volume: Decimal) -> Order {
    Order::for_hit(hit(exchange, pair, side, price, volume)).expect("valid order")
}
