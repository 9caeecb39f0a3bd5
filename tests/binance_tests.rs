//! Binance venue against a local HTTP stub.

mod support;

use std::sync::Arc;

use crossbook::config::Config;
use crossbook::domain::{Currency, OrderSide, PortfolioManager};
use crossbook::error::{Error, ExchangeError};
use crossbook::exchange::{Exchange, ExchangeFactory};
use rust_decimal_macros::dec;

use support::http::{MockServer, Route};
use support::{eth_btc, routed_order};

const EXCHANGE_INFO: &str = r#"{
    "timezone": "UTC",
    "serverTime": 1565246363776,
    "symbols": [{
        "symbol": "ETHBTC",
        "status": "TRADING",
        "baseAsset": "ETH",
        "baseAssetPrecision": 8,
        "quoteAsset": "BTC",
        "quotePrecision": 8,
        "quoteAssetPrecision": 8,
        "filters": [
            {"filterType": "PRICE_FILTER", "minPrice": "0.00000100", "maxPrice": "100.00000000", "tickSize": "0.00000100"},
            {"filterType": "LOT_SIZE", "minQty": "0.00100000", "maxQty": "100000.00000000", "stepSize": "0.00100000"},
            {"filterType": "MAX_NUM_ORDERS", "maxNumOrders": 200}
        ]
    }]
}"#;

const DEPTH: &str = r#"{
    "lastUpdateId": 1027024,
    "bids": [["0.05000000", "3.00000000"], ["0.04900000", "5.00000000"]],
    "asks": [["0.05100000", "2.00000000"]]
}"#;

const ACCOUNT: &str = r#"{
    "makerCommission": 15,
    "canTrade": true,
    "balances": [
        {"asset": "BTC", "free": "1.25000000", "locked": "0.00000000"},
        {"asset": "ETH", "free": "0.00000000", "locked": "2.00000000"}
    ]
}"#;

const ORDER_ACK: &str = r#"{
    "symbol": "ETHBTC",
    "orderId": 4242,
    "orderListId": -1,
    "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP",
    "transactTime": 1507725176595,
    "price": "0.05100000",
    "origQty": "1.23400000",
    "executedQty": "1.23400000",
    "cummulativeQuoteQty": "0.06293400",
    "status": "FILLED",
    "timeInForce": "IOC",
    "type": "LIMIT",
    "side": "BUY"
}"#;

fn happy_routes() -> Vec<Route> {
    vec![
        Route::ok("GET", "/api/v3/exchangeInfo", EXCHANGE_INFO),
        Route::ok("GET", "/api/v3/depth", DEPTH),
        Route::ok("GET", "/api/v3/account", ACCOUNT),
        Route::ok("POST", "/api/v3/order", ORDER_ACK),
    ]
}

fn config(server: &MockServer, credentials: bool) -> Config {
    let mut toml = format!(
        "[exchanges.binance]\npairs_enabled = \"ETH_BTC\"\nbase_url = \"{}\"\n",
        server.base_url
    );
    if credentials {
        toml.push_str("api_key = \"test-key\"\napi_secret = \"test-secret\"\n");
    }
    Config::parse(&toml).unwrap()
}

async fn build(server: &MockServer, credentials: bool) -> (Exchange, Arc<PortfolioManager>) {
    let manager = Arc::new(PortfolioManager::new());
    let factory = ExchangeFactory::new(config(server, credentials), Arc::clone(&manager));
    let exchange = factory.build_exchange("Binance").await.unwrap();
    (exchange, manager)
}

#[tokio::test]
async fn builds_from_public_and_signed_endpoints() {
    let server = MockServer::start(happy_routes()).await;
    let (exchange, manager) = build(&server, true).await;

    let rules = exchange.settings().pair(&eth_btc()).unwrap();
    assert_eq!(rules.base_precision, 3);
    assert_eq!(rules.min_volume, dec!(0.001));
    assert_eq!(manager.balance("binance", &Currency::new("BTC")), dec!(1.25));
    assert!(manager.snapshot().position("binance", &Currency::new("ETH")).is_none());

    let account = server.requests_to("/api/v3/account");
    assert_eq!(account.len(), 1);
    assert_eq!(account[0].header("x-mbx-apikey").as_deref(), Some("test-key"));
    assert!(account[0].query().contains("timestamp="));
    assert!(account[0].query().contains("&signature="));
}

#[tokio::test]
async fn orderbook_is_fetched_by_symbol() {
    let server = MockServer::start(happy_routes()).await;
    let (exchange, _) = build(&server, false).await;

    let book = exchange.get_orderbook(&eth_btc()).await.unwrap();

    assert_eq!(book.best_bid().unwrap().price(), dec!(0.05));
    assert_eq!(book.best_ask().unwrap().volume(), dec!(2));
    let depth = server.requests_to("/api/v3/depth");
    assert!(depth[0].query().contains("symbol=ETHBTC"), "{}", depth[0].target);
}

#[tokio::test]
async fn order_quantity_is_cut_to_lot_size() {
    let server = MockServer::start(happy_routes()).await;
    let (exchange, _) = build(&server, true).await;

    let order = routed_order("binance", eth_btc(), OrderSide::Bid, dec!(0.051), dec!(1.23456789));
    let dispatched = exchange.post_order(&order).await.unwrap();

    assert_eq!(dispatched.order_id, "4242");
    assert!(dispatched.is_fully_executed());

    let posted = server.requests_to("/api/v3/order");
    assert_eq!(posted.len(), 1);
    let query = posted[0].query();
    assert!(query.contains("side=BUY"), "{query}");
    assert!(query.contains("type=LIMIT"), "{query}");
    assert!(query.contains("timeInForce=IOC"), "{query}");
    assert!(query.contains("quantity=1.234&"), "{query}");
    assert!(query.contains("price=0.051&"), "{query}");
}

#[tokio::test]
async fn missing_credentials_fail_before_any_request() {
    let server = MockServer::start(happy_routes()).await;
    let (exchange, manager) = build(&server, false).await;

    // Construction survives the portfolio failure.
    assert!(manager.snapshot().is_empty());
    assert!(server.requests_to("/api/v3/account").is_empty());

    let order = routed_order("binance", eth_btc(), OrderSide::Ask, dec!(0.05), dec!(1));
    let err = exchange.post_order(&order).await.unwrap_err();

    assert!(matches!(err, Error::Exchange(ExchangeError::MissingCredentials(_))));
    assert!(server.requests_to("/api/v3/order").is_empty());
}

#[tokio::test]
async fn venue_rejection_maps_to_order_rejected() {
    let mut routes = happy_routes();
    routes[3] = Route::ok(
        "POST",
        "/api/v3/order",
        r#"{"code": -2010, "msg": "Account has insufficient balance for requested action."}"#,
    )
    .status(400);
    let server = MockServer::start(routes).await;
    let (exchange, _) = build(&server, true).await;

    let order = routed_order("binance", eth_btc(), OrderSide::Bid, dec!(0.051), dec!(1));
    let err = exchange.post_order(&order).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Exchange(ExchangeError::OrderRejected(ref msg)) if msg.contains("insufficient balance")
    ));
}

#[tokio::test]
async fn rejected_key_maps_to_auth_failure() {
    let mut routes = happy_routes();
    routes[2] = Route::ok("GET", "/api/v3/account", r#"{"code": -2015, "msg": "Invalid API-key, IP, or permissions for action."}"#)
        .status(401);
    let server = MockServer::start(routes).await;
    let (exchange, manager) = build(&server, true).await;

    assert!(manager.snapshot().is_empty());
    let err = exchange.get_portfolio().await.unwrap_err();
    assert!(matches!(err, Error::Exchange(ExchangeError::AuthFailed(_))));
}

#[tokio::test]
async fn unavailable_settings_abort_construction() {
    let server = MockServer::start(vec![
        Route::ok("GET", "/api/v3/exchangeInfo", "upstream down").status(502),
    ])
    .await;
    let factory = ExchangeFactory::new(config(&server, true), Arc::new(PortfolioManager::new()));

    let err = factory.build_exchange("binance").await.unwrap_err();

    assert!(matches!(err, Error::Exchange(ExchangeError::Api { code: 502, .. })));
    assert!(server.requests_to("/api/v3/account").is_empty());
}
