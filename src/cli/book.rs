//! Top-of-book display.

use std::path::Path;
use std::sync::Arc;

use tabled::{Table, Tabled};

use super::{output, BookArgs};
use crate::config::Config;
use crate::domain::{Orderbook, PortfolioManager};
use crate::error::Result;
use crate::exchange::ExchangeFactory;

#[derive(Tabled)]
struct LevelRow {
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Volume")]
    volume: String,
}

/// Asks above bids, best levels nearest the middle.
fn rows(book: &Orderbook, depth: usize) -> Vec<LevelRow> {
    let level = |side, price: rust_decimal::Decimal, volume: rust_decimal::Decimal| LevelRow {
        side,
        price: price.normalize().to_string(),
        volume: volume.normalize().to_string(),
    };

    let asks = book
        .asks()
        .iter()
        .take(depth)
        .rev()
        .map(|l| level("ask", l.price(), l.volume()));
    let bids = book
        .bids()
        .iter()
        .take(depth)
        .map(|l| level("bid", l.price(), l.volume()));
    asks.chain(bids).collect()
}

pub async fn execute(config_path: &Path, args: &BookArgs) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    let factory = ExchangeFactory::new(config, Arc::new(PortfolioManager::new()));
    let exchange = factory.build_exchange(&args.venue).await?;
    let book = exchange.get_orderbook(&args.pair).await?;

    output::section(&format!("{} {}", exchange.name(), book.pair()));
    if book.bids().is_empty() && book.asks().is_empty() {
        output::warn("Book is empty");
        return Ok(());
    }
    output::table(&Table::new(rows(&book, args.depth)).to_string());
    if let Some(spread) = book.spread() {
        output::key_value("Spread", spread.normalize());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CurrencyPair, PriceLevel};
    use rust_decimal_macros::dec;

    #[test]
    fn asks_are_listed_above_bids() {
        let book = Orderbook::with_levels(
            CurrencyPair::new("ETH", "BTC"),
            vec![
                PriceLevel::new(dec!(0.050), dec!(1)),
                PriceLevel::new(dec!(0.049), dec!(2)),
            ],
            vec![
                PriceLevel::new(dec!(0.051), dec!(3)),
                PriceLevel::new(dec!(0.052), dec!(4)),
            ],
        );
        let rows = rows(&book, 1);

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].side, rows[0].price.as_str()), ("ask", "0.051"));
        assert_eq!((rows[1].side, rows[1].price.as_str()), ("bid", "0.05"));
    }
}
