//! Command-line interface definitions.

pub mod book;
pub mod connect;
pub mod output;
pub mod quote;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::domain::{CurrencyPair, OrderSide};
use crate::error::Result;

/// Crossbook - venue-agnostic order model and exchange access.
#[derive(Parser, Debug)]
#[command(name = "crossbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an order and its matching counter-order
    Quote(QuoteArgs),

    /// Build venues and show the aggregated portfolio
    Connect(ConnectArgs),

    /// Show the top of a venue's order book
    Book(BookArgs),
}

/// Arguments for the `quote` subcommand.
#[derive(Parser, Debug)]
pub struct QuoteArgs {
    /// Order side (bid/buy or ask/sell)
    #[arg(long)]
    pub side: OrderSide,

    /// Limit price in quote currency per unit of base
    #[arg(long)]
    pub price: Decimal,

    /// Order volume, in base currency unless --quote is given
    #[arg(long)]
    pub volume: Decimal,

    /// Interpret --volume as a quote-currency volume
    #[arg(long)]
    pub quote: bool,
}

/// Arguments for the `connect` subcommand.
#[derive(Parser, Debug)]
pub struct ConnectArgs {
    /// Venues to build; all configured venues when omitted
    pub venues: Vec<String>,
}

/// Arguments for the `book` subcommand.
#[derive(Parser, Debug)]
pub struct BookArgs {
    /// Venue name
    pub venue: String,

    /// Pair, e.g. ETH_BTC
    pub pair: CurrencyPair,

    /// Levels to show per side
    #[arg(long, default_value_t = 5)]
    pub depth: usize,
}

/// Run the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Quote(args) => quote::execute(&args),
        Commands::Connect(args) => connect::execute(&cli.config, &args.venues).await,
        Commands::Book(args) => book::execute(&cli.config, &args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_quote_command() {
        let cli = Cli::try_parse_from([
            "crossbook", "quote", "--side", "sell", "--price", "0.05", "--volume", "2",
        ])
        .unwrap();

        match cli.command {
            Commands::Quote(args) => {
                assert_eq!(args.side, OrderSide::Ask);
                assert_eq!(args.price, dec!(0.05));
                assert_eq!(args.volume, dec!(2));
                assert!(!args.quote);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_side() {
        assert!(Cli::try_parse_from([
            "crossbook", "quote", "--side", "hold", "--price", "1", "--volume", "1",
        ])
        .is_err());
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["crossbook", "connect", "--config", "other.toml", "paper"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Commands::Connect(ConnectArgs { ref venues }) if venues == &["paper"]));
    }

    #[test]
    fn book_parses_pair() {
        let cli = Cli::try_parse_from(["crossbook", "book", "paper", "eth/btc"]).unwrap();
        match cli.command {
            Commands::Book(args) => {
                assert_eq!(args.pair, CurrencyPair::new("ETH", "BTC"));
                assert_eq!(args.depth, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
