//! Build venues and report the portfolio they forwarded.

use std::path::Path;
use std::sync::Arc;

use tabled::{Table, Tabled};

use super::output;
use crate::config::Config;
use crate::domain::{PortfolioManager, PortfolioState};
use crate::error::Result;
use crate::exchange::ExchangeFactory;

#[derive(Tabled)]
struct PositionRow {
    #[tabled(rename = "Venue")]
    venue: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn rows(state: &PortfolioState) -> Vec<PositionRow> {
    state
        .positions()
        .map(|position| PositionRow {
            venue: position.exchange().to_string(),
            currency: position.currency().to_string(),
            amount: position.amount().normalize().to_string(),
        })
        .collect()
}

/// Build `venues` (or every configured venue) and print the portfolio.
///
/// Fails with the first construction error when no venue could be built.
pub async fn execute(config_path: &Path, venues: &[String]) -> Result<()> {
    let config = Config::load(config_path)?;
    config.init_logging();

    let names: Vec<String> = if venues.is_empty() {
        config.venue_names().map(str::to_string).collect()
    } else {
        venues.to_vec()
    };

    let manager = Arc::new(PortfolioManager::new());
    let factory = ExchangeFactory::new(config, Arc::clone(&manager));

    output::section("Venues");
    let mut built = 0;
    let mut first_error = None;
    for name in &names {
        match factory.build_exchange(name).await {
            Ok(exchange) => {
                built += 1;
                output::ok(&format!(
                    "{} ({} pairs enabled)",
                    exchange.name(),
                    exchange.pairs_enabled().len()
                ));
            }
            Err(e) => {
                output::error(&format!("{name}: {e}"));
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    if built == 0 {
        if let Some(e) = first_error {
            return Err(e);
        }
        output::warn("No venues configured");
        return Ok(());
    }

    output::section("Portfolio");
    let state = manager.snapshot();
    if state.is_empty() {
        output::warn("No positions reported");
    } else {
        output::table(&Table::new(rows(&state)).to_string());
    }
    Ok(())
}
