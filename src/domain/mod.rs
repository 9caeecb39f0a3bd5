//! Venue-agnostic domain types: the order model and what venues report.

mod dispatch;
pub mod error;
mod ids;
mod money;
mod order;
mod orderbook;
mod portfolio;
pub mod precision;
mod settings;

pub use dispatch::OrderDispatched;
pub use error::DomainError;
pub use ids::{Currency, CurrencyPair};
pub use money::{Fraction, Price, Volume};
pub use order::{Order, OrderSide, TAKER_FEE};
pub use orderbook::{Hit, Orderbook, PriceLevel};
pub use portfolio::{Portfolio, PortfolioManager, PortfolioState, Position};
pub use settings::{Credentials, ExchangeSettings, PairSettings};
