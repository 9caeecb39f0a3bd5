//! Order resolution without touching any venue.

use rust_decimal::Decimal;
use serde_json::json;

use super::QuoteArgs;
use crate::domain::Order;
use crate::error::Result;

/// Resolve the order described by `args` and its counter-order.
pub fn resolve(args: &QuoteArgs) -> Result<(Order, Order)> {
    let order = if args.quote {
        let mut order = Order::new(args.side, args.price, Decimal::ZERO)?;
        order.set_quote_volume(args.volume)?;
        order
    } else {
        Order::new(args.side, args.price, args.volume)?
    };
    let counter = order.matching_counter_order();
    Ok((order, counter))
}

/// Print both orders as JSON.
pub fn execute(args: &QuoteArgs) -> Result<()> {
    let (order, counter) = resolve(args)?;
    let rendered = serde_json::to_string_pretty(&json!({
        "order": order,
        "counter_order": counter,
    }))?;
    println!("{rendered}");
    Ok(())
}
