//! Venue acknowledgement for a posted order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OrderSide, Volume};

/// Acknowledgement returned once a venue accepted an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDispatched {
    /// Venue that accepted the order.
    pub exchange: String,
    /// Venue-assigned order identifier.
    pub order_id: String,
    /// Side of the accepted order.
    pub side: OrderSide,
    /// Base volume the venue accepted.
    pub accepted_volume: Volume,
    /// Base volume already executed at acknowledgement time.
    pub executed_volume: Volume,
    /// When the acknowledgement was received.
    pub dispatched_at: DateTime<Utc>,
}

impl OrderDispatched {
    /// Returns true if the venue executed the whole accepted volume.
    #[must_use]
    pub fn is_fully_executed(&self) -> bool {
        !self.accepted_volume.is_zero() && self.executed_volume >= self.accepted_volume
    }
}
