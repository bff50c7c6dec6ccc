//! Order records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::product::CartLine;
use crate::types::{OrderId, OrderStatus, Price};

/// Shipping address captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

/// An order, created once at checkout.
///
/// Only the status is mutated afterwards (by the admin console); everything
/// else is an immutable snapshot. Defaults normalize the partially-populated
/// records older store data contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub total: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingAddress>,
    /// Display label only; no payment processor is ever contacted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    /// RFC 3339 timestamp as recorded by the store. Kept as the raw string
    /// because legacy records hold unparseable values; see [`Self::placed_at`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Order {
    /// The order date, if present and parseable.
    #[must_use]
    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.date.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Recompute the total from the line items.
    ///
    /// The stored `total` is client-written and therefore untrusted; callers
    /// that care about integrity compare it against this.
    #[must_use]
    pub fn computed_total(&self) -> Price {
        self.items.iter().map(CartLine::line_total).sum()
    }
}
