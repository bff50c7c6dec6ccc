//! User account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::order::Order;
use crate::models::product::{CartLine, Product};
use crate::types::{Email, Role, UserId};

/// A user account as stored in the `users` collection.
///
/// The remote store is the source of truth; clients hold a cached copy per
/// session. Cart, wishlist, and orders live on the user record itself and
/// are persisted wholesale on every mutation.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    /// Stored in the clear: the store's credential check is an exact-match
    /// query on this field. Redacted from `Debug`.
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_block: bool,
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default)]
    pub wishlist: Vec<Product>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether this account may use the admin surface.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("role", &self.role)
            .field("is_block", &self.is_block)
            .field("cart", &self.cart.len())
            .field("wishlist", &self.wishlist.len())
            .field("orders", &self.orders.len())
            .finish_non_exhaustive()
    }
}
