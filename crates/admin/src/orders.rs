//! Cross-user order management.
//!
//! Orders live embedded in each user record, so "all orders" is a flatten
//! over the user list and a status update is a rewrite of the owning user's
//! whole order array. The store offers no sub-document addressing, so the
//! array rewrite is the only way to touch one order.

use tracing::info;

use ecru_core::{Email, Order, OrderId, OrderStatus, User, UserId};
use ecru_store::{RecordStore, users::Users};

use crate::error::AdminError;
use crate::guard::AdminGuard;

/// An order joined with the identity that placed it.
#[derive(Debug, Clone)]
pub struct AdminOrder {
    pub user_id: UserId,
    pub user_name: String,
    pub user_email: Email,
    pub order: Order,
}

/// Keep only the orders in `status`. Pure; preserves input order.
#[must_use]
pub fn filter_by_status(orders: &[AdminOrder], status: OrderStatus) -> Vec<AdminOrder> {
    orders
        .iter()
        .filter(|o| o.order.status == status)
        .cloned()
        .collect()
}

/// Order operations gated on an [`AdminGuard`].
pub struct OrderAdmin<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> OrderAdmin<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Every order across every account, flattened newest-file-order.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Store`] when the user list cannot be fetched.
    pub async fn all_orders(&self, _guard: &AdminGuard) -> Result<Vec<AdminOrder>, AdminError> {
        let users = Users::new(self.store).list().await?;
        Ok(flatten_orders(users))
    }

    /// Set one order's status, leaving every other field and every other
    /// order in the owning account untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::OrderNotFound`] when no account holds the
    /// order, or [`AdminError::Store`] when the rewrite fails.
    pub async fn update_order_status(
        &self,
        guard: &AdminGuard,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), AdminError> {
        let users = Users::new(self.store);
        let owner = users
            .list()
            .await?
            .into_iter()
            .find(|u| u.orders.iter().any(|o| &o.id == order_id))
            .ok_or_else(|| AdminError::OrderNotFound(order_id.clone()))?;

        let updated: Vec<Order> = owner
            .orders
            .into_iter()
            .map(|mut o| {
                if &o.id == order_id {
                    o.status = status;
                }
                o
            })
            .collect();

        users
            .patch(&owner.id, serde_json::json!({ "orders": updated }))
            .await?;
        info!(
            admin = %guard.acting_user(),
            %order_id,
            %status,
            "order status updated"
        );
        Ok(())
    }
}

fn flatten_orders(users: Vec<User>) -> Vec<AdminOrder> {
    users
        .into_iter()
        .flat_map(|u| {
            let (id, name, email) = (u.id, u.name, u.email);
            u.orders.into_iter().map(move |order| AdminOrder {
                user_id: id.clone(),
                user_name: name.clone(),
                user_email: email.clone(),
                order,
            })
        })
        .collect()
}
