//! Dashboard snapshot assembly and background refresh.

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use ecru_core::Price;
use ecru_store::{RecordStore, products::Products, users::Users};

use crate::analytics::{revenue_by_month, total_mismatches, total_revenue};
use crate::error::AdminError;
use crate::guard::AdminGuard;

/// One point-in-time view of the store, assembled from two collection reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub total_users: usize,
    pub total_products: usize,
    pub total_orders: usize,
    pub total_revenue: Price,
    /// January first, all years combined.
    pub monthly_revenue: [Price; 12],
}

impl DashboardSnapshot {
    /// Assemble a snapshot from live store data.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Store`] when either collection read fails; a
    /// snapshot is never assembled from partial data.
    pub async fn fetch<S: RecordStore>(
        store: &S,
        _guard: &AdminGuard,
    ) -> Result<Self, AdminError> {
        let users = Users::new(store).list().await?;
        let products = Products::new(store).list().await?;

        let orders: Vec<_> = users.iter().flat_map(|u| u.orders.clone()).collect();
        total_mismatches(&orders);

        Ok(Self {
            total_users: users.len(),
            total_products: products.len(),
            total_orders: orders.len(),
            total_revenue: total_revenue(&orders),
            monthly_revenue: revenue_by_month(&orders),
        })
    }
}

/// Background task refreshing a [`DashboardSnapshot`] on an interval.
///
/// Consumers watch the channel; `None` means no snapshot has succeeded yet.
/// A failed refresh logs and keeps the last good snapshot in place. Dropping
/// the poller aborts the task.
pub struct DashboardPoller {
    receiver: watch::Receiver<Option<DashboardSnapshot>>,
    handle: JoinHandle<()>,
}

impl DashboardPoller {
    /// Spawn the refresh task. The first refresh runs immediately, then
    /// every `interval`.
    #[must_use]
    pub fn spawn<S>(store: S, guard: AdminGuard, interval: std::time::Duration) -> Self
    where
        S: RecordStore + 'static,
    {
        let (sender, receiver) = watch::channel(None);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match DashboardSnapshot::fetch(&store, &guard).await {
                    Ok(snapshot) => {
                        debug!(
                            orders = snapshot.total_orders,
                            revenue = %snapshot.total_revenue,
                            "dashboard refreshed"
                        );
                        // Receivers outlive the poller only until Drop aborts
                        // us, so a closed channel just ends the loop.
                        if sender.send(Some(snapshot)).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(%err, "dashboard refresh failed, keeping last snapshot"),
                }
            }
        });
        Self { receiver, handle }
    }

    /// A fresh watch handle onto the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<DashboardSnapshot>> {
        self.receiver.clone()
    }
}

impl Drop for DashboardPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecru_core::{Role, User};
    use ecru_store::{MemoryStore, PRODUCTS, USERS};
    use serde_json::json;

    fn admin() -> AdminGuard {
        let user: User = serde_json::from_value(json!({
            "id": "root", "name": "Root", "email": "root@example.com",
            "password": "pw", "role": Role::Admin
        }))
        .expect("admin user");
        AdminGuard::verify(&user).expect("guard")
    }

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .seed(
                USERS,
                json!({
                    "id": "u1", "name": "Ada", "email": "ada@example.com", "password": "pw",
                    "orders": [
                        {"id": "o1", "total": "100", "date": "2026-02-01T00:00:00Z"},
                        {"id": "o2", "total": "40", "date": "not a date"},
                        {"id": "o3", "total": "60", "date": "2024-02-10T00:00:00Z"}
                    ]
                }),
            )
            .await;
        store
            .seed(
                PRODUCTS,
                json!({"id": "p1", "name": "Tee", "price": "10", "category": "Tops"}),
            )
            .await;
        store
    }

    #[tokio::test]
    async fn test_snapshot_counts_and_revenue() {
        let store = seeded().await;
        let snapshot = DashboardSnapshot::fetch(&store, &admin())
            .await
            .expect("snapshot");
        assert_eq!(snapshot.total_users, 1);
        assert_eq!(snapshot.total_products, 1);
        assert_eq!(snapshot.total_orders, 3);
        assert_eq!(snapshot.total_revenue, Price::from(200));
        assert_eq!(
            snapshot.monthly_revenue[1],
            Price::from(160),
            "February orders from every year land in one bucket"
        );
    }

    #[tokio::test]
    async fn test_poller_publishes_then_stops_on_drop() {
        let store = seeded().await;
        let poller = DashboardPoller::spawn(
            store,
            admin(),
            std::time::Duration::from_secs(3600),
        );
        let mut rx = poller.subscribe();

        rx.changed().await.expect("first snapshot");
        let snapshot = rx.borrow().clone().expect("some snapshot");
        assert_eq!(snapshot.total_orders, 3);

        drop(poller);
        assert!(rx.changed().await.is_err(), "sender gone after drop");
    }
}
