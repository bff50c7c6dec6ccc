//! The entity-collection synchronizer.
//!
//! Cart, wishlist, and admin order editing all share one pattern: keep a
//! local copy of a user-owned array field, apply a mutation locally first,
//! then persist the whole updated array back with a single PATCH on the
//! user record.
//!
//! Two deliberate departures from the legacy behavior this replaces:
//!
//! - A failed persist rolls the optimistic local change back and returns the
//!   error, instead of silently leaving local and remote state diverged.
//! - Without a bound user there is no sync target: mutations are skipped
//!   entirely and nothing is queued.
//!
//! Concurrent `load` calls are not de-duplicated; the last response wins.
//! Likewise two in-flight mutations race and the last persist wins remotely.
//! Both are tolerated because a session has a single interactive user.

use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use ecru_core::{CartLine, Order, Product, User, UserId};

use crate::error::StoreError;
use crate::record::RecordStore;
use crate::users::Users;

/// A user-owned array field that the synchronizer can manage.
pub trait UserField {
    /// Element type of the field.
    type Item: Clone + Serialize + DeserializeOwned + Send + Sync;

    /// Field name as stored on the user record.
    const NAME: &'static str;

    /// Extract the field from a freshly fetched user record.
    fn extract(user: &User) -> &[Self::Item];
}

/// The shopping cart (`cart` field).
pub struct CartField;

impl UserField for CartField {
    type Item = CartLine;
    const NAME: &'static str = "cart";

    fn extract(user: &User) -> &[CartLine] {
        &user.cart
    }
}

/// The wishlist (`wishlist` field).
pub struct WishlistField;

impl UserField for WishlistField {
    type Item = Product;
    const NAME: &'static str = "wishlist";

    fn extract(user: &User) -> &[Product] {
        &user.wishlist
    }
}

/// The order history (`orders` field). Used by checkout and by the admin
/// status-update flow.
pub struct OrdersField;

impl UserField for OrdersField {
    type Item = Order;
    const NAME: &'static str = "orders";

    fn extract(user: &User) -> &[Order] {
        &user.orders
    }
}

/// Synchronizer lifecycle. There is no error state: failures are transient
/// and the synchronizer always returns to `Ready` with the last
/// successfully persisted items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No load has been attempted for the current identity.
    Uninitialized,
    /// Initial load in flight.
    Loading,
    /// Local cache populated; every successful load or mutate lands here.
    Ready,
}

/// Local cache of one user-owned collection, persisted remotely on every
/// mutation.
pub struct CollectionSync<F: UserField, S> {
    store: S,
    user_id: Option<UserId>,
    items: Vec<F::Item>,
    state: SyncState,
    _field: PhantomData<F>,
}

impl<F: UserField, S: RecordStore> CollectionSync<F, S> {
    /// Create an unbound synchronizer.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            user_id: None,
            items: Vec::new(),
            state: SyncState::Uninitialized,
            _field: PhantomData,
        }
    }

    /// Bind to an identity (or unbind on logout). Clears the local cache;
    /// callers invoke [`load`](Self::load) after binding to a user.
    pub fn bind(&mut self, user_id: Option<UserId>) {
        self.user_id = user_id;
        self.items.clear();
        self.state = SyncState::Uninitialized;
    }

    /// The identity currently synced against, if any.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.state
    }

    /// The local cache.
    #[must_use]
    pub fn items(&self) -> &[F::Item] {
        &self.items
    }

    /// Empty the local cache without a remote write. For callers that have
    /// already persisted the emptied collection as part of a larger patch.
    pub fn reset_local(&mut self) {
        self.items.clear();
        self.state = SyncState::Ready;
    }

    /// Refetch the owning user's record and replace the local cache with its
    /// `F::NAME` field. A missing field reads as empty. Without a bound user
    /// this is a no-op that leaves an empty, `Ready` cache.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the fetch fails; the previous cache is
    /// kept and the state returns to `Ready`.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        let Some(user_id) = self.user_id.clone() else {
            self.items.clear();
            self.state = SyncState::Ready;
            return Ok(());
        };

        self.state = SyncState::Loading;
        match Users::new(&self.store).get(&user_id).await {
            Ok(user) => {
                self.items = F::extract(&user).to_vec();
                self.state = SyncState::Ready;
                debug!(field = F::NAME, count = self.items.len(), "loaded collection");
                Ok(())
            }
            Err(err) => {
                self.state = SyncState::Ready;
                warn!(field = F::NAME, error = %err, "collection load failed");
                Err(err)
            }
        }
    }

    /// Apply `transform` to the local cache, then persist the full updated
    /// collection with `PATCH users/{id} {field: items}`.
    ///
    /// The local apply is optimistic; if the persist fails the local change
    /// is rolled back before the error is returned, so the cache always
    /// reflects the last successfully persisted state.
    ///
    /// Without a bound user there is no sync target and the transform is
    /// skipped entirely.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the persist fails.
    pub async fn mutate<T>(&mut self, transform: T) -> Result<(), StoreError>
    where
        T: FnOnce(&mut Vec<F::Item>),
    {
        let Some(user_id) = self.user_id.clone() else {
            debug!(field = F::NAME, "no sync target, mutation skipped");
            return Ok(());
        };

        let previous = self.items.clone();
        transform(&mut self.items);

        let body = json!({ F::NAME: &self.items });
        match Users::new(&self.store).patch(&user_id, body).await {
            Ok(()) => {
                self.state = SyncState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(field = F::NAME, error = %err, "persist failed, rolling back");
                self.items = previous;
                self.state = SyncState::Ready;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::record::USERS;
    use serde_json::json;

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::new();
        let record = json!({
            "id": "u1",
            "name": "Ada",
            "email": "ada@example.com",
            "password": "pw",
            "cart": [
                {
                    "id": "p1",
                    "name": "Red Top",
                    "price": 10,
                    "category": "Tops",
                    "images": [],
                    "isActive": true,
                    "quantity": 2
                }
            ]
        });
        store.seed(USERS, record).await;
        store
    }

    #[tokio::test]
    async fn test_load_replaces_cache() {
        let store = MemoryStore::new();
        store
            .seed(
                USERS,
                json!({
                    "id": "u1", "name": "Ada", "email": "a@b.c", "password": "pw",
                    "cart": [{
                        "id": "p1", "name": "Red Top", "price": 10,
                        "category": "Tops", "quantity": 2
                    }]
                }),
            )
            .await;

        let mut sync: CollectionSync<CartField, _> = CollectionSync::new(store);
        assert_eq!(sync.state(), SyncState::Uninitialized);

        sync.bind(Some(UserId::new("u1")));
        sync.load().await.expect("load");
        assert_eq!(sync.state(), SyncState::Ready);
        assert_eq!(sync.items().len(), 1);
        assert_eq!(sync.items()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_load_without_user_is_empty_ready() {
        let store = MemoryStore::new();
        let mut sync: CollectionSync<CartField, _> = CollectionSync::new(store);
        sync.load().await.expect("no-op load");
        assert_eq!(sync.state(), SyncState::Ready);
        assert!(sync.items().is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_defaults_to_empty() {
        let store = MemoryStore::new();
        store
            .seed(
                USERS,
                json!({"id": "u1", "name": "Ada", "email": "a@b.c", "password": "pw"}),
            )
            .await;

        let mut sync: CollectionSync<WishlistField, _> = CollectionSync::new(store);
        sync.bind(Some(UserId::new("u1")));
        sync.load().await.expect("load");
        assert!(sync.items().is_empty());
    }

    #[tokio::test]
    async fn test_mutate_persists_full_collection() {
        let store = MemoryStore::new();
        store
            .seed(
                USERS,
                json!({"id": "u1", "name": "Ada", "email": "a@b.c", "password": "pw", "cart": []}),
            )
            .await;

        let mut sync: CollectionSync<CartField, _> = CollectionSync::new(store.clone());
        sync.bind(Some(UserId::new("u1")));
        sync.load().await.expect("load");

        sync.mutate(|items| {
            items.push(serde_json::from_value(json!({
                "id": "p1", "name": "Red Top", "price": 10,
                "category": "Tops", "quantity": 1
            })).expect("line"));
        })
        .await
        .expect("mutate");

        let record = store.fetch_record(USERS, "u1").await.expect("record");
        assert_eq!(record["cart"].as_array().expect("array").len(), 1);
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back() {
        let store = seeded_store().await;
        let mut sync: CollectionSync<CartField, _> = CollectionSync::new(store.clone());
        sync.bind(Some(UserId::new("u1")));
        sync.load().await.expect("load");
        assert_eq!(sync.items().len(), 1);

        store.set_fail_writes(true);
        let err = sync.mutate(Vec::clear).await.expect_err("persist fails");
        assert!(matches!(err, StoreError::Status { status: 503, .. }));

        // Optimistic clear was rolled back; state machine is back to Ready.
        assert_eq!(sync.items().len(), 1);
        assert_eq!(sync.state(), SyncState::Ready);
    }

    #[tokio::test]
    async fn test_mutate_without_user_skips_transform() {
        let store = MemoryStore::new();
        let mut sync: CollectionSync<CartField, _> = CollectionSync::new(store);
        sync.mutate(|items| {
            items.push(serde_json::from_value(json!({
                "id": "p1", "name": "Red Top", "price": 10,
                "category": "Tops", "quantity": 1
            })).expect("line"));
        })
        .await
        .expect("skipped");
        assert!(sync.items().is_empty(), "nothing queued without a user");
    }

    #[tokio::test]
    async fn test_bind_clears_previous_identity_cache() {
        let store = seeded_store().await;
        let mut sync: CollectionSync<CartField, _> = CollectionSync::new(store);
        sync.bind(Some(UserId::new("u1")));
        sync.load().await.expect("load");
        assert!(!sync.items().is_empty());

        sync.bind(None);
        assert!(sync.items().is_empty());
        assert_eq!(sync.state(), SyncState::Uninitialized);
    }
}
