//! Wishlist synchronizer.

use tracing::info;

use ecru_core::{Product, ProductId, UserId};
use ecru_store::{CollectionSync, RecordStore, StoreError, SyncState, WishlistField};

use crate::cart::{CartAddOutcome, CartMutator};

/// Result of a wishlist add.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistAddOutcome {
    Added,
    AlreadyInWishlist,
}

/// Errors from moving a wishlist item into the cart.
#[derive(Debug, thiserror::Error)]
pub enum MoveToCartError {
    #[error("product {0} is not in the wishlist")]
    NotInWishlist(ProductId),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The wishlist synchronizer. Stores full product snapshots, like the cart,
/// so the wishlist renders without extra catalog fetches.
pub struct WishlistSync<S: RecordStore> {
    sync: CollectionSync<WishlistField, S>,
}

impl<S: RecordStore> WishlistSync<S> {
    /// Create an unbound wishlist.
    pub const fn new(store: S) -> Self {
        Self {
            sync: CollectionSync::new(store),
        }
    }

    /// Bind to an identity (or unbind on logout).
    pub fn bind(&mut self, user_id: Option<UserId>) {
        self.sync.bind(user_id);
    }

    /// Reload the wishlist from the owning user's record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the fetch fails.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.sync.load().await
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SyncState {
        self.sync.state()
    }

    /// Wishlisted products.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        self.sync.items()
    }

    /// Add a product, unless its id is already present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the persist fails (the local change is
    /// rolled back).
    pub async fn add(&mut self, product: Product) -> Result<WishlistAddOutcome, StoreError> {
        let id = product.id.clone();
        if self.products().iter().any(|p| p.id == id) {
            info!(product_id = %id, "item already in wishlist");
            return Ok(WishlistAddOutcome::AlreadyInWishlist);
        }

        self.sync.mutate(|products| products.push(product)).await?;
        Ok(WishlistAddOutcome::Added)
    }

    /// Remove the product with the given id, if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the persist fails (the local change is
    /// rolled back).
    pub async fn remove(&mut self, id: &ProductId) -> Result<(), StoreError> {
        self.sync.mutate(|products| products.retain(|p| p.id != *id)).await
    }

    /// Move a wishlisted product into the cart: add it through the shared
    /// [`CartMutator`] path, then remove it here. An `AlreadyInCart` outcome
    /// still removes it from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns [`MoveToCartError::NotInWishlist`] for an unknown id, or the
    /// underlying [`StoreError`] from either persist.
    pub async fn move_to_cart<M: CartMutator>(
        &mut self,
        id: &ProductId,
        cart: &mut M,
    ) -> Result<CartAddOutcome, MoveToCartError> {
        let product = self
            .products()
            .iter()
            .find(|p| p.id == *id)
            .cloned()
            .ok_or_else(|| MoveToCartError::NotInWishlist(id.clone()))?;

        let outcome = cart.add_to_cart(product).await?;
        self.remove(id).await?;
        Ok(outcome)
    }
}
