//! Shopping cart synchronizer.
//!
//! A thin, cart-shaped layer over [`CollectionSync`]: one line per product
//! id, quantities floored at 1, total price derived purely from the lines.

use std::future::Future;

use tracing::info;

use ecru_core::{CartLine, Price, Product, ProductId, UserId};
use ecru_store::{CartField, CollectionSync, RecordStore, StoreError, SyncState};

/// Result of an add: adding a product already in the cart is an
/// informational outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAddOutcome {
    Added,
    AlreadyInCart,
}

/// The one capability every add-to-cart call site depends on.
///
/// Checkout, wishlist move-to-cart, and the CLI all go through this trait,
/// so there is exactly one code path for cart mutations.
pub trait CartMutator {
    /// Current cart lines.
    fn lines(&self) -> &[CartLine];

    /// Append a quantity-1 snapshot of `product`, unless its id is already
    /// present.
    fn add_to_cart(
        &mut self,
        product: Product,
    ) -> impl Future<Output = Result<CartAddOutcome, StoreError>> + Send;

    /// Remove the line with the given product id, if present.
    fn remove(
        &mut self,
        id: &ProductId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Empty the cart and persist immediately.
    fn clear(&mut self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Empty the local lines without a remote write. Only for callers that
    /// have already persisted the emptied cart as part of a larger patch.
    fn reset_local(&mut self);

    /// Sum of `price * quantity` over the current lines.
    fn total_price(&self) -> Price {
        total_price(self.lines())
    }
}

/// Sum of `price * quantity` over cart lines.
///
/// Pure; recomputed from scratch wherever a total is needed rather than
/// maintained incrementally.
#[must_use]
pub fn total_price(lines: &[CartLine]) -> Price {
    lines.iter().map(CartLine::line_total).sum()
}

/// The cart synchronizer.
pub struct CartSync<S: RecordStore> {
    sync: CollectionSync<CartField, S>,
    remove_on_zero: bool,
}

impl<S: RecordStore> CartSync<S> {
    /// Create an unbound cart.
    pub const fn new(store: S) -> Self {
        Self {
            sync: CollectionSync::new(store),
            remove_on_zero: false,
        }
    }

    /// Opt in to removal-by-decrement: decrementing a quantity-1 line drops
    /// it instead of flooring at 1. Off by default; explicit removal is the
    /// only way lines disappear otherwise.
    pub fn set_remove_on_zero(&mut self, enabled: bool) {
        self.remove_on_zero = enabled;
    }

    /// Bind to an identity (or unbind on logout).
    pub fn bind(&mut self, user_id: Option<UserId>) {
        self.sync.bind(user_id);
    }

    /// Reload the cart from the owning user's record.
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

    /// Bump a line's quantity by one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the persist fails (the local change is
    /// rolled back).
    pub async fn increment_qty(&mut self, id: &ProductId) -> Result<(), StoreError> {
        self.sync
            .mutate(|lines| {
                for line in lines.iter_mut() {
                    if line.product.id == *id {
                        line.quantity = line.quantity.saturating_add(1);
                    }
                }
            })
            .await
    }

    /// Lower a line's quantity by one, floored at 1 unless removal-by-
    /// decrement was opted into.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the persist fails (the local change is
    /// rolled back).
    pub async fn decrement_qty(&mut self, id: &ProductId) -> Result<(), StoreError> {
        let remove_on_zero = self.remove_on_zero;
        self.sync
            .mutate(|lines| {
                for line in lines.iter_mut() {
                    if line.product.id == *id {
                        if remove_on_zero {
                            line.quantity = line.quantity.saturating_sub(1);
                        } else {
                            line.quantity = line.quantity.saturating_sub(1).max(1);
                        }
                    }
                }
                if remove_on_zero {
                    lines.retain(|line| line.quantity > 0);
                }
            })
            .await
    }

    /// Set or clear a line's size variant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the persist fails (the local change is
    /// rolled back).
    pub async fn set_size(
        &mut self,
        id: &ProductId,
        size: Option<String>,
    ) -> Result<(), StoreError> {
        self.sync
            .mutate(|lines| {
                for line in lines.iter_mut() {
                    if line.product.id == *id {
                        line.size.clone_from(&size);
                    }
                }
            })
            .await
    }
}

impl<S: RecordStore> CartMutator for CartSync<S> {
    fn lines(&self) -> &[CartLine] {
        self.sync.items()
    }

    async fn add_to_cart(&mut self, product: Product) -> Result<CartAddOutcome, StoreError> {
        let id = product.id.clone();
        if self.lines().iter().any(|line| line.product.id == id) {
            info!(product_id = %id, "item already in cart");
            return Ok(CartAddOutcome::AlreadyInCart);
        }

        self.sync
            .mutate(|lines| lines.push(CartLine::snapshot(product)))
            .await?;
        Ok(CartAddOutcome::Added)
    }

    async fn remove(&mut self, id: &ProductId) -> Result<(), StoreError> {
        self.sync
            .mutate(|lines| lines.retain(|line| line.product.id != *id))
            .await
    }

    async fn clear(&mut self) -> Result<(), StoreError> {
        self.sync.mutate(Vec::clear).await
    }

    fn reset_local(&mut self) {
        self.sync.reset_local();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecru_core::Category;
    use ecru_store::{MemoryStore, USERS};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::json;

    fn product(id: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::from(price),
            stock: 10,
            category: Category::Tops,
            images: vec!["https://cdn.example/img.jpg".to_owned()],
            is_active: true,
            original_price: None,
            is_sale: None,
            material: None,
            care: None,
            fit: None,
        }
    }

    async fn bound_cart() -> CartSync<MemoryStore> {
        let store = MemoryStore::new();
        store
            .seed(
                USERS,
                json!({"id": "u1", "name": "Ada", "email": "a@b.c", "password": "pw", "cart": []}),
            )
            .await;
        let mut cart = CartSync::new(store);
        cart.bind(Some(UserId::new("u1")));
        cart.load().await.expect("load");
        cart
    }

    #[tokio::test]
    async fn test_add_is_idempotent_per_product_id() {
        let mut cart = bound_cart().await;

        let first = cart.add_to_cart(product("p1", 10)).await.expect("add");
        assert_eq!(first, CartAddOutcome::Added);

        let second = cart.add_to_cart(product("p1", 10)).await.expect("add");
        assert_eq!(second, CartAddOutcome::AlreadyInCart);

        assert_eq!(cart.lines().len(), 1, "never two lines for one product");
    }

    #[tokio::test]
    async fn test_decrement_floors_at_one() {
        let mut cart = bound_cart().await;
        cart.add_to_cart(product("p1", 10)).await.expect("add");

        cart.decrement_qty(&ProductId::new("p1")).await.expect("dec");
        assert_eq!(cart.lines()[0].quantity, 1, "floor invariant");
    }

    #[tokio::test]
    async fn test_increment_saturates_at_quantity_max() {
        let store = MemoryStore::new();
        store
            .seed(
                USERS,
                json!({
                    "id": "u1", "name": "Ada", "email": "a@b.c", "password": "pw",
                    "cart": [{"id": "p1", "name": "Product p1", "price": "10",
                              "category": "Tops", "quantity": u32::MAX}]
                }),
            )
            .await;
        let mut cart = CartSync::new(store);
        cart.bind(Some(UserId::new("u1")));
        cart.load().await.expect("load");

        cart.increment_qty(&ProductId::new("p1")).await.expect("inc");
        assert_eq!(cart.lines()[0].quantity, u32::MAX, "no wraparound");
    }

    #[tokio::test]
    async fn test_increment_then_decrement_is_identity() {
        let mut cart = bound_cart().await;
        cart.add_to_cart(product("p1", 10)).await.expect("add");
        cart.increment_qty(&ProductId::new("p1")).await.expect("inc");
        cart.increment_qty(&ProductId::new("p1")).await.expect("inc");
        let before = cart.lines()[0].quantity;

        cart.increment_qty(&ProductId::new("p1")).await.expect("inc");
        cart.decrement_qty(&ProductId::new("p1")).await.expect("dec");
        assert_eq!(cart.lines()[0].quantity, before);
    }

    #[tokio::test]
    async fn test_remove_on_zero_opt_in() {
        let mut cart = bound_cart().await;
        cart.set_remove_on_zero(true);
        cart.add_to_cart(product("p1", 10)).await.expect("add");

        cart.decrement_qty(&ProductId::new("p1")).await.expect("dec");
        assert!(cart.lines().is_empty(), "decrement at 1 removes when opted in");
    }

    #[tokio::test]
    async fn test_set_size_touches_only_the_target_line() {
        let mut cart = bound_cart().await;
        cart.add_to_cart(product("p1", 10)).await.expect("add");
        cart.add_to_cart(product("p2", 20)).await.expect("add");

        cart.set_size(&ProductId::new("p1"), Some("M".to_owned()))
            .await
            .expect("set size");
        assert_eq!(cart.lines()[0].size.as_deref(), Some("M"));
        assert_eq!(cart.lines()[1].size, None);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_cart() {
        let mut cart = bound_cart().await;
        cart.add_to_cart(product("p1", 10)).await.expect("add");
        cart.clear().await.expect("clear");
        assert!(cart.lines().is_empty());
        assert_eq!(cart.total_price(), Price::ZERO);
    }

    #[tokio::test]
    async fn test_total_price_never_desyncs_under_random_ops() {
        // Property: after any operation sequence, the derived total equals a
        // from-scratch recomputation over the lines.
        let mut cart = bound_cart().await;
        let mut rng = StdRng::seed_from_u64(0x0EC5);
        let ids = ["p1", "p2", "p3", "p4"];

        for _ in 0..200 {
            let id = ids[rng.random_range(0..ids.len())];
            match rng.random_range(0..4) {
                0 => {
                    let price = rng.random_range(1..50);
                    cart.add_to_cart(product(id, price)).await.expect("add");
                }
                1 => cart.remove(&ProductId::new(id)).await.expect("rm"),
                2 => cart.increment_qty(&ProductId::new(id)).await.expect("inc"),
                _ => cart.decrement_qty(&ProductId::new(id)).await.expect("dec"),
            }

            let expected: Price = cart
                .lines()
                .iter()
                .map(|line| line.product.price * line.quantity)
                .sum();
            assert_eq!(cart.total_price(), expected);

            for line in cart.lines() {
                assert!(line.quantity >= 1, "no zero-quantity lines by default");
            }
        }
    }
}
