//! Typed repository over the `products` collection.

use serde_json::Value;
use tracing::debug;

use ecru_core::{Product, ProductId};

use crate::error::StoreError;
use crate::record::{PRODUCTS, Query, RecordStore, decode};

/// Repository for product records.
pub struct Products<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> Products<'a, S> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the id is unknown, or
    /// [`StoreError::Data`] when the record does not parse.
    pub async fn get(&self, id: &ProductId) -> Result<Product, StoreError> {
        let record = self.store.fetch_record(PRODUCTS, id.as_str()).await?;
        decode(PRODUCTS, record)
    }

    /// Fetch the whole catalog, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or parse failure.
    pub async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let records = self.store.fetch_collection(PRODUCTS, &Query::all()).await?;
        records
            .into_iter()
            .map(|record| decode(PRODUCTS, record))
            .collect()
    }

    /// Create a product record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or parse failure.
    pub async fn create(&self, product: &Product) -> Result<Product, StoreError> {
        debug!(product_id = %product.id, "creating product record");
        let fields = serde_json::to_value(product)?;
        let created = self.store.create_record(PRODUCTS, fields).await?;
        decode(PRODUCTS, created)
    }

    /// Replace a product record wholesale (admin edit form).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or unknown id.
    pub async fn replace(&self, product: &Product) -> Result<(), StoreError> {
        let record = serde_json::to_value(product)?;
        self.store
            .replace_record(PRODUCTS, product.id.as_str(), record)
            .await
    }

    /// Merge top-level fields into a product record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or unknown id.
    pub async fn patch(&self, id: &ProductId, partial: Value) -> Result<(), StoreError> {
        self.store
            .patch_record(PRODUCTS, id.as_str(), partial)
            .await
    }

    /// Delete a product record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or unknown id.
    pub async fn delete(&self, id: &ProductId) -> Result<(), StoreError> {
        self.store.delete_record(PRODUCTS, id.as_str()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_round_trip_through_raw_records() {
        let store = MemoryStore::new();
        store
            .seed(
                PRODUCTS,
                json!({
                    "id": "p1",
                    "name": "Red Top",
                    "price": 10,
                    "category": "Tops",
                    "images": ["https://cdn.example/red.jpg"],
                    "isActive": true
                }),
            )
            .await;

        let products = Products::new(&store);
        let all = products.list().await.expect("list");
        assert_eq!(all.len(), 1);

        let red = products.get(&ProductId::new("p1")).await.expect("get");
        assert_eq!(red.name, "Red Top");
        assert!(red.is_active);
    }
}
