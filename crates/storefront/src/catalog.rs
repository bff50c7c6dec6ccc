//! Product catalog: cached reads and pure filter/sort.
//!
//! Catalog reads go through a moka TTL cache (5 minutes) because the
//! storefront fetches the same collection on every page. Filtering and
//! sorting are pure functions over an already-loaded slice so their
//! behavior pins down in unit tests.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use ecru_core::{Category, Product, ProductId};
use ecru_store::{RecordStore, StoreError, products::Products};

const CACHE_TTL: Duration = Duration::from_secs(300);
const CACHE_KEY: &str = "products:all";

/// Sort order for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Keep the store's ordering.
    #[default]
    Unsorted,
    PriceLowToHigh,
    PriceHighToLow,
}

/// Filter and sort criteria for a product listing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match on the product name.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<Category>,
    pub sort: SortOrder,
}

/// Filter and sort a product slice.
///
/// Pure and order-stable: products that compare equal under the sort key
/// keep their relative order, so listings are deterministic.
#[must_use]
pub fn filter_products(products: &[Product], filter: &ProductFilter) -> Vec<Product> {
    let needle = filter.search.as_deref().map(str::to_lowercase);

    let mut selected: Vec<Product> = products
        .iter()
        .filter(|product| {
            needle
                .as_deref()
                .is_none_or(|needle| product.name.to_lowercase().contains(needle))
        })
        .filter(|product| {
            filter
                .category
                .is_none_or(|category| product.category == category)
        })
        .cloned()
        .collect();

    match filter.sort {
        SortOrder::Unsorted => {}
        SortOrder::PriceLowToHigh => selected.sort_by_key(|product| product.price),
        SortOrder::PriceHighToLow => {
            selected.sort_by(|a, b| b.price.cmp(&a.price));
        }
    }

    selected
}

/// Cached product reads.
#[derive(Clone)]
pub struct Catalog<S> {
    store: S,
    cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl<S: RecordStore> Catalog<S> {
    /// Create a catalog over a store.
    #[must_use]
    pub fn new(store: S) -> Self {
        let cache = Cache::builder()
            .max_capacity(8)
            .time_to_live(CACHE_TTL)
            .build();
        Self { store, cache }
    }

    /// Every product record, cached.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the fetch fails (failures are not
    /// cached).
    pub async fn all_products(&self) -> Result<Arc<Vec<Product>>, StoreError> {
        if let Some(products) = self.cache.get(CACHE_KEY).await {
            return Ok(products);
        }

        let products = Arc::new(Products::new(&self.store).list().await?);
        self.cache.insert(CACHE_KEY, Arc::clone(&products)).await;
        Ok(products)
    }

    /// Products the storefront shows: active ones, filtered and sorted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the fetch fails.
    pub async fn browse(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let all = self.all_products().await?;
        let active: Vec<Product> = all.iter().filter(|p| p.is_active).cloned().collect();
        Ok(filter_products(&active, filter))
    }

    /// One product by id, uncached (detail pages want current stock).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub async fn product(&self, id: &ProductId) -> Result<Product, StoreError> {
        Products::new(&self.store).get(id).await
    }

    /// Drop cached listings (after an admin catalog edit).
    pub async fn invalidate(&self) {
        self.cache.invalidate(CACHE_KEY).await;
    }
}
