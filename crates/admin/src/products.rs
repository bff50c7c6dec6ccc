//! Validated catalog writes.

use tracing::info;

use ecru_core::{Category, Price, Product, ProductId};
use ecru_store::{RecordStore, products::Products};

use crate::error::AdminError;
use crate::guard::AdminGuard;

/// Operator-entered product fields, validated before any write.
#[derive(Debug, Clone)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub category: Category,
    pub images: Vec<String>,
    pub original_price: Option<Price>,
    pub material: Option<String>,
    pub care: Option<String>,
    pub fit: Option<String>,
}

impl ProductForm {
    /// Validate and turn the form into a product record under `id`.
    ///
    /// Blank image entries are dropped before the non-empty check, so a form
    /// whose only image rows are whitespace fails the same way as one with
    /// none.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidField`] naming the first offending field.
    pub fn into_product(self, id: ProductId) -> Result<Product, AdminError> {
        if self.name.trim().is_empty() {
            return Err(AdminError::InvalidField("name"));
        }
        if self.description.trim().is_empty() {
            return Err(AdminError::InvalidField("description"));
        }
        let images: Vec<String> = self
            .images
            .into_iter()
            .map(|i| i.trim().to_owned())
            .filter(|i| !i.is_empty())
            .collect();
        if images.is_empty() {
            return Err(AdminError::InvalidField("images"));
        }

        let is_sale = self.original_price.map(|op| op > self.price);
        Ok(Product {
            id,
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            price: self.price,
            stock: self.stock,
            category: self.category,
            images,
            is_active: true,
            original_price: self.original_price,
            is_sale,
            material: self.material,
            care: self.care,
            fit: self.fit,
        })
    }
}

/// Catalog operations gated on an [`AdminGuard`].
pub struct ProductAdmin<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> ProductAdmin<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create a product from a validated form.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidField`] before any network call, or
    /// [`AdminError::Store`] when the write fails.
    pub async fn create(
        &self,
        guard: &AdminGuard,
        form: ProductForm,
    ) -> Result<Product, AdminError> {
        let product = form.into_product(ProductId::generate())?;
        let created = Products::new(self.store).create(&product).await?;
        info!(admin = %guard.acting_user(), product_id = %created.id, "product created");
        Ok(created)
    }

    /// Replace an existing product with a validated form.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::InvalidField`], [`AdminError::ProductNotFound`],
    /// or [`AdminError::Store`].
    pub async fn update(
        &self,
        guard: &AdminGuard,
        id: &ProductId,
        form: ProductForm,
    ) -> Result<Product, AdminError> {
        let product = form.into_product(id.clone())?;
        Products::new(self.store)
            .replace(&product)
            .await
            .map_err(|e| not_found(e, id))?;
        info!(admin = %guard.acting_user(), product_id = %id, "product updated");
        Ok(product)
    }

    /// Flip a product's visibility without touching the rest of the record.
    /// Inactive products stay in the catalog for existing cart lines and
    /// order history but are hidden from browsing.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::ProductNotFound`] or [`AdminError::Store`].
    pub async fn set_active(
        &self,
        guard: &AdminGuard,
        id: &ProductId,
        active: bool,
    ) -> Result<(), AdminError> {
        Products::new(self.store)
            .patch(id, serde_json::json!({ "isActive": active }))
            .await
            .map_err(|e| not_found(e, id))?;
        info!(admin = %guard.acting_user(), product_id = %id, active, "visibility changed");
        Ok(())
    }

    /// Delete a product outright. Cart lines and orders referencing it keep
    /// their own embedded snapshots, so history survives the deletion.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::ProductNotFound`] or [`AdminError::Store`].
    pub async fn delete(&self, guard: &AdminGuard, id: &ProductId) -> Result<(), AdminError> {
        Products::new(self.store)
            .delete(id)
            .await
            .map_err(|e| not_found(e, id))?;
        info!(admin = %guard.acting_user(), product_id = %id, "product deleted");
        Ok(())
    }
}

fn not_found(err: ecru_store::StoreError, id: &ProductId) -> AdminError {
    if err.is_not_found() {
        AdminError::ProductNotFound(id.clone())
    } else {
        AdminError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecru_core::{Role, User};
    use ecru_store::MemoryStore;
    use serde_json::json;

    fn admin() -> AdminGuard {
        let user: User = serde_json::from_value(json!({
            "id": "root", "name": "Root", "email": "root@example.com",
            "password": "pw", "role": Role::Admin
        }))
        .expect("admin user");
        AdminGuard::verify(&user).expect("guard")
    }

    fn form() -> ProductForm {
        ProductForm {
            name: "Linen Shirt".into(),
            description: "A shirt.".into(),
            price: Price::from(40),
            stock: 5,
            category: Category::Shirts,
            images: vec!["a.jpg".into()],
            original_price: None,
            material: None,
            care: None,
            fit: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_set_active() {
        let store = MemoryStore::new();
        let svc = ProductAdmin::new(&store);

        let created = svc.create(&admin(), form()).await.expect("create");
        assert!(created.is_active);

        svc.set_active(&admin(), &created.id, false).await.expect("hide");
        let stored = Products::new(&store).get(&created.id).await.expect("get");
        assert!(!stored.is_active);
        assert_eq!(stored.name, "Linen Shirt", "rest of the record untouched");
    }

    #[tokio::test]
    async fn test_blank_images_rejected_before_any_write() {
        let store = MemoryStore::new();
        store.set_fail_writes(true); // would error loudly if create wrote

        let bad = ProductForm {
            images: vec!["  ".into(), String::new()],
            ..form()
        };
        let err = ProductAdmin::new(&store)
            .create(&admin(), bad)
            .await
            .expect_err("blank images");
        assert!(matches!(err, AdminError::InvalidField("images")));
    }

    #[tokio::test]
    async fn test_update_unknown_product_is_not_found() {
        let store = MemoryStore::new();
        let err = ProductAdmin::new(&store)
            .update(&admin(), &ProductId::new("nope"), form())
            .await
            .expect_err("missing product");
        assert!(matches!(err, AdminError::ProductNotFound(_)));
    }

    #[test]
    fn test_sale_flag_derived_from_original_price() {
        let discounted = ProductForm {
            original_price: Some(Price::from(60)),
            ..form()
        };
        let product = discounted
            .into_product(ProductId::new("p1"))
            .expect("product");
        assert_eq!(product.is_sale, Some(true));
    }
}
