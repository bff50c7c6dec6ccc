//! Product catalog records and cart lines.

use serde::{Deserialize, Serialize};

use crate::types::{Category, Price, ProductId};

const fn default_true() -> bool {
    true
}

/// A catalog product.
///
/// Mutated only through the admin console; the storefront treats products
/// as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    pub category: Category,
    /// Image URLs; the admin console guarantees at least one.
    #[serde(default)]
    pub images: Vec<String>,
    /// Inactive products are hidden from the storefront but kept for
    /// existing order snapshots.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Pre-sale price, shown struck through when `is_sale` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sale: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
}

/// One line of a cart (or of an order's item list).
///
/// The product fields are a denormalized snapshot taken when the line was
/// created; later catalog edits deliberately do not flow into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl CartLine {
    /// Snapshot a product into a new quantity-1 line.
    #[must_use]
    pub const fn snapshot(product: Product) -> Self {
        Self {
            product,
            quantity: 1,
            size: None,
        }
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }
}
