//! Admin error types.

use ecru_core::{OrderId, ProductId, UserId};
use ecru_store::StoreError;

/// Errors from admin console operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The acting identity does not carry the admin role.
    #[error("admin role required")]
    Forbidden,

    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("user not found: {0}")]
    UserNotFound(UserId),

    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// A product form failed validation. Caught before any network call.
    #[error("invalid product field: {0}")]
    InvalidField(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}
