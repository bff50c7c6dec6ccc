//! Ecru Storefront - Shopper-facing services.
//!
//! Everything a storefront UI binds to: an explicit session object, the
//! cart and wishlist synchronizers, the cached catalog with pure
//! filter/sort, and checkout. No rendering or routing lives here; a UI
//! layer consumes plain data and functions and tells the session about
//! identity changes.
//!
//! # Modules
//!
//! - [`session`] - Current-user state with persisted restore
//! - [`services::auth`] - Signup and login against the `users` collection
//! - [`cart`] - [`CartSync`](cart::CartSync) and the
//!   [`CartMutator`](cart::CartMutator) capability trait
//! - [`wishlist`] - [`WishlistSync`](wishlist::WishlistSync)
//! - [`catalog`] - Cached product reads and pure filter/sort
//! - [`checkout`] - Validation and order placement

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod services;
pub mod session;
pub mod wishlist;

pub use cart::{CartAddOutcome, CartMutator, CartSync, total_price};
pub use catalog::{Catalog, ProductFilter, SortOrder, filter_products};
pub use checkout::{CheckoutError, CheckoutForm, CheckoutService, ContactDetails, PaymentDetails};
pub use services::auth::{AuthError, AuthService};
pub use session::Session;
pub use wishlist::{MoveToCartError, WishlistAddOutcome, WishlistSync};
