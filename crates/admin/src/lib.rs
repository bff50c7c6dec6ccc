//! Ecru Admin - Console services for store operators.
//!
//! Order, user, and product management plus dashboard analytics, all built
//! on the same [`ecru_store::RecordStore`] seam the storefront uses. Every
//! mutating service takes an [`AdminGuard`] so a non-admin identity cannot
//! reach a write path by construction.
//!
//! # Modules
//!
//! - [`guard`] - Role check gating every admin service
//! - [`orders`] - Cross-user order listing and status updates
//! - [`users`] - Account listing, block toggling, deletion
//! - [`products`] - Validated catalog writes
//! - [`analytics`] - Pure revenue aggregation
//! - [`dashboard`] - Snapshot assembly and the background poller

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod dashboard;
pub mod error;
pub mod guard;
pub mod orders;
pub mod products;
pub mod users;

pub use analytics::{order_count, revenue_by_month, total_mismatches, total_revenue};
pub use dashboard::{DashboardPoller, DashboardSnapshot};
pub use error::AdminError;
pub use guard::AdminGuard;
pub use orders::{AdminOrder, OrderAdmin, filter_by_status};
pub use products::{ProductAdmin, ProductForm};
pub use users::UserAdmin;
