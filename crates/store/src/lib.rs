//! Ecru Store - Generic REST resource store client.
//!
//! The remote store is an external collaborator: a REST resource server
//! exposing the collections `users` and `products`, each record addressed by
//! an opaque string id, with exact-match query-parameter filtering. Any
//! backend satisfying the [`RecordStore`] contract is interchangeable.
//!
//! # Modules
//!
//! - [`record`] - The [`RecordStore`] trait and [`Query`] type
//! - [`rest`] - [`RestStore`], the reqwest implementation
//! - [`memory`] - [`MemoryStore`], an in-memory implementation for tests and
//!   local development
//! - [`users`] / [`products`] - Typed repositories over the raw record layer
//! - [`sync`] - [`CollectionSync`], the optimistic local-cache-plus-persist
//!   pattern shared by cart, wishlist, and admin order editing
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
mod error;
pub mod memory;
pub mod products;
pub mod record;
pub mod rest;
pub mod sync;
pub mod users;

pub use config::{ConfigError, StoreConfig};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use record::{PRODUCTS, Query, RecordStore, USERS};
pub use rest::RestStore;
pub use sync::{CartField, CollectionSync, OrdersField, SyncState, UserField, WishlistField};
