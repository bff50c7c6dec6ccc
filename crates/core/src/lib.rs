//! Ecru Core - Shared types library.
//!
//! This crate provides common types used across all Ecru components:
//! - `store` - Generic REST resource store client and synchronizer
//! - `storefront` - Shopper-facing services (cart, wishlist, checkout)
//! - `admin` - Back-office services (orders, users, products, analytics)
//! - `cli` - Command-line frontend
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This
//! keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and statuses
//! - [`models`] - Domain records as stored in the remote resource store

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
