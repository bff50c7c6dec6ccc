//! Domain records as stored in the remote resource store.
//!
//! Field names mirror the store's JSON exactly (`isBlock`, `isActive`,
//! `createdAt`). Collection-valued fields default to empty so that
//! partially-populated legacy records still deserialize.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, ShippingAddress};
pub use product::{CartLine, Product};
pub use user::User;
