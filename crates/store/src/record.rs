//! The generic record-store contract.
//!
//! All data operations in Ecru are direct calls against a named collection
//! and an opaque record id. Operations are single round trips: no retries,
//! no idempotency keys. A failed write means "not applied remotely" and the
//! caller decides what to do with its local state.

use std::future::Future;

use serde_json::Value;

use crate::error::StoreError;

/// The `users` collection name.
pub const USERS: &str = "users";

/// The `products` collection name.
pub const PRODUCTS: &str = "products";

/// An exact-match filter over collection records.
///
/// Mirrors the store's query-parameter contract: every pair must match the
/// record's field by string equality (`users?email=...&password=...`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    /// An empty query matching every record.
    #[must_use]
    pub const fn all() -> Self {
        Self(Vec::new())
    }

    /// Add an exact-match condition.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((field.into(), value.into()));
        self
    }

    /// Whether the query has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The conditions as field/value pairs.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

/// A backend holding named collections of JSON records.
///
/// [`RestStore`](crate::RestStore) is the production implementation;
/// [`MemoryStore`](crate::MemoryStore) backs tests. The seam exists because
/// the store itself is out of scope: any REST-ish or document backend that
/// honors this contract is interchangeable.
pub trait RecordStore: Send + Sync {
    /// Fetch one record by id.
    fn fetch_record(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send;

    /// Fetch all records matching `query` (all records when empty).
    fn fetch_collection(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Value>, StoreError>> + Send;

    /// Create a record; the store may assign the id when none is given.
    /// Returns the record as stored.
    fn create_record(
        &self,
        collection: &str,
        fields: Value,
    ) -> impl Future<Output = Result<Value, StoreError>> + Send;

    /// Merge `partial`'s top-level fields into an existing record.
    fn patch_record(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Replace an existing record wholesale.
    fn replace_record(
        &self,
        collection: &str,
        id: &str,
        record: Value,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Delete a record by id.
    fn delete_record(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Decode a raw record into a typed model, mapping shape mismatches to
/// [`StoreError::Data`] with the collection named for context.
pub(crate) fn decode<T: serde::de::DeserializeOwned>(
    collection: &str,
    value: Value,
) -> Result<T, StoreError> {
    serde_json::from_value(value)
        .map_err(|e| StoreError::Data(format!("invalid {collection} record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_builder() {
        let query = Query::all().eq("email", "a@b.c").eq("password", "pw");
        assert_eq!(
            query.pairs(),
            &[
                ("email".to_owned(), "a@b.c".to_owned()),
                ("password".to_owned(), "pw".to_owned())
            ]
        );
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert!(Query::all().is_empty());
        assert!(!Query::all().eq("role", "admin").is_empty());
    }
}
