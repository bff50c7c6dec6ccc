//! In-memory implementation of [`RecordStore`].
//!
//! Backs unit tests and local development without a running store process.
//! Semantics follow the REST contract: opaque ids, top-level field merge on
//! patch, exact-match string comparison for queries.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::record::{Query, RecordStore};

/// A record store held entirely in memory. Cheap to clone; clones share data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with a 503, for exercising the
    /// persist-failure paths. Reads are unaffected.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Seed a record directly, bypassing the write-failure switch.
    pub async fn seed(&self, collection: &str, record: Value) {
        let mut collections = self.inner.collections.write().await;
        collections
            .entry(collection.to_owned())
            .or_default()
            .push(record);
    }

    fn check_writable(&self, collection: &str) -> Result<(), StoreError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 503,
                collection: collection.to_owned(),
            });
        }
        Ok(())
    }
}

/// String-equality comparison the way query parameters compare: strings
/// match raw, everything else through its JSON rendering.
fn field_matches(record: &Value, field: &str, wanted: &str) -> bool {
    match record.get(field) {
        Some(Value::String(s)) => s == wanted,
        Some(other) => other.to_string() == wanted,
        None => false,
    }
}

fn matches_query(record: &Value, query: &Query) -> bool {
    query
        .pairs()
        .iter()
        .all(|(field, wanted)| field_matches(record, field, wanted))
}

fn record_id(record: &Value) -> Option<&str> {
    record.get("id").and_then(Value::as_str)
}

fn not_found(collection: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collection.to_owned(),
        id: id.to_owned(),
    }
}

impl RecordStore for MemoryStore {
    async fn fetch_record(&self, collection: &str, id: &str) -> Result<Value, StoreError> {
        let collections = self.inner.collections.read().await;
        collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| record_id(r) == Some(id)))
            .cloned()
            .ok_or_else(|| not_found(collection, id))
    }

    async fn fetch_collection(
        &self,
        collection: &str,
        query: &Query,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.inner.collections.read().await;
        let records = collections.get(collection).cloned().unwrap_or_default();
        Ok(records
            .into_iter()
            .filter(|r| matches_query(r, query))
            .collect())
    }

    async fn create_record(&self, collection: &str, fields: Value) -> Result<Value, StoreError> {
        self.check_writable(collection)?;

        let mut record = fields;
        if record_id(&record).is_none() {
            if let Value::Object(map) = &mut record {
                map.insert("id".to_owned(), Value::String(Uuid::new_v4().to_string()));
            }
        }

        let mut collections = self.inner.collections.write().await;
        collections
            .entry(collection.to_owned())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    async fn patch_record(
        &self,
        collection: &str,
        id: &str,
        partial: Value,
    ) -> Result<(), StoreError> {
        self.check_writable(collection)?;

        let mut collections = self.inner.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| not_found(collection, id))?;

        if let (Value::Object(target), Value::Object(changes)) =
            (record, &partial)
        {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn replace_record(
        &self,
        collection: &str,
        id: &str,
        record: Value,
    ) -> Result<(), StoreError> {
        self.check_writable(collection)?;

        let mut collections = self.inner.collections.write().await;
        let slot = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| record_id(r) == Some(id)))
            .ok_or_else(|| not_found(collection, id))?;

        // The id is part of the address, not the body.
        let mut record = record;
        if let Value::Object(map) = &mut record {
            map.entry("id".to_owned())
                .or_insert_with(|| Value::String(id.to_owned()));
        }
        *slot = record;
        Ok(())
    }

    async fn delete_record(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.check_writable(collection)?;

        let mut collections = self.inner.collections.write().await;
        let records = collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let before = records.len();
        records.retain(|r| record_id(r) != Some(id));
        if records.len() == before {
            return Err(not_found(collection, id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_assigns_id_when_absent() {
        let store = MemoryStore::new();
        let created = store
            .create_record("users", json!({"name": "Ada"}))
            .await
            .expect("create");
        assert!(record_id(&created).is_some());
    }

    #[tokio::test]
    async fn test_query_exact_match_on_strings_and_numbers() {
        let store = MemoryStore::new();
        store
            .seed("users", json!({"id": "u1", "email": "a@b.c", "age": 30}))
            .await;
        store
            .seed("users", json!({"id": "u2", "email": "x@y.z", "age": 30}))
            .await;

        let by_email = store
            .fetch_collection("users", &Query::all().eq("email", "a@b.c"))
            .await
            .expect("fetch");
        assert_eq!(by_email.len(), 1);

        let by_age = store
            .fetch_collection("users", &Query::all().eq("age", "30"))
            .await
            .expect("fetch");
        assert_eq!(by_age.len(), 2);
    }

    #[tokio::test]
    async fn test_patch_merges_top_level_fields() {
        let store = MemoryStore::new();
        store
            .seed("users", json!({"id": "u1", "name": "Ada", "cart": [1]}))
            .await;
        store
            .patch_record("users", "u1", json!({"cart": []}))
            .await
            .expect("patch");

        let record = store.fetch_record("users", "u1").await.expect("fetch");
        assert_eq!(record["name"], "Ada");
        assert_eq!(record["cart"], json!([]));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_record("users", "ghost").await.expect_err("missing");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fail_writes_leaves_reads_working() {
        let store = MemoryStore::new();
        store.seed("users", json!({"id": "u1"})).await;
        store.set_fail_writes(true);

        let err = store
            .patch_record("users", "u1", json!({"name": "x"}))
            .await
            .expect_err("write must fail");
        assert!(matches!(err, StoreError::Status { status: 503, .. }));
        assert!(store.fetch_record("users", "u1").await.is_ok());
    }
}
