//! Typed repository over the `users` collection.

use serde_json::Value;
use tracing::debug;

use ecru_core::{User, UserId};

use crate::error::StoreError;
use crate::record::{Query, RecordStore, USERS, decode};

/// Repository for user records.
///
/// Borrows the store the way the rest of the crate does: construct one per
/// operation, it is just a view.
pub struct Users<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> Users<'a, S> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Fetch one user by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the id is unknown, or
    /// [`StoreError::Data`] when the record does not parse.
    pub async fn get(&self, id: &UserId) -> Result<User, StoreError> {
        let record = self.store.fetch_record(USERS, id.as_str()).await?;
        decode(USERS, record)
    }

    /// Fetch every user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or parse failure.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let records = self.store.fetch_collection(USERS, &Query::all()).await?;
        records
            .into_iter()
            .map(|record| decode(USERS, record))
            .collect()
    }

    /// Find a user by exact email match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or parse failure.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let records = self
            .store
            .fetch_collection(USERS, &Query::all().eq("email", email))
            .await?;
        first_user(records)
    }

    /// Find a user by exact email and password match.
    ///
    /// The plaintext comparison is the store's credential contract;
    /// hardening it is explicitly out of scope.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or parse failure.
    pub async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let query = Query::all().eq("email", email).eq("password", password);
        let records = self.store.fetch_collection(USERS, &query).await?;
        first_user(records)
    }

    /// Create a user record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport or parse failure.
    pub async fn create(&self, user: &User) -> Result<User, StoreError> {
        debug!(user_id = %user.id, "creating user record");
        let fields = serde_json::to_value(user)?;
        let created = self.store.create_record(USERS, fields).await?;
        decode(USERS, created)
    }

    /// Merge top-level fields into a user record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or unknown id.
    pub async fn patch(&self, id: &UserId, partial: Value) -> Result<(), StoreError> {
        self.store.patch_record(USERS, id.as_str(), partial).await
    }

    /// Delete a user record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure or unknown id.
    pub async fn delete(&self, id: &UserId) -> Result<(), StoreError> {
        self.store.delete_record(USERS, id.as_str()).await
    }
}

fn first_user(records: Vec<Value>) -> Result<Option<User>, StoreError> {
    records
        .into_iter()
        .next()
        .map(|record| decode(USERS, record))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    fn user_record(id: &str, email: &str, password: &str) -> Value {
        json!({
            "id": id,
            "name": "Ada",
            "email": email,
            "password": password,
        })
    }

    #[tokio::test]
    async fn test_find_by_credentials_exact_match() {
        let store = MemoryStore::new();
        store
            .seed(USERS, user_record("u1", "ada@example.com", "pw1"))
            .await;

        let users = Users::new(&store);
        let found = users
            .find_by_credentials("ada@example.com", "pw1")
            .await
            .expect("query");
        assert_eq!(found.expect("present").id, UserId::new("u1"));

        let wrong = users
            .find_by_credentials("ada@example.com", "PW1")
            .await
            .expect("query");
        assert!(wrong.is_none(), "comparison is case-sensitive");
    }

    #[tokio::test]
    async fn test_get_unknown_user() {
        let store = MemoryStore::new();
        let err = Users::new(&store)
            .get(&UserId::new("ghost"))
            .await
            .expect_err("missing");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_data_error() {
        let store = MemoryStore::new();
        store.seed(USERS, json!({"id": "u1", "name": 42})).await;
        let err = Users::new(&store)
            .get(&UserId::new("u1"))
            .await
            .expect_err("corrupt");
        assert!(matches!(err, StoreError::Data(_)));
    }
}
