//! Account management.

use tracing::info;

use ecru_core::{User, UserId};
use ecru_store::{RecordStore, users::Users};

use crate::error::AdminError;
use crate::guard::AdminGuard;

/// Account operations gated on an [`AdminGuard`].
pub struct UserAdmin<'a, S> {
    store: &'a S,
}

impl<'a, S: RecordStore> UserAdmin<'a, S> {
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Every account, admins included.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Store`] when the list cannot be fetched.
    pub async fn list(&self, _guard: &AdminGuard) -> Result<Vec<User>, AdminError> {
        Ok(Users::new(self.store).list().await?)
    }

    /// Flip one account's block flag and return the new value.
    ///
    /// A blocked account cannot log in and a persisted session for it will
    /// not restore; toggling again lifts the block with no other change to
    /// the record.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::UserNotFound`] or [`AdminError::Store`].
    pub async fn toggle_block(
        &self,
        guard: &AdminGuard,
        user_id: &UserId,
    ) -> Result<bool, AdminError> {
        let users = Users::new(self.store);
        let user = users.get(user_id).await.map_err(|e| not_found(e, user_id))?;

        let blocked = !user.is_block;
        users
            .patch(user_id, serde_json::json!({ "isBlock": blocked }))
            .await?;
        info!(admin = %guard.acting_user(), %user_id, blocked, "block flag toggled");
        Ok(blocked)
    }

    /// Delete an account outright, orders and all.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::UserNotFound`] or [`AdminError::Store`].
    pub async fn delete(&self, guard: &AdminGuard, user_id: &UserId) -> Result<(), AdminError> {
        Users::new(self.store)
            .delete(user_id)
            .await
            .map_err(|e| not_found(e, user_id))?;
        info!(admin = %guard.acting_user(), %user_id, "account deleted");
        Ok(())
    }
}

fn not_found(err: ecru_store::StoreError, user_id: &UserId) -> AdminError {
    if err.is_not_found() {
        AdminError::UserNotFound(user_id.clone())
    } else {
        AdminError::Store(err)
    }
}
