//! Role gate for admin services.

use ecru_core::{User, UserId};

use crate::error::AdminError;

/// Proof that an admin identity was verified.
///
/// Constructed only by [`AdminGuard::verify`], so holding one means the role
/// check already happened. Services take it by reference instead of
/// re-checking a `User` themselves.
#[derive(Debug, Clone)]
pub struct AdminGuard {
    acting_user: UserId,
}

impl AdminGuard {
    /// Verify that `user` carries the admin role.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] for a non-admin or blocked account.
    pub fn verify(user: &User) -> Result<Self, AdminError> {
        if !user.is_admin() || user.is_block {
            return Err(AdminError::Forbidden);
        }
        Ok(Self {
            acting_user: user.id.clone(),
        })
    }

    /// The verified admin's id, for audit logging.
    #[must_use]
    pub fn acting_user(&self) -> &UserId {
        &self.acting_user
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecru_core::Role;
    use serde_json::json;

    fn user(role: Role, blocked: bool) -> User {
        serde_json::from_value(json!({
            "id": "u1", "name": "A", "email": "a@example.com", "password": "pw",
            "role": role, "isBlock": blocked
        }))
        .expect("user")
    }

    #[test]
    fn test_verify_accepts_admin() {
        let guard = AdminGuard::verify(&user(Role::Admin, false)).expect("admin");
        assert_eq!(guard.acting_user().as_str(), "u1");
    }

    #[test]
    fn test_verify_rejects_plain_user() {
        assert!(matches!(
            AdminGuard::verify(&user(Role::User, false)),
            Err(AdminError::Forbidden)
        ));
    }

    #[test]
    fn test_verify_rejects_blocked_admin() {
        assert!(matches!(
            AdminGuard::verify(&user(Role::Admin, true)),
            Err(AdminError::Forbidden)
        ));
    }
}
