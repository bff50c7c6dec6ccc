//! Authentication service.
//!
//! Credential checking is the store's contract: an exact-match query on the
//! `users` collection over email and password, in the clear. Hardening that
//! contract is explicitly out of scope; what this service adds on top is
//! field validation before any network call and the blocked-account check.

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use ecru_core::{Email, EmailError, Role, User, UserId};
use ecru_store::{RecordStore, StoreError, users::Users};

/// Errors that can occur during signup or login.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required field was left empty. Caught before any network call.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The email is not structurally valid.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Signup with an email that already has an account.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// No user matched the email/password pair.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The account exists but is blocked; rejected regardless of correct
    /// credentials.
    #[error("this account is blocked")]
    Blocked,

    /// The store call itself failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Signup and login against the `users` collection.
pub struct AuthService<'a, S> {
    users: Users<'a, S>,
}

impl<'a, S: RecordStore> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self {
            users: Users::new(store),
        }
    }

    /// Register a new account with empty cart, wishlist, and order history.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingField`] or [`AuthError::InvalidEmail`]
    /// before any network call, [`AuthError::EmailTaken`] when the email is
    /// already registered, or [`AuthError::Store`] on transport failure.
    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<User, AuthError> {
        if name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let email = Email::parse(email)?;

        if self.users.find_by_email(email.as_str()).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = User {
            id: UserId::generate(),
            name: name.trim().to_owned(),
            email,
            password: password.expose_secret().to_owned(),
            role: Role::User,
            is_block: false,
            cart: Vec::new(),
            wishlist: Vec::new(),
            orders: Vec::new(),
            created_at: Some(Utc::now()),
        };

        let created = self.users.create(&user).await?;
        info!(user_id = %created.id, "account created");
        Ok(created)
    }

    /// Check credentials and return the matching, unblocked user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MissingField`] before any network call,
    /// [`AuthError::InvalidCredentials`] when nothing matches,
    /// [`AuthError::Blocked`] when the account is blocked, or
    /// [`AuthError::Store`] on transport failure.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let user = self
            .users
            .find_by_credentials(email, password.expose_secret())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if user.is_block {
            return Err(AuthError::Blocked);
        }

        info!(user_id = %user.id, "login succeeded");
        Ok(user)
    }
}
