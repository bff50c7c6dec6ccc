//! Session state with persisted restore.
//!
//! The session is an explicit object handed to whatever needs the current
//! identity - never ambient global state. Login writes a small token file
//! (just the user id) so that a new process can restore the identity by
//! refetching the record; the store stays the source of truth and a user
//! blocked since their last login is not restored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ecru_core::{User, UserId};
use ecru_store::{RecordStore, StoreError, users::Users};

#[derive(Serialize, Deserialize)]
struct SessionToken {
    user_id: UserId,
}

/// Current-user state for one interactive session.
pub struct Session {
    current_user: Option<User>,
    token_path: PathBuf,
}

impl Session {
    /// A logged-out session persisting its token at `token_path`.
    pub fn new(token_path: impl Into<PathBuf>) -> Self {
        Self {
            current_user: None,
            token_path: token_path.into(),
        }
    }

    /// Restore a session from the persisted token, refetching the user
    /// record. A missing token, a deleted account, or a block flag set since
    /// the last login all restore to logged-out (and discard the token).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] only for transport failures; "nobody to
    /// restore" is not an error.
    pub async fn restore<S: RecordStore>(
        token_path: impl Into<PathBuf>,
        store: &S,
    ) -> Result<Self, StoreError> {
        let mut session = Self::new(token_path);

        let Some(user_id) = read_token(&session.token_path) else {
            return Ok(session);
        };

        match Users::new(store).get(&user_id).await {
            Ok(user) if user.is_block => {
                warn!(%user_id, "persisted session belongs to a blocked account");
                session.discard_token();
            }
            Ok(user) => {
                debug!(%user_id, "session restored");
                session.current_user = Some(user);
            }
            Err(err) if err.is_not_found() => {
                session.discard_token();
            }
            Err(err) => return Err(err),
        }

        Ok(session)
    }

    /// The logged-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// The logged-in user's id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<&UserId> {
        self.current_user.as_ref().map(|user| &user.id)
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// Set the identity after a successful credential check and persist the
    /// token. Token persistence is best-effort: a write failure degrades to
    /// the legacy lose-on-restart behavior, nothing worse.
    pub fn login(&mut self, user: User) {
        let token = SessionToken {
            user_id: user.id.clone(),
        };
        if let Err(err) = write_token(&self.token_path, &token) {
            warn!(error = %err, "failed to persist session token");
        }
        self.current_user = Some(user);
    }

    /// Clear the identity and the persisted token.
    pub fn logout(&mut self) {
        self.current_user = None;
        self.discard_token();
    }

    /// Replace the cached user record with a freshly fetched copy (after a
    /// remote mutation the session holder initiated).
    pub fn refresh(&mut self, user: User) {
        if self.user_id() == Some(&user.id) {
            self.current_user = Some(user);
        }
    }

    fn discard_token(&self) {
        if self.token_path.exists() {
            if let Err(err) = fs::remove_file(&self.token_path) {
                warn!(error = %err, "failed to remove session token");
            }
        }
    }
}

fn read_token(path: &Path) -> Option<UserId> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<SessionToken>(&raw) {
        Ok(token) => Some(token.user_id),
        Err(err) => {
            warn!(error = %err, "discarding unreadable session token");
            None
        }
    }
}

fn write_token(path: &Path, token: &SessionToken) -> std::io::Result<()> {
    let raw = serde_json::to_string(token).map_err(std::io::Error::other)?;
    fs::write(path, raw)
}
