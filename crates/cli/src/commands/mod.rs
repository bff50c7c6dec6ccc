//! Command implementations.

use ecru_store::{RestStore, StoreConfig};
use ecru_storefront::Session;

pub mod admin;
pub mod seed;
pub mod shop;

/// Shared per-invocation state: configuration and the store client.
pub struct Context {
    pub config: StoreConfig,
    pub store: RestStore,
}

impl Context {
    /// Load configuration from the environment and build the client.
    ///
    /// # Errors
    ///
    /// Returns the configuration or client construction error.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config = StoreConfig::from_env()?;
        let store = RestStore::new(&config)?;
        Ok(Self { config, store })
    }

    /// Restore the persisted session, logged-out if none exists.
    ///
    /// # Errors
    ///
    /// Returns a transport error from the user refetch.
    pub async fn session(&self) -> Result<Session, Box<dyn std::error::Error>> {
        Ok(Session::restore(&self.config.session_file, &self.store).await?)
    }

    /// Like [`Self::session`] but failing when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns an error when no session is persisted or restore fails.
    pub async fn logged_in_session(&self) -> Result<Session, Box<dyn std::error::Error>> {
        let session = self.session().await?;
        if !session.is_logged_in() {
            return Err("not logged in (run `ecru shop login` first)".into());
        }
        Ok(session)
    }
}
