//! Session persistence glue
//!
//! The authenticator never keeps tokens. [`SessionKeeper`] does what the UI
//! layer does around it: store the token after login, read it back to check
//! the session, and forget it on logout.

pub mod store;

use std::sync::Arc;

use tracing::{debug, info};

use crate::backend::MockBackend;
use crate::config::DeskConfig;
use crate::error::Result;
use crate::guard::SessionSignal;
use crate::models::LoginResponse;

pub use store::{JsonFileKeyValueStore, KeyValueStore, MemoryKeyValueStore};

/// Pick the store described by `config`
pub fn open_store(config: &DeskConfig) -> Result<Arc<dyn KeyValueStore>> {
    Ok(match &config.session_file {
        Some(path) => Arc::new(JsonFileKeyValueStore::open(path)?),
        None => Arc::new(MemoryKeyValueStore::new()),
    })
}

#[derive(Clone)]
pub struct SessionKeeper {
    backend: MockBackend,
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl SessionKeeper {
    pub fn new(backend: MockBackend, store: Arc<dyn KeyValueStore>) -> Self {
        let key = backend.config().session_key.clone();
        Self {
            backend,
            store,
            key,
        }
    }

    /// Token currently held, if any
    pub fn token(&self) -> Option<String> {
        self.store.get(&self.key)
    }

    /// Log in and remember the issued token
    pub async fn login(&self) -> Result<LoginResponse> {
        let login = self.backend.login().await?;
        self.store.set(&self.key, &login.token)?;
        info!("[Session] Stored token for {}", login.id);
        Ok(login)
    }

    /// Check the held token. No token, or any failure, is an invalid session.
    pub async fn check(&self) -> SessionSignal {
        let Some(token) = self.token() else {
            debug!("[Session] No token held");
            return SessionSignal::Invalid;
        };
        SessionSignal::from(Some(self.backend.check_auth(&token).await))
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(&self.key)?;
        info!("[Session] Token removed");
        Ok(())
    }
}
