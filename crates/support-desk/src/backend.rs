//! Mock backend
//!
//! The asynchronous accessors the UI layer calls in place of a remote API.
//! Each call runs as its own task: it waits out its latency and then touches
//! the store. Dropping the caller's future does not stop the task, so a
//! write that was issued still lands. Overlapping calls finish in latency
//! order, not call order; there is no isolation across calls.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::auth::SessionAuthenticator;
use crate::config::DeskConfig;
use crate::delay::Latency;
use crate::error::Result;
use crate::ids::{IdGenerator, RandomIdGenerator};
use crate::models::{Client, Identity, LoginResponse, Message, NewMessage, Reaction};
use crate::store::{seed, ClientDirectory, MessageLedger};

struct Inner {
    config: DeskConfig,
    directory: ClientDirectory,
    ledger: MessageLedger,
    auth: SessionAuthenticator,
    cancel: CancellationToken,
}

#[derive(Clone)]
pub struct MockBackend {
    inner: Arc<Inner>,
}

impl MockBackend {
    /// Random ids, default authenticator
    pub fn new(config: DeskConfig) -> Self {
        Self::with_parts(
            config,
            Arc::new(RandomIdGenerator),
            SessionAuthenticator::default(),
        )
    }

    pub fn with_parts(
        config: DeskConfig,
        ids: Arc<dyn IdGenerator>,
        auth: SessionAuthenticator,
    ) -> Self {
        let directory = ClientDirectory::new(ids.clone(), config.collision);
        let ledger = MessageLedger::new(ids, config.collision);
        let backend = Self {
            inner: Arc::new(Inner {
                config,
                directory,
                ledger,
                auth,
                cancel: CancellationToken::new(),
            }),
        };
        if backend.inner.config.seed {
            backend.seed();
        }
        info!(
            "[Backend] Ready with {} clients and {} messages",
            backend.inner.directory.len(),
            backend.inner.ledger.len()
        );
        backend
    }

    pub fn config(&self) -> &DeskConfig {
        &self.inner.config
    }

    fn seed(&self) {
        for client in seed::clients() {
            self.inner.directory.upsert(client);
        }
        for message in seed::messages() {
            self.inner.ledger.append(message);
        }
    }

    /// Drop all records and reload fixtures when seeding is enabled
    pub fn reset(&self) {
        self.inner.directory.clear();
        self.inner.ledger.clear();
        if self.inner.config.seed {
            self.seed();
        }
        info!("[Backend] Reset");
    }

    /// Abort every pending delay. Pending and later calls fail with
    /// `Cancelled` without touching the stores.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        info!("[Backend] Shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Wait `latency`, then run `op` against the stores on a detached task
    async fn call<T, F>(&self, latency: Latency, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Inner) -> Result<T> + Send + 'static,
    {
        self.call_async(latency, move |inner| async move { op(inner.as_ref()) })
            .await
    }

    async fn call_async<T, F, Fut>(&self, latency: Latency, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Inner>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            latency.wait(&inner.cancel).await?;
            op(inner).await
        })
        .await?
    }

    /// Clients, most recent registration first
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        self.call(self.inner.config.latency.directory, |inner| {
            Ok(inner.directory.list())
        })
        .await
    }

    pub async fn get_client(&self, id: &str) -> Result<Option<Client>> {
        let id = id.to_string();
        self.call(self.inner.config.latency.directory, move |inner| {
            Ok(inner.directory.get(&id))
        })
        .await
    }

    pub async fn create_empty_client(&self) -> Result<Client> {
        self.call(self.inner.config.latency.directory, |inner| {
            inner.directory.create_empty()
        })
        .await
    }

    /// Insert or replace a client record
    pub async fn update_client(&self, client: Client) -> Result<()> {
        self.call(self.inner.config.latency.directory, move |inner| {
            inner.directory.upsert(client);
            Ok(())
        })
        .await
    }

    /// One client's conversation in insertion order
    pub async fn list_messages(&self, client_id: &str) -> Result<Vec<Message>> {
        let client_id = client_id.to_string();
        self.call(self.inner.config.latency.ledger, move |inner| {
            Ok(inner.ledger.get(&client_id))
        })
        .await
    }

    /// Every message, newest first
    pub async fn list_all_messages(&self) -> Result<Vec<Message>> {
        self.call(self.inner.config.latency.ledger, |inner| {
            Ok(inner.ledger.get_all())
        })
        .await
    }

    pub async fn send_message(&self, input: NewMessage) -> Result<Message> {
        self.call(self.inner.config.latency.ledger, move |inner| {
            inner.ledger.send(input)
        })
        .await
    }

    pub async fn set_reaction(
        &self,
        client_id: &str,
        message_id: &str,
        reaction: Reaction,
    ) -> Result<Option<Message>> {
        let client_id = client_id.to_string();
        let message_id = message_id.to_string();
        self.call(self.inner.config.latency.ledger, move |inner| {
            Ok(inner.ledger.set_reaction(&client_id, &message_id, reaction))
        })
        .await
    }

    pub async fn login(&self) -> Result<LoginResponse> {
        self.call(self.inner.config.latency.auth, |inner| Ok(inner.auth.login()))
            .await
    }

    /// Validate a session token; fails with `Authentication` on mismatch
    pub async fn check_auth(&self, token: &str) -> Result<Identity> {
        let token = token.to_string();
        self.call_async(self.inner.config.latency.auth, move |inner| async move {
            inner.auth.check_auth(&token).await
        })
        .await
    }
}
