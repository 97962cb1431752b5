//! Support Desk mock backend
//!
//! In-process stand-in for the support chat API: a client directory, a
//! per-client message ledger and a session authenticator behind latency
//! simulating async accessors, plus the route guard that gates protected
//! views on session validity.

pub mod auth;
pub mod backend;
pub mod config;
pub mod delay;
pub mod error;
pub mod guard;
pub mod ids;
pub mod models;
pub mod session;
pub mod store;

use tracing::info;

pub use backend::MockBackend;
pub use config::DeskConfig;
pub use error::{DeskError, Result};
pub use guard::{GuardState, GuardView, RouteGuard, SessionSignal};
pub use session::SessionKeeper;

/// Walk through a session the way the UI does: restore or log in, gate the
/// inbox on the guard, then load the data it shows. The binary installs the
/// tracing subscriber before calling this.
pub async fn run() -> anyhow::Result<()> {
    info!("=== Support Desk (mock backend) ===");

    let config = DeskConfig::default();
    info!("Latency: {:?}", config.latency);
    info!("Session file: {:?}", config.session_file);

    let backend = MockBackend::new(config.clone());
    let keeper = SessionKeeper::new(backend.clone(), session::open_store(&config)?);

    let mut guard = RouteGuard::default();
    guard.observe(SessionSignal::Pending);

    let mut signal = keeper.check().await;
    if signal == SessionSignal::Invalid {
        info!("No valid session, logging in");
        keeper.login().await?;
        signal = keeper.check().await;
    }
    guard.observe(signal);

    let view = guard.render(|identity| identity.name.clone());
    let GuardView::Protected(agent) = view else {
        info!("Redirecting to {}", guard.redirect_to());
        return Ok(());
    };
    info!("Inbox for {}", agent);

    let (clients, messages) =
        futures::future::try_join(backend.list_clients(), backend.list_all_messages()).await?;

    for client in &clients {
        info!(
            "  {} {:<16} {:?} since {}",
            client.id,
            client.name,
            client.current_plan,
            client.member_since.format("%Y-%m-%d")
        );
    }
    if let Some(latest) = messages.first() {
        info!(
            "Latest message {} from {} ({:?}): {}",
            latest.id, latest.client_id, latest.sender, latest.content
        );
    }

    backend.shutdown();
    Ok(())
}
