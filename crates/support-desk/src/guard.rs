//! Route Guard
//!
//! Decides whether protected content is shown, based only on a session
//! signal supplied from outside. The guard never calls the authenticator.

use tracing::{debug, info};

use crate::error::Result;
use crate::models::Identity;

pub const DEFAULT_REDIRECT: &str = "/auth";

/// Session validity as reported by whatever layer runs the check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    Pending,
    Valid(Identity),
    Invalid,
}

/// Adapts a query-style result: `None` while in flight, then the outcome.
/// Every failure counts as no session.
impl From<Option<Result<Identity>>> for SessionSignal {
    fn from(result: Option<Result<Identity>>) -> Self {
        match result {
            None => SessionSignal::Pending,
            Some(Ok(identity)) => SessionSignal::Valid(identity),
            Some(Err(_)) => SessionSignal::Invalid,
        }
    }
}

impl From<Option<Identity>> for SessionSignal {
    fn from(identity: Option<Identity>) -> Self {
        identity.map_or(SessionSignal::Invalid, SessionSignal::Valid)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authenticated,
    Unauthenticated,
}

impl From<&SessionSignal> for GuardState {
    fn from(signal: &SessionSignal) -> Self {
        match signal {
            SessionSignal::Pending => GuardState::Loading,
            SessionSignal::Valid(_) => GuardState::Authenticated,
            SessionSignal::Invalid => GuardState::Unauthenticated,
        }
    }
}

/// What the guarded route shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView<T> {
    /// Neutral waiting indicator
    Waiting,
    Protected(T),
    Redirect(String),
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    redirect_to: String,
    state: GuardState,
    identity: Option<Identity>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_REDIRECT)
    }
}

impl RouteGuard {
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
            state: GuardState::Loading,
            identity: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Identity behind the current `Authenticated` state
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }

    /// Feed the latest signal. A pending signal puts the guard back in
    /// `Loading`, e.g. while the session is re-checked.
    pub fn observe(&mut self, signal: SessionSignal) -> GuardState {
        let next = GuardState::from(&signal);
        if next != self.state {
            info!("[Guard] {:?} -> {:?}", self.state, next);
        } else {
            debug!("[Guard] Still {:?}", next);
        }
        self.state = next;
        self.identity = match signal {
            SessionSignal::Valid(identity) => Some(identity),
            _ => None,
        };
        next
    }

    /// Produce the view for the current state. `content` is only built when
    /// the session is valid.
    pub fn render<T>(&self, content: impl FnOnce(&Identity) -> T) -> GuardView<T> {
        match (self.state, &self.identity) {
            (GuardState::Authenticated, Some(identity)) => GuardView::Protected(content(identity)),
            (GuardState::Loading, _) => GuardView::Waiting,
            _ => GuardView::Redirect(self.redirect_to.clone()),
        }
    }
}
