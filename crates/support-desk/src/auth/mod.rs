//! Session Authenticator
//!
//! Stands in for a remote identity provider. `login` hands out a fixed
//! identity and token; `check_auth` asks a [`CredentialValidator`] whether a
//! token names a live session. The authenticator never stores the token:
//! keeping it between calls is the caller's job (see [`crate::session`]).

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::{DeskError, Result};
use crate::models::{Identity, LoginResponse};

pub const DEMO_USER_ID: &str = "U1-12345";
pub const DEMO_USER_NAME: &str = "Edison Perez";
pub const DEMO_USER_EMAIL: &str = "edison.perez@example.com";
pub const DEMO_TOKEN: &str = "token-1234567890";

/// Given a token, yield an identity or fail
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<Identity>;
}

/// Accepts exactly one token
#[derive(Debug, Clone)]
pub struct StaticTokenValidator {
    token: String,
    identity: Identity,
}

impl StaticTokenValidator {
    pub fn new(token: impl Into<String>, identity: Identity) -> Self {
        Self {
            token: token.into(),
            identity,
        }
    }
}

impl Default for StaticTokenValidator {
    fn default() -> Self {
        Self::new(
            DEMO_TOKEN,
            Identity {
                id: DEMO_USER_ID.to_string(),
                name: DEMO_USER_NAME.to_string(),
            },
        )
    }
}

#[async_trait]
impl CredentialValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<Identity> {
        if token == self.token {
            Ok(self.identity.clone())
        } else {
            Err(DeskError::Authentication("Invalid or expired session".to_string()))
        }
    }
}

pub struct SessionAuthenticator {
    profile: LoginResponse,
    validator: Arc<dyn CredentialValidator>,
}

impl SessionAuthenticator {
    pub fn new(profile: LoginResponse, validator: Arc<dyn CredentialValidator>) -> Self {
        Self { profile, validator }
    }

    /// Swap the validator, keeping the login profile
    pub fn with_validator(mut self, validator: Arc<dyn CredentialValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Issue the session. Takes no credentials.
    pub fn login(&self) -> LoginResponse {
        info!("[Auth] User logged in: {}", self.profile.name);
        self.profile.clone()
    }

    /// Validate a session token
    pub async fn check_auth(&self, token: &str) -> Result<Identity> {
        match self.validator.validate(token).await {
            Ok(identity) => {
                debug!("[Auth] Session valid for {}", identity.id);
                Ok(identity)
            }
            Err(e) => {
                warn!("[Auth] Session check failed: {}", e);
                Err(e)
            }
        }
    }
}

impl Default for SessionAuthenticator {
    fn default() -> Self {
        Self::new(
            LoginResponse {
                id: DEMO_USER_ID.to_string(),
                name: DEMO_USER_NAME.to_string(),
                email: DEMO_USER_EMAIL.to_string(),
                token: DEMO_TOKEN.to_string(),
            },
            Arc::new(StaticTokenValidator::default()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expected_token_yields_identity() {
        let auth = SessionAuthenticator::default();
        let identity = auth.check_auth("token-1234567890").await.unwrap();
        assert_eq!(
            identity,
            Identity {
                id: "U1-12345".into(),
                name: "Edison Perez".into()
            }
        );
    }

    #[tokio::test]
    async fn test_other_tokens_fail() {
        let auth = SessionAuthenticator::default();
        for token in ["bogus", "", "token-1234567890 ", "TOKEN-1234567890"] {
            let err = auth.check_auth(token).await.unwrap_err();
            assert!(err.is_authentication(), "{:?} should be rejected", token);
        }
    }

    #[test]
    fn test_login_issues_token_that_validates() {
        let auth = SessionAuthenticator::default();
        let login = auth.login();
        assert_eq!(login.email, DEMO_USER_EMAIL);
        assert_eq!(login.token, DEMO_TOKEN);
    }

    struct PrefixValidator;

    #[async_trait]
    impl CredentialValidator for PrefixValidator {
        async fn validate(&self, token: &str) -> Result<Identity> {
            token
                .strip_prefix("user:")
                .map(|name| Identity {
                    id: format!("U1-{}", name.len()),
                    name: name.to_string(),
                })
                .ok_or_else(|| DeskError::Authentication("Bad prefix".into()))
        }
    }

    #[tokio::test]
    async fn test_validator_is_pluggable() {
        let auth = SessionAuthenticator::default().with_validator(Arc::new(PrefixValidator));
        assert_eq!(auth.check_auth("user:ana").await.unwrap().name, "ana");
        assert!(auth.check_auth(DEMO_TOKEN).await.is_err());
    }
}
