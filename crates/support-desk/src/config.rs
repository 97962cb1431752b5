//! Backend configuration

use std::path::PathBuf;

use crate::delay::{Latency, LatencyProfile};
use crate::ids::CollisionPolicy;

pub const DEFAULT_SESSION_KEY: &str = "token";

/// Configuration for the mock backend
#[derive(Clone, Debug)]
pub struct DeskConfig {
    /// Simulated latency per operation family
    pub latency: LatencyProfile,
    /// Id collision handling for both stores
    pub collision: CollisionPolicy,
    /// Load fixture clients and messages on construction and reset
    pub seed: bool,
    /// Key the session token is kept under in the key-value store
    pub session_key: String,
    /// File backing the key-value store; in-memory when unset.
    /// `Default` falls back to the user's data dir.
    pub session_file: Option<PathBuf>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            latency: std::env::var("DESK_LATENCY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(|ms| LatencyProfile::uniform(Latency::from_millis(ms)))
                .unwrap_or_default(),
            collision: CollisionPolicy::default(),
            seed: std::env::var("DESK_SEED")
                .map(|v| !matches!(v.as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
            session_key: DEFAULT_SESSION_KEY.to_string(),
            session_file: std::env::var("DESK_SESSION_FILE")
                .ok()
                .map(PathBuf::from)
                .or_else(Self::default_session_file),
        }
    }
}

impl DeskConfig {
    /// Zero latency, seeded, in-memory session store
    pub fn instant() -> Self {
        Self {
            latency: LatencyProfile::instant(),
            collision: CollisionPolicy::default(),
            seed: true,
            session_key: DEFAULT_SESSION_KEY.to_string(),
            session_file: None,
        }
    }

    pub fn with_latency(mut self, latency: LatencyProfile) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    pub fn without_seed(mut self) -> Self {
        self.seed = false;
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Default location for the session file under the user's data dir
    pub fn default_session_file() -> Option<PathBuf> {
        dirs::data_local_dir().map(|d| d.join("support-desk").join("session.json"))
    }
}
