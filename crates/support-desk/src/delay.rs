//! Simulated network latency.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{DeskError, Result};

/// Pause for `duration` unless `cancel` fires first.
///
/// Each call schedules its own timer; nothing is shared between calls.
pub async fn delay(duration: Duration, cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(DeskError::Cancelled);
    }
    if duration.is_zero() {
        return Ok(());
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => Ok(()),
        _ = cancel.cancelled() => Err(DeskError::Cancelled),
    }
}

/// Artificial latency of one operation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency(Duration);

impl Latency {
    pub const ZERO: Latency = Latency(Duration::ZERO);

    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub async fn wait(&self, cancel: &CancellationToken) -> Result<()> {
        delay(self.0, cancel).await
    }
}

impl From<Duration> for Latency {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

/// Latency per operation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub directory: Latency,
    pub ledger: Latency,
    pub auth: Latency,
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            directory: Latency::from_millis(300),
            ledger: Latency::from_millis(300),
            auth: Latency::from_millis(1000),
        }
    }
}

impl LatencyProfile {
    /// Same latency everywhere
    pub fn uniform(latency: Latency) -> Self {
        Self {
            directory: latency,
            ledger: latency,
            auth: latency,
        }
    }

    pub fn instant() -> Self {
        Self::uniform(Latency::ZERO)
    }
}
