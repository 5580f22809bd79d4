//! Booking lifecycle configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Commit retry policy and calendar settings for the lifecycle manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Attempts for a commit that hits a serialization failure or deadlock.
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,
    /// Base backoff between commit attempts, doubled on every retry.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Offset applied to UTC when deriving "today" for check-in and
    /// cancellation guards.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl BookingConfig {
    /// Backoff to wait after the given (1-based) failed attempt.
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(6);
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(factor))
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: default_max_commit_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            utc_offset_minutes: 0,
        }
    }
}

fn default_max_commit_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    25
}
