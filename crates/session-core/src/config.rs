//! Transport configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{MediaSessionError, Result};

const DEFAULT_CONNECT_ATTEMPTS: u32 = 3;
const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;
const DEFAULT_RETRY_DELAY_MS: u64 = 200;
const DEFAULT_ACCEPT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 64;

/// Timeouts and retry budget for establishing media connections
///
/// Every field has a default, so a TOML file only needs the overrides:
///
/// ```toml
/// connect_attempts = 5
/// accept_timeout_ms = 30000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Outbound connect attempts before giving up (active role)
    pub connect_attempts: u32,
    /// Per-attempt connect timeout
    pub connect_timeout_ms: u64,
    /// Pause between failed connect attempts
    pub retry_delay_ms: u64,
    /// How long a passive endpoint waits for its peer
    pub accept_timeout_ms: u64,
    /// Capacity of the connection event channel
    pub event_channel_capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            accept_timeout_ms: DEFAULT_ACCEPT_TIMEOUT_MS,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl TransportConfig {
    pub fn with_connect_attempts(mut self, attempts: u32) -> Self {
        self.connect_attempts = attempts;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_accept_timeout(mut self, timeout: Duration) -> Self {
        self.accept_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn accept_timeout(&self) -> Duration {
        Duration::from_millis(self.accept_timeout_ms)
    }

    /// Reject values that would make connection setup impossible
    pub fn validate(&self) -> Result<()> {
        if self.connect_attempts == 0 {
            return Err(MediaSessionError::Config("connect_attempts must be at least 1".into()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(MediaSessionError::Config("connect_timeout_ms must be non-zero".into()));
        }
        if self.accept_timeout_ms == 0 {
            return Err(MediaSessionError::Config("accept_timeout_ms must be non-zero".into()));
        }
        if self.event_channel_capacity == 0 {
            return Err(MediaSessionError::Config("event_channel_capacity must be non-zero".into()));
        }
        Ok(())
    }
}
