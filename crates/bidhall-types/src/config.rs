//! Configuration types for the BidHall engine and broadcast hub.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants;

/// Configuration for the auction engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Budget for acquiring a per-auction or per-account lock. Exhaustion
    /// fails the operation with `Unavailable` (retryable) instead of
    /// blocking indefinitely.
    pub lock_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_millis(constants::DEFAULT_LOCK_TIMEOUT_MS),
        }
    }
}

/// Configuration for the broadcast hub.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Ring-buffer depth of each per-auction channel. A subscriber lagging
    /// past this many undelivered events drops the oldest ones.
    pub channel_capacity: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            channel_capacity: constants::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
