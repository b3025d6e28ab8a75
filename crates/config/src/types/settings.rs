//! Gateway-wide settings.
//!
//! Responsibilities:
//! - Hold the knobs shared by every resolved connection (timeout, retries, cache size).
//!
//! Does NOT handle:
//! - Loading from env or builder overrides (see `loader` module).
//! - Per-server connection details (see `ServerIdentity`).

use std::time::Duration;

use crate::constants::{
    DEFAULT_CONNECTION_CACHE_CAPACITY, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
};

/// Settings applied to every client the gateway builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    /// Bound on each network call (info, search, mapping, terms).
    pub request_timeout: Duration,
    /// Retries for HTTP 429 replies.
    pub max_retries: usize,
    /// Number of server ids kept in the connection cache.
    pub cache_capacity: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            cache_capacity: DEFAULT_CONNECTION_CACHE_CAPACITY,
        }
    }
}
