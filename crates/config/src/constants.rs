//! Centralized constants for the scope workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication and improve maintainability.

// =============================================================================
// Connection & Timeout Defaults
// =============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum allowed request timeout in seconds (1 hour).
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Default maximum number of HTTP redirects to follow.
pub const DEFAULT_MAX_REDIRECTS: usize = 5;

/// Default maximum number of retries for rate-limited requests.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Upper bound accepted for the retry count.
pub const MAX_MAX_RETRIES: usize = 10;

/// Default number of server ids the connection cache holds.
pub const DEFAULT_CONNECTION_CACHE_CAPACITY: u64 = 256;

// =============================================================================
// Search Defaults
// =============================================================================

/// Default page size for search hits.
pub const DEFAULT_SEARCH_SIZE: u64 = 50;

/// Target bucket count for fixed-interval histograms.
pub const DEFAULT_HISTOGRAM_BUCKETS: u32 = 50;

/// Target bucket count for auto-sized histograms.
pub const AUTO_HISTOGRAM_BUCKETS: u32 = 60;

/// Maximum number of value suggestions returned.
pub const MAX_VALUE_SUGGESTIONS: usize = 20;

/// Number of term buckets requested for numeric fields.
pub const NUMERIC_TERMS_SIZE: usize = 100;

// =============================================================================
// Environment Variables
// =============================================================================

/// Overrides the server registry file location.
pub const ENV_CONFIG_PATH: &str = "SCOPE_CONFIG_PATH";

/// Overrides the request timeout (seconds).
pub const ENV_TIMEOUT: &str = "SCOPE_TIMEOUT";

/// Overrides the retry count for rate-limited requests.
pub const ENV_MAX_RETRIES: &str = "SCOPE_MAX_RETRIES";
